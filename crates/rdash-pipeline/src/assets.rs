//! Lexicon and classifier artifacts, loaded once and shared by every run.

use std::path::Path;

use rdash_core::Degradable;
use rdash_sentiment::{ClassifierPipeline, Lexicon};

use crate::notice::{Notice, NoticeLevel};
use crate::phase::RunPhase;

/// Sentiment assets, each possibly degraded.
///
/// A missing lexicon falls back to an empty one (every score 0). A missing
/// classifier falls back to `None`, and runs assign the default label.
#[derive(Debug)]
pub struct NlpAssets {
    pub lexicon: Degradable<Lexicon>,
    pub classifier: Degradable<Option<ClassifierPipeline>>,
}

impl NlpAssets {
    /// Load both assets. Never fails; failures become degraded values.
    pub fn load(lexicon_path: &Path, model_dir: &Path) -> Self {
        let lexicon = Degradable::from_result(Lexicon::load(lexicon_path), Lexicon::default);
        if let Some(reason) = lexicon.reason() {
            tracing::error!(
                path = %lexicon_path.display(),
                error = reason,
                "lexicon unavailable, lexicon scores will all be 0"
            );
        }

        let classifier =
            Degradable::from_result(ClassifierPipeline::load(model_dir).map(Some), || None);
        if let Some(reason) = classifier.reason() {
            tracing::error!(
                model_dir = %model_dir.display(),
                error = reason,
                "classifier artifacts unavailable, default label will be used"
            );
        }

        Self {
            lexicon,
            classifier,
        }
    }

    /// Assets supplied directly, both ready.
    pub fn ready(lexicon: Lexicon, classifier: Option<ClassifierPipeline>) -> Self {
        Self {
            lexicon: Degradable::Ready(lexicon),
            classifier: Degradable::Ready(classifier),
        }
    }

    /// One error notice per degraded asset.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if let Some(reason) = self.lexicon.reason() {
            notices.push(Notice::new(
                NoticeLevel::Error,
                RunPhase::Idle,
                format!("Error loading sentiment lexicon: {reason}"),
            ));
        }
        if let Some(reason) = self.classifier.reason() {
            notices.push(Notice::new(
                NoticeLevel::Error,
                RunPhase::Idle,
                format!("Error loading classifier model files: {reason}"),
            ));
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rdash-assets-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_degrade_with_two_error_notices() {
        let dir = scratch_dir("missing");
        let assets = NlpAssets::load(&dir.join("SentiLexM.txt"), &dir.join("models"));

        assert!(assets.lexicon.is_degraded());
        assert!(assets.lexicon.value().is_empty());
        assert!(assets.classifier.is_degraded());
        assert!(assets.classifier.value().is_none());

        let notices = assets.notices();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
        assert!(notices[0].message.contains("lexicon"));
    }

    #[test]
    fn lexicon_loads_even_without_models() {
        let dir = scratch_dir("lexicon-only");
        let path = dir.join("SentiLexM.txt");
        std::fs::write(&path, "baik 1\nburuk -1\n").unwrap();

        let assets = NlpAssets::load(&path, &dir.join("models"));
        assert!(!assets.lexicon.is_degraded());
        assert_eq!(assets.lexicon.value().len(), 2);
        assert_eq!(assets.notices().len(), 1);
    }

    #[test]
    fn ready_assets_have_no_notices() {
        let assets = NlpAssets::ready(Lexicon::default(), None);
        assert!(assets.notices().is_empty());
    }
}
