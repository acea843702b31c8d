//! CSV download of the analysis table.

use chrono::SecondsFormat;
use rdash_core::AnalysisRow;

use crate::PipelineError;

pub const EXPORT_FILE_NAME: &str = "reddit_analysis_output.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

const HEADER: [&str; 9] = [
    "source",
    "text",
    "created_utc",
    "text_clean",
    "tokens",
    "topic",
    "lexicon_score",
    "lexicon_label",
    "classifier_label",
];

/// Serialize `rows` as UTF-8 CSV with a header line.
///
/// # Errors
///
/// Returns [`PipelineError::Csv`] if a record cannot be written.
pub fn to_csv(rows: &[AnalysisRow]) -> Result<Vec<u8>, PipelineError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for row in rows {
        let created = row.created_utc.to_rfc3339_opts(SecondsFormat::Secs, true);
        let tokens = row.tokens.join(" ");
        let topic = row.topic.to_string();
        let score = row.lexicon_score.to_string();
        writer.write_record([
            row.source.as_str(),
            row.text.as_str(),
            created.as_str(),
            row.text_clean.as_str(),
            tokens.as_str(),
            topic.as_str(),
            score.as_str(),
            row.lexicon_label.as_str(),
            row.classifier_label.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use rdash_core::PostRecord;

    use super::*;

    fn row(text: &str, clean: &str) -> AnalysisRow {
        let post = PostRecord {
            id: "x".to_string(),
            source: "malaysia".to_string(),
            text: text.to_string(),
            created_utc: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let mut row = AnalysisRow::new(&post, clean.to_string());
        row.topic = 0;
        row.set_lexicon_score(2);
        row.classifier_label = "positive".to_string();
        row
    }

    #[test]
    fn header_only_for_empty_table() {
        let bytes = to_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "source,text,created_utc,text_clean,tokens,topic,lexicon_score,lexicon_label,classifier_label\n"
        );
    }

    #[test]
    fn row_fields_are_written_in_order() {
        let bytes = to_csv(&[row("Ladies coach", "lady coach")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "malaysia,Ladies coach,2023-11-14T22:13:20Z,lady coach,lady coach,0,2,positive,positive"
        );
    }

    #[test]
    fn commas_and_quotes_are_escaped() {
        let bytes = to_csv(&[row("Full, \"again\"", "full")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(r#""Full, ""again""""#));
    }
}
