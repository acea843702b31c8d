use serde::Serialize;

use crate::phase::RunPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-visible message produced by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub phase: RunPhase,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, phase: RunPhase, message: impl Into<String>) -> Self {
        Self {
            level,
            phase,
            message: message.into(),
        }
    }

    /// Emit through `tracing` at the matching level.
    pub fn log(&self) {
        let phase = self.phase.as_str();
        match self.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(phase, "{}", self.message);
            }
            NoticeLevel::Warning => tracing::warn!(phase, "{}", self.message),
            NoticeLevel::Error => tracing::error!(phase, "{}", self.message),
        }
    }
}

/// Notices collected over one run, logged as they are pushed.
#[derive(Debug, Default)]
pub(crate) struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub(crate) fn push(&mut self, level: NoticeLevel, phase: RunPhase, message: impl Into<String>) {
        let notice = Notice::new(level, phase, message);
        notice.log();
        self.notices.push(notice);
    }

    pub(crate) fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            notice.log();
            self.notices.push(notice);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Notice> {
        self.notices
    }
}
