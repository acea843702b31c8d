//! Soft-failure carrier for assets and stages that fall back to a default.

/// A value that is either ready or a fallback standing in for something
/// that could not be produced, with the human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub enum Degradable<T> {
    Ready(T),
    Degraded { fallback: T, reason: String },
}

impl<T> Degradable<T> {
    pub fn degraded(fallback: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            fallback,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Ready(value) | Self::Degraded { fallback: value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Ready(value) | Self::Degraded { fallback: value, .. } => value,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Convert a fallible load into a degradable value using `fallback` on error.
    pub fn from_result<E: std::fmt::Display>(
        result: Result<T, E>,
        fallback: impl FnOnce() -> T,
    ) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::degraded(fallback(), e.to_string()),
        }
    }
}
