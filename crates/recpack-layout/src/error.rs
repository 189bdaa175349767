/// Errors that can occur while parsing a layout string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The layout string contains an unrecognized token or a malformed count.
    #[error("invalid layout spec at byte {position}: {reason}")]
    InvalidSpec { position: usize, reason: String },
}

impl LayoutError {
    pub(crate) fn invalid(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            position,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
