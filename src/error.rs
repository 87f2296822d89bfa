use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// Malformed scale construction (non-finite bounds, log domain crossing zero, ...).
    #[error("invalid scale domain: {reason}")]
    InvalidDomain { reason: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid path data at byte {offset}: {reason}")]
    InvalidPath { reason: String, offset: usize },
}

impl ChartError {
    pub(crate) fn invalid_domain(reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            reason: reason.into(),
        }
    }
}
