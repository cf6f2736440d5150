use std::time::Duration;

use thiserror::Error;

/// Failure of a single lookup. A lookup that matches nothing is not a failure,
/// see [`crate::Shaped::Empty`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryFailure {
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("storage query timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl QueryFailure {
    /// Stable machine-readable code used by adapters and logs.
    pub fn code(&self) -> &'static str {
        match self {
            QueryFailure::InvalidCriteria(_) => "invalid_criteria",
            QueryFailure::StorageUnavailable(_) => "storage_unavailable",
            QueryFailure::Timeout(_) => "timeout",
        }
    }
}

/// Errors raised by an [`crate::ExpressionStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("row decode error: {0}")]
    Decode(String),
}

impl From<StoreError> for QueryFailure {
    fn from(err: StoreError) -> Self {
        QueryFailure::StorageUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_classify_as_storage_unavailable() {
        let failure: QueryFailure = StoreError::Unavailable("connection refused".into()).into();
        assert_eq!(failure.code(), "storage_unavailable");
        assert!(failure.to_string().contains("connection refused"));
    }

    #[test]
    fn timeout_message_reports_millis() {
        let failure = QueryFailure::Timeout(Duration::from_millis(1500));
        assert_eq!(failure.to_string(), "storage query timed out after 1500ms");
    }
}
