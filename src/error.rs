use std::time::Duration;

/// Failures a search can end in. All of them surface as a status notice; none
/// of them take the widget down.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The backend could not be reached or answered with garbage
    #[error("search backend unavailable: {0}")]
    Network(String),
    /// The backend did not answer within the configured timeout
    #[error("search timed out after {0:?}")]
    Timeout(Duration),
    /// Reserved for backends that reject queries
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
