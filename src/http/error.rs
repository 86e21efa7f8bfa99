use thiserror::Error;

/// Why a single outbound query produced nothing. Every variant is
/// recoverable: callers log it and carry on with an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("non-success status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("undecodable payload from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    /// 404 from a lookup means "no such identifier", not a broken source.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}
