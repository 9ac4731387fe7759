//! Remote metadata-service errors
//!
//! Every variant is fatal: the indices cannot be trusted if either query
//! fails, so the run stops before any reconciliation happens.

/// Failures talking to the metadata service
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Network/transport failure, including request timeouts
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("metadata service returned status {code}")]
    Status {
        /// HTTP status code
        code: u16,
    },

    /// Body was not valid JSON or did not match the expected shape
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Response decoded but carried no `data` envelope
    #[error("response missing data envelope")]
    MissingData,
}
