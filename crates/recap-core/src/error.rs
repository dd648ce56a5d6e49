use thiserror::Error;

/// Top-level error type for recap.
///
/// One variant per pipeline stage, so callers dispatch on the kind of
/// failure rather than on the shape of a vendor library error.
#[derive(Debug, Error)]
pub enum RecapError {
    /// Identity check failed. Fatal: the run aborts before any downstream call.
    #[error("auth error: {0}")]
    Auth(String),

    /// Mention search failed. Recovered as an empty mention list.
    #[error("collection error: {0}")]
    Collection(String),

    /// Triage completion failed. Recovered as a fallback report.
    #[error("analysis error: {0}")]
    Analysis(String),

    /// DM open or message send failed. Fatal for the remainder of the run.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
