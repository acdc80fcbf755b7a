use thiserror::Error;

/// Top-level error type for Replybot.
#[derive(Debug, Error)]
pub enum ReplyBotError {
    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Application settings error.
    #[error("config error: {0}")]
    Config(String),

    /// Reply-configuration store error.
    #[error("store error: {0}")]
    Store(String),

    /// A concurrent reconciliation replaced the document first.
    #[error("stale configuration write: submitted revision {expected}, document is at {found}")]
    StaleRevision { expected: u64, found: u64 },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
