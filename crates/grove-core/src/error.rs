// ── Core error types ──
//
// Outcome errors travel inside actions, so they are plain `Clone + Eq`
// values that carry messages rather than live transport errors. The
// `From<grove_api::Error>` impls translate transport failures into the
// network / storage / sync taxonomy the reducers react to.

use thiserror::Error;

/// A failed remote fetch (polling, device commands).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Cannot reach {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<grove_api::Error> for FetchError {
    fn from(err: grove_api::Error) -> Self {
        match err {
            grove_api::Error::Transport(ref e) => match e.status() {
                Some(status) => FetchError::Status {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => FetchError::Unreachable {
                    url: e
                        .url()
                        .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                },
            },
            grove_api::Error::Database { status, reason, .. } => FetchError::Status {
                status,
                message: reason,
            },
            grove_api::Error::Status { status, message } => FetchError::Status { status, message },
            grove_api::Error::Deserialization { message, body: _ } => FetchError::Malformed(message),
            other @ (grove_api::Error::InvalidUrl(_)
            | grove_api::Error::CannotBeABase(_)
            | grove_api::Error::Tls(_)
            | grove_api::Error::Conflict { .. }) => FetchError::Unreachable {
                url: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

/// A failed document store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Local read or write failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Replication with the remote origin failed.
    #[error("Sync error: {0}")]
    Sync(String),

    /// A write carried a stale revision.
    #[error("Document update conflict for '{id}'")]
    Conflict { id: String },
}

impl StoreError {
    /// Classify an API error raised by a local read or write.
    pub fn storage(err: grove_api::Error) -> Self {
        match err {
            grove_api::Error::Conflict { id } => StoreError::Conflict { id },
            other => StoreError::Storage(other.to_string()),
        }
    }

    /// Classify an API error raised during replication.
    pub fn sync(err: &grove_api::Error) -> Self {
        StoreError::Sync(err.to_string())
    }
}

/// Errors raised while wiring the runtime together.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] grove_api::Error),
}
