use thiserror::Error;

/// Top-level error type for the `grove-api` crate.
///
/// Covers every failure mode of the HTTP surfaces: transport, CouchDB
/// error bodies, and payload decoding. `grove-core` maps these into the
/// network / storage / sync taxonomy its reducers understand.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL cannot carry path segments (e.g. `mailto:` or `data:`).
    #[error("URL cannot be used as a base: {0}")]
    CannotBeABase(String),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Database ────────────────────────────────────────────────────
    /// Document update conflict (HTTP 409): the `_rev` is stale.
    #[error("Document update conflict for '{id}'")]
    Conflict { id: String },

    /// Structured `{"error", "reason"}` body returned by the database.
    #[error("Database error (HTTP {status}) {error}: {reason}")]
    Database {
        status: u16,
        error: String,
        reason: String,
    },

    /// Non-success HTTP status from a non-database endpoint.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// First 200 characters of a response body, for log and error previews.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
