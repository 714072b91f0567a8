/// Core error type for the relay layer.
///
/// Adapter crates map their specific failures into this type so the
/// classifier (`outcome::classify`) stays a pure function over a value
/// rather than an exception handler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Rejection surfaced by the feed provider with an extractable error code.
    #[error("provider error {code}: {message}")]
    Provider { code: u32, message: String },

    /// Provider call failed without an extractable code (network, malformed
    /// response).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
