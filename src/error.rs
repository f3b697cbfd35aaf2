//! Server error types.

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the HTTP serving core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The listen socket could not be bound. Fatal at startup.
    #[error("failed to bind [{addr}]: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Socket-level failure on an individual connection.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The request head did not terminate within the size cap.
    #[error("request head exceeds {0} bytes")]
    RequestTooLarge(usize),

    /// The request line could not be parsed.
    #[error("malformed request: {0}")]
    MalformedRequest(&'static str),

    /// The client did not deliver a full request head in time.
    #[error("timed out reading request head")]
    RequestTimeout,

    /// The serving core is gone, i.e. the server is shutting down.
    #[error("serving core unavailable")]
    Shutdown,
}
