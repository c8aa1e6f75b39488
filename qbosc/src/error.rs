//! Error types for the OSC transport

/// Result type alias for OSC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding, decoding or transmitting OSC
/// messages
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The packet does not follow the expected wire layout. Callers treat
    /// this as "no message" and drop the datagram.
    #[error("malformed OSC packet: {0}")]
    Malformed(&'static str),

    /// Socket error (bind, send or receive)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
