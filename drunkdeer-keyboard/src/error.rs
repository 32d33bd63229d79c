//! Keyboard interface error types

use drunkdeer_transport::TransportError;
use thiserror::Error;

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Per-key array does not cover the key layout
    #[error("Per-key array has {actual} entries, the key layout has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Controller is closing or closed
    #[error("Controller is closed")]
    Closed,

    /// I/O threads did not exit within the close timeout
    #[error("Timed out waiting for I/O threads to exit")]
    Timeout,

    /// Could not start an I/O thread
    #[error("Failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}
