//! Error types for playback synchronization

use thiserror::Error;

/// Playback errors
///
/// Seek targets are never an error: out-of-range targets are clamped and
/// unusable ones are dropped. Only configuration and rate changes can fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    /// Player configuration rejected by validation
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    /// Playback rate must be finite and strictly positive
    #[error("Invalid playback rate: {0}")]
    InvalidPlaybackRate(f64),

    /// Operation needs a bound media source
    #[error("No media source loaded")]
    NoSource,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
