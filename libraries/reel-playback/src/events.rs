//! Player Events
//!
//! Emitted by the synchronization core each time a transport signal changes
//! the reconciled state, so the host knows to re-render. Stale or ignored
//! signals produce no event.

use serde::{Deserialize, Serialize};

/// Events emitted by the synchronization core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// The transport resolved metadata and the session became ready
    ///
    /// `duration_secs` is `None` for degraded sessions.
    DurationResolved {
        /// Resolved duration
        duration_secs: Option<f64>,
    },

    /// Reported position changed
    PositionChanged {
        /// New position
        position_secs: f64,
    },

    /// The transport confirmed a play/pause transition
    PlayStateChanged {
        /// Confirmed play state
        is_playing: bool,
    },

    /// Playback reached the end of the media
    Ended,
}

impl PlayerEvent {
    /// Short name used in logs and by the wasm binding
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::DurationResolved { .. } => "duration",
            PlayerEvent::PositionChanged { .. } => "position",
            PlayerEvent::PlayStateChanged { .. } => "playState",
            PlayerEvent::Ended => "ended",
        }
    }
}
