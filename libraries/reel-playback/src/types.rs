//! Core types for playback synchronization

use crate::error::{PlaybackError, Result};
use crate::session::SessionId;
use serde::{Deserialize, Serialize};

/// Default drift below which a seek is treated as already satisfied (seconds)
pub const DEFAULT_SEEK_EPSILON_SECS: f64 = 0.1;

/// Default rewind/forward step (seconds)
pub const DEFAULT_STEP_SECS: f64 = 5.0;

/// Synchronization state
///
/// `Unloaded` until a source is bound, `Loading` until the transport
/// resolves the duration, then `Ready` until the source changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// No source bound
    Unloaded,

    /// Source bound, duration not yet known
    Loading,

    /// Duration resolved (or given up on, for degraded sessions)
    Ready,
}

impl SyncState {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncState::Unloaded => "unloaded",
            SyncState::Loading => "loading",
            SyncState::Ready => "ready",
        }
    }
}

/// Configuration for the synchronization core and control surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Seek requests closer than this to the reported time skip the
    /// native seek (default: 0.1s)
    pub seek_epsilon_secs: f64,

    /// Rewind/forward step (default: 5s)
    pub step_secs: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            seek_epsilon_secs: DEFAULT_SEEK_EPSILON_SECS,
            step_secs: DEFAULT_STEP_SECS,
        }
    }
}

impl PlayerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.seek_epsilon_secs.is_finite() || self.seek_epsilon_secs < 0.0 {
            return Err(PlaybackError::InvalidConfig(format!(
                "seek_epsilon_secs must be a finite, non-negative number (got {})",
                self.seek_epsilon_secs
            )));
        }

        if !self.step_secs.is_finite() || self.step_secs <= 0.0 {
            return Err(PlaybackError::InvalidConfig(format!(
                "step_secs must be a finite, positive number (got {})",
                self.step_secs
            )));
        }

        Ok(())
    }
}

/// Point-in-time view of the synchronization core
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: SyncState,
    pub session: Option<SessionId>,
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    pub degraded: bool,
    /// `position / duration`, 0 when the duration is unknown
    pub progress: f64,
}

impl PlaybackSnapshot {
    pub(crate) fn unloaded() -> Self {
        Self {
            state: SyncState::Unloaded,
            session: None,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: None,
            degraded: false,
            progress: 0.0,
        }
    }
}
