//! Playback sessions
//!
//! A session is one bound media source and its playback state, from load
//! until the source changes or the player is torn down. Sessions are never
//! mutated across sources: binding a new source always creates a new one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying one bound media source
///
/// Listener registrations on the primitive carry the tag of the session they
/// were made for, so events from a previous source can be recognised and
/// dropped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// The live playback state for one source
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    id: SessionId,
    source_uri: String,
    pub(crate) is_playing: bool,
    pub(crate) reported_time: f64,
    pub(crate) duration: Option<f64>,
    pub(crate) target_time: Option<f64>,
    pub(crate) degraded: bool,
}

impl PlaybackSession {
    pub(crate) fn new(id: SessionId, source_uri: String) -> Self {
        Self {
            id,
            source_uri,
            is_playing: false,
            reported_time: 0.0,
            duration: None,
            target_time: None,
            degraded: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Locator of the bound media asset
    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// Confirmed play state (flipped only by transport signals)
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Current position in seconds
    pub fn reported_time(&self) -> f64 {
        self.reported_time
    }

    /// Total duration in seconds, once resolved
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Seek target buffered while the duration is unresolved
    pub fn target_time(&self) -> Option<f64> {
        self.target_time
    }

    /// Whether the transport failed to report a usable duration
    ///
    /// Degraded sessions can still play and pause but cannot be scrubbed.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn progress(&self) -> f64 {
        crate::time::progress_ratio(self.reported_time, self.duration)
    }
}
