//! Platform-agnostic media primitive trait
//!
//! Abstracts the native playback element (an `HTMLVideoElement` in the
//! browser, a simulated clock in tests and the CLI) behind one interface.

use crate::session::SessionId;

/// Raw lifecycle event fired by a media primitive
///
/// These mirror what a native element reports and are not yet validated:
/// durations may be `NaN` or infinite, times may be out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveEvent {
    /// Metadata is available; carries the element's raw duration
    LoadedMetadata { duration: f64 },

    /// Playback position progressed (or jumped after a seek)
    TimeUpdate { current_time: f64 },

    /// Element started playing
    Play,

    /// Element paused
    Pause,

    /// Element reached the end of the media
    Ended,
}

/// Native playback primitive
///
/// Every request returns immediately. Its effect is reported later through
/// [`PrimitiveEvent`]s tagged with the session the listeners were registered
/// for. Implementations either buffer those events for [`poll_event`] or the
/// host forwards them as they fire.
///
/// [`poll_event`]: MediaPrimitive::poll_event
pub trait MediaPrimitive {
    /// Bind a source and register listeners tagged with `session`
    fn load(&mut self, source_uri: &str, session: SessionId);

    /// Release the current source and remove its listeners
    fn unload(&mut self);

    /// Request playback
    fn play(&mut self);

    /// Request pause
    fn pause(&mut self);

    /// Move the playback position
    fn set_current_time(&mut self, position_secs: f64);

    /// Change playback speed (1.0 is normal)
    fn set_playback_rate(&mut self, rate: f64);

    /// Take the next buffered event, if this primitive buffers them
    fn poll_event(&mut self) -> Option<(SessionId, PrimitiveEvent)> {
        None
    }
}
