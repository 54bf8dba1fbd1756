//! Transport adapter
//!
//! Owns the media primitive for a session's lifetime and converts its raw
//! lifecycle events into normalized [`TransportSignal`]s:
//! - `DurationKnown` exactly once per source load
//! - `TimeAdvanced` on every time update (O(1), no allocation)
//! - `Played` / `Paused` / `Ended` confirmations
//!
//! Play/pause requests are idempotent and seeks are clamped to the media
//! bounds. Seeks requested before the duration is known are queued (latest
//! wins) and applied once it resolves.

use crate::error::{PlaybackError, Result};
use crate::primitive::{MediaPrimitive, PrimitiveEvent};
use crate::session::SessionId;
use tracing::{debug, trace, warn};

/// Normalized transport signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportSignal {
    /// Metadata resolved
    ///
    /// An invalid raw duration is normalized to 0 with `degraded` set.
    DurationKnown { duration_secs: f64, degraded: bool },

    /// Position reported by the primitive, clamped to the media bounds
    TimeAdvanced { position_secs: f64 },

    /// Primitive confirmed playback started
    Played,

    /// Primitive confirmed playback paused
    Paused,

    /// Primitive reached the end of the media
    Ended,
}

/// A signal tagged with the session it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEnvelope {
    pub session: SessionId,
    pub signal: TransportSignal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DurationState {
    Pending,
    Known(f64),
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayIntent {
    Play,
    Pause,
}

/// Boundary wrapper around a [`MediaPrimitive`]
pub struct TransportAdapter<P> {
    primitive: P,
    session: Option<SessionId>,
    last_session: SessionId,
    duration: DurationState,
    pending_seek: Option<f64>,
    confirmed_playing: bool,
    requested: Option<PlayIntent>,
}

impl<P: MediaPrimitive> TransportAdapter<P> {
    pub fn new(primitive: P) -> Self {
        Self {
            primitive,
            session: None,
            last_session: SessionId::default(),
            duration: DurationState::Pending,
            pending_seek: None,
            confirmed_playing: false,
            requested: None,
        }
    }

    /// Bind a new source, detaching the previous one first
    ///
    /// Returns the tag for the new session. Events carrying any other tag
    /// are dropped from here on.
    pub fn attach(&mut self, source_uri: &str) -> SessionId {
        self.detach();

        let session = self.last_session.next();
        self.last_session = session;
        self.session = Some(session);
        self.primitive.load(source_uri, session);

        debug!(session = %session, source = %source_uri, "Attached media source");
        session
    }

    /// Release the current source and forget everything about it
    pub fn detach(&mut self) {
        if let Some(session) = self.session.take() {
            self.primitive.unload();
            debug!(session = %session, "Detached media source");
        }

        self.duration = DurationState::Pending;
        self.pending_seek = None;
        self.confirmed_playing = false;
        self.requested = None;
    }

    /// Tag of the currently attached session
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Resolved duration, if known and valid
    pub fn duration(&self) -> Option<f64> {
        match self.duration {
            DurationState::Known(duration) => Some(duration),
            DurationState::Pending | DurationState::Invalid => None,
        }
    }

    /// Seek queued until the duration resolves
    pub fn pending_seek(&self) -> Option<f64> {
        self.pending_seek
    }

    /// Request playback
    ///
    /// No-op when the primitive is already playing or a play request is
    /// still unconfirmed.
    pub fn play(&mut self) {
        if self.session.is_none() || self.heading_to_play() {
            return;
        }

        self.requested = Some(PlayIntent::Play);
        self.primitive.play();
    }

    /// Request pause
    ///
    /// No-op when the primitive is already paused or a pause request is
    /// still unconfirmed.
    pub fn pause(&mut self) {
        if self.session.is_none() || !self.heading_to_play() {
            return;
        }

        self.requested = Some(PlayIntent::Pause);
        self.primitive.pause();
    }

    fn heading_to_play(&self) -> bool {
        match self.requested {
            Some(intent) => intent == PlayIntent::Play,
            None => self.confirmed_playing,
        }
    }

    /// Request a position change
    ///
    /// Clamped to `[0, duration]` once the duration is known; queued until
    /// then. Dropped for degraded sessions and for `NaN` targets.
    pub fn seek_to(&mut self, position_secs: f64) {
        if self.session.is_none() || position_secs.is_nan() {
            return;
        }

        match self.duration {
            DurationState::Known(duration) => {
                self.primitive
                    .set_current_time(position_secs.clamp(0.0, duration));
            }
            DurationState::Pending => {
                self.pending_seek = Some(position_secs);
            }
            DurationState::Invalid => {
                debug!("Seek dropped: media duration is unknown");
            }
        }
    }

    /// Change playback speed
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PlaybackError::InvalidPlaybackRate(rate));
        }

        if self.session.is_none() {
            return Err(PlaybackError::NoSource);
        }

        self.primitive.set_playback_rate(rate);
        Ok(())
    }

    /// Normalize a raw primitive event
    ///
    /// Returns `None` for events from another session, repeated metadata,
    /// and unusable time values.
    pub fn normalize(
        &mut self,
        session: SessionId,
        event: PrimitiveEvent,
    ) -> Option<SignalEnvelope> {
        if self.session != Some(session) {
            trace!(event_session = %session, "Dropping event from stale session");
            return None;
        }

        let signal = match event {
            PrimitiveEvent::LoadedMetadata { duration } => self.resolve_duration(duration)?,
            PrimitiveEvent::TimeUpdate { current_time } => {
                if current_time.is_nan() {
                    return None;
                }
                let position_secs = match self.duration {
                    DurationState::Known(duration) => current_time.clamp(0.0, duration),
                    DurationState::Pending | DurationState::Invalid => {
                        if current_time.is_finite() {
                            current_time.max(0.0)
                        } else {
                            return None;
                        }
                    }
                };
                TransportSignal::TimeAdvanced { position_secs }
            }
            PrimitiveEvent::Play => {
                self.confirmed_playing = true;
                self.requested = None;
                TransportSignal::Played
            }
            PrimitiveEvent::Pause => {
                self.confirmed_playing = false;
                self.requested = None;
                TransportSignal::Paused
            }
            PrimitiveEvent::Ended => {
                self.confirmed_playing = false;
                self.requested = None;
                TransportSignal::Ended
            }
        };

        Some(SignalEnvelope { session, signal })
    }

    fn resolve_duration(&mut self, raw: f64) -> Option<TransportSignal> {
        if self.duration != DurationState::Pending {
            return None;
        }

        if raw.is_finite() && raw >= 0.0 {
            self.duration = DurationState::Known(raw);
            if let Some(target) = self.pending_seek.take() {
                self.primitive.set_current_time(target.clamp(0.0, raw));
            }
            Some(TransportSignal::DurationKnown {
                duration_secs: raw,
                degraded: false,
            })
        } else {
            warn!(raw_duration = raw, "Primitive reported an invalid duration");
            self.duration = DurationState::Invalid;
            self.pending_seek = None;
            Some(TransportSignal::DurationKnown {
                duration_secs: 0.0,
                degraded: true,
            })
        }
    }

    /// Drain buffered primitive events until one normalizes to a signal
    pub fn poll(&mut self) -> Option<SignalEnvelope> {
        while let Some((session, event)) = self.primitive.poll_event() {
            if let Some(envelope) = self.normalize(session, event) {
                return Some(envelope);
            }
        }
        None
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Mutable access for hosts that drive the primitive's own timeline
    pub fn primitive_mut(&mut self) -> &mut P {
        &mut self.primitive
    }
}
