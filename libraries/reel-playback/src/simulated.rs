//! Headless media primitive
//!
//! Behaves like a browser media element driven by an explicit clock: requests
//! are recorded and their effects are queued as tagged events, which the
//! transport adapter drains through [`MediaPrimitive::poll_event`]. Used by
//! the CLI preview and by tests.

use crate::primitive::{MediaPrimitive, PrimitiveEvent};
use crate::session::SessionId;
use std::collections::VecDeque;

/// Number of requests the primitive has received, per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimitiveCalls {
    pub load: usize,
    pub unload: usize,
    pub play: usize,
    pub pause: usize,
    pub seek: usize,
    pub rate: usize,
}

/// Clock-driven stand-in for a native media element
#[derive(Debug, Clone)]
pub struct SimulatedPrimitive {
    /// Duration the metadata will report (may be invalid on purpose)
    media_duration: f64,
    session: Option<SessionId>,
    source_uri: Option<String>,
    current_time: f64,
    paused: bool,
    rate: f64,
    metadata_sent: bool,
    events: VecDeque<(SessionId, PrimitiveEvent)>,
    calls: PrimitiveCalls,
}

impl SimulatedPrimitive {
    /// Create a primitive whose media reports `media_duration` seconds
    pub fn new(media_duration: f64) -> Self {
        Self {
            media_duration,
            session: None,
            source_uri: None,
            current_time: 0.0,
            paused: true,
            rate: 1.0,
            metadata_sent: false,
            events: VecDeque::with_capacity(16),
            calls: PrimitiveCalls::default(),
        }
    }

    /// Change what the next loaded source reports as its duration
    pub fn set_media_duration(&mut self, media_duration: f64) {
        self.media_duration = media_duration;
    }

    /// Fire `loadedmetadata` if it has not fired for the current source
    pub fn resolve_metadata(&mut self) {
        let Some(session) = self.session else {
            return;
        };
        if self.metadata_sent {
            return;
        }

        self.metadata_sent = true;
        self.events.push_back((
            session,
            PrimitiveEvent::LoadedMetadata {
                duration: self.media_duration,
            },
        ));
    }

    /// Advance the element's own clock by `dt_secs` of wall time
    ///
    /// Resolves metadata first if needed. At the end of the media the element
    /// pauses itself and fires `timeupdate`, `pause`, then `ended`.
    pub fn advance(&mut self, dt_secs: f64) {
        let Some(session) = self.session else {
            return;
        };
        self.resolve_metadata();
        if self.paused || dt_secs <= 0.0 {
            return;
        }

        self.current_time += dt_secs * self.rate;

        if self.end_reached() {
            self.current_time = self.media_duration;
            self.paused = true;
            self.push_time_update(session);
            self.events.push_back((session, PrimitiveEvent::Pause));
            self.events.push_back((session, PrimitiveEvent::Ended));
        } else {
            self.push_time_update(session);
        }
    }

    /// Queue a raw event tagged with the current session
    pub fn emit(&mut self, event: PrimitiveEvent) {
        if let Some(session) = self.session {
            self.events.push_back((session, event));
        }
    }

    /// Queue a raw event with an explicit tag
    pub fn emit_tagged(&mut self, session: SessionId, event: PrimitiveEvent) {
        self.events.push_back((session, event));
    }

    fn end_reached(&self) -> bool {
        self.media_duration.is_finite() && self.current_time >= self.media_duration
    }

    fn push_time_update(&mut self, session: SessionId) {
        self.events.push_back((
            session,
            PrimitiveEvent::TimeUpdate {
                current_time: self.current_time,
            },
        ));
    }

    pub fn calls(&self) -> PrimitiveCalls {
        self.calls
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn playback_rate(&self) -> f64 {
        self.rate
    }

    pub fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }

    /// Events fired but not yet drained
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl MediaPrimitive for SimulatedPrimitive {
    fn load(&mut self, source_uri: &str, session: SessionId) {
        self.calls.load += 1;
        self.session = Some(session);
        self.source_uri = Some(source_uri.to_string());
        self.current_time = 0.0;
        self.paused = true;
        self.metadata_sent = false;
    }

    fn unload(&mut self) {
        self.calls.unload += 1;
        self.session = None;
        self.source_uri = None;
        self.current_time = 0.0;
        self.paused = true;
        self.metadata_sent = false;
    }

    fn play(&mut self) {
        self.calls.play += 1;
        let Some(session) = self.session else {
            return;
        };
        if !self.paused {
            return;
        }

        // Playing from the end restarts, as a browser element does
        if self.end_reached() {
            self.current_time = 0.0;
            self.push_time_update(session);
        }
        self.paused = false;
        self.events.push_back((session, PrimitiveEvent::Play));
    }

    fn pause(&mut self) {
        self.calls.pause += 1;
        let Some(session) = self.session else {
            return;
        };
        if self.paused {
            return;
        }

        self.paused = true;
        self.events.push_back((session, PrimitiveEvent::Pause));
    }

    fn set_current_time(&mut self, position_secs: f64) {
        self.calls.seek += 1;
        let Some(session) = self.session else {
            return;
        };

        let upper = if self.media_duration.is_finite() {
            self.media_duration.max(0.0)
        } else {
            f64::MAX
        };
        self.current_time = position_secs.clamp(0.0, upper);
        self.push_time_update(session);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.calls.rate += 1;
        self.rate = rate;
    }

    fn poll_event(&mut self) -> Option<(SessionId, PrimitiveEvent)> {
        self.events.pop_front()
    }
}
