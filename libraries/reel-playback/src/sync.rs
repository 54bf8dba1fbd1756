//! Synchronization core
//!
//! Reconciles two writers of the playback position:
//! - the transport, reporting where the primitive actually is
//!   (`TimeAdvanced`), which is authoritative for continuous playback
//! - external seek requests from the scrubber and step buttons
//!
//! The two arrive on separate channels ([`SyncCore::apply_signal`] and
//! [`SyncCore::request_seek`]) and a transport-reported position is never
//! turned back into a seek, so a seek cannot re-trigger itself through the
//! time update it causes.
//!
//! State machine: `Unloaded -> Loading -> Ready`. Seeks during `Loading`
//! are buffered (latest wins) and replayed once the duration resolves.
//! Loading a new source always starts a fresh session in `Loading`.

use crate::error::Result;
use crate::events::PlayerEvent;
use crate::primitive::{MediaPrimitive, PrimitiveEvent};
use crate::session::{PlaybackSession, SessionId};
use crate::transport::{SignalEnvelope, TransportAdapter, TransportSignal};
use crate::types::{PlaybackSnapshot, PlayerConfig, SyncState};
use tracing::{debug, info, trace, warn};

/// Authoritative playback state for one player
pub struct SyncCore<P> {
    transport: TransportAdapter<P>,
    config: PlayerConfig,
    state: SyncState,
    session: Option<PlaybackSession>,
    /// A toggle was sent to the transport and not yet confirmed
    toggle_pending: bool,
}

impl<P: MediaPrimitive> SyncCore<P> {
    /// Create a core with default configuration
    pub fn new(primitive: P) -> Self {
        Self::build(primitive, PlayerConfig::default())
    }

    /// Create a core with validated configuration
    pub fn with_config(primitive: P, config: PlayerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(primitive, config))
    }

    fn build(primitive: P, config: PlayerConfig) -> Self {
        Self {
            transport: TransportAdapter::new(primitive),
            config,
            state: SyncState::Unloaded,
            session: None,
            toggle_pending: false,
        }
    }

    // ===== Session Lifecycle =====

    /// Bind a media source (mount or source change)
    ///
    /// Discards the previous session, including any buffered seek, and
    /// detaches its listeners before the new source is attached.
    pub fn load(&mut self, source_uri: impl Into<String>) -> SessionId {
        let source_uri = source_uri.into();

        if let Some(previous) = self.session.take() {
            if previous.target_time.is_some() {
                debug!(session = %previous.id(), "Discarding buffered seek of replaced session");
            }
        }

        let id = self.transport.attach(&source_uri);
        info!(session = %id, source = %source_uri, "Loading media source");

        self.session = Some(PlaybackSession::new(id, source_uri));
        self.state = SyncState::Loading;
        self.toggle_pending = false;
        id
    }

    /// Release the current source (unmount)
    pub fn unload(&mut self) {
        if let Some(previous) = self.session.take() {
            debug!(session = %previous.id(), "Unloading media source");
        }
        self.transport.detach();
        self.state = SyncState::Unloaded;
        self.toggle_pending = false;
    }

    // ===== Transport Channel =====

    /// Normalize and apply a raw event forwarded by the host
    pub fn handle_primitive_event(
        &mut self,
        session: SessionId,
        event: PrimitiveEvent,
    ) -> Option<PlayerEvent> {
        let envelope = self.transport.normalize(session, event)?;
        self.apply_signal(envelope)
    }

    /// Drain events buffered by the primitive until one changes the state
    ///
    /// Returns `None` once the primitive has nothing left to report.
    pub fn poll(&mut self) -> Option<PlayerEvent> {
        while let Some(envelope) = self.transport.poll() {
            if let Some(event) = self.apply_signal(envelope) {
                return Some(event);
            }
        }
        None
    }

    /// Apply a normalized transport signal
    ///
    /// Signals tagged with anything but the current session are discarded.
    pub fn apply_signal(&mut self, envelope: SignalEnvelope) -> Option<PlayerEvent> {
        let current = self.session.as_ref().map(PlaybackSession::id);
        if current != Some(envelope.session) {
            trace!(signal_session = %envelope.session, "Discarding stale transport signal");
            return None;
        }

        match envelope.signal {
            TransportSignal::DurationKnown {
                duration_secs,
                degraded,
            } => self.resolve_duration(duration_secs, degraded),
            TransportSignal::TimeAdvanced { position_secs } => {
                let session = self.session.as_mut()?;
                session.reported_time = match session.duration {
                    Some(duration) => position_secs.clamp(0.0, duration),
                    None => position_secs.max(0.0),
                };
                Some(PlayerEvent::PositionChanged {
                    position_secs: session.reported_time,
                })
            }
            TransportSignal::Played => self.confirm_play_state(true),
            TransportSignal::Paused => self.confirm_play_state(false),
            TransportSignal::Ended => {
                let session = self.session.as_mut()?;
                session.is_playing = false;
                self.toggle_pending = false;
                debug!(session = %session.id(), "Playback ended");
                Some(PlayerEvent::Ended)
            }
        }
    }

    fn resolve_duration(&mut self, duration_secs: f64, degraded: bool) -> Option<PlayerEvent> {
        if self.state != SyncState::Loading {
            return None;
        }
        self.state = SyncState::Ready;

        let session = self.session.as_mut()?;
        if degraded {
            session.degraded = true;
            session.duration = None;
            if session.target_time.take().is_some() {
                debug!(session = %session.id(), "Dropping buffered seek: duration unknown");
            }
            warn!(session = %session.id(), "Media duration unavailable, scrubbing disabled");
            return Some(PlayerEvent::DurationResolved {
                duration_secs: None,
            });
        }

        session.duration = Some(duration_secs);
        session.reported_time = session.reported_time.clamp(0.0, duration_secs);
        let buffered = session.target_time.take();
        info!(session = %session.id(), duration_secs, "Media ready");

        if let Some(target) = buffered {
            debug!(target_secs = target, "Replaying buffered seek");
            self.request_seek(target);
        }

        Some(PlayerEvent::DurationResolved {
            duration_secs: Some(duration_secs),
        })
    }

    fn confirm_play_state(&mut self, is_playing: bool) -> Option<PlayerEvent> {
        let session = self.session.as_mut()?;
        self.toggle_pending = false;
        if session.is_playing == is_playing {
            return None;
        }
        session.is_playing = is_playing;
        Some(PlayerEvent::PlayStateChanged { is_playing })
    }

    // ===== Request Channel =====

    /// Request a seek to `target_secs`
    ///
    /// Clamped to `[0, duration]`. Within epsilon of the reported time, the
    /// native seek is skipped; either way the reported time moves to the
    /// target at once and the transport's later confirmation may overwrite
    /// it. Buffered while loading, ignored when nothing is loaded or the
    /// session is degraded.
    pub fn request_seek(&mut self, target_secs: f64) {
        if target_secs.is_nan() {
            debug!("Seek ignored: target is NaN");
            return;
        }

        let state = self.state;
        let epsilon = self.config.seek_epsilon_secs;
        let Some(session) = self.session.as_mut() else {
            debug!("Seek ignored: no source loaded");
            return;
        };

        if state == SyncState::Loading {
            session.target_time = Some(target_secs);
            debug!(session = %session.id(), target_secs, "Buffering seek until duration resolves");
            return;
        }

        let Some(duration) = session.duration else {
            debug!(session = %session.id(), "Seek ignored: scrubbing disabled");
            return;
        };

        let target = target_secs.clamp(0.0, duration);
        let drift = (target - session.reported_time).abs();
        session.reported_time = target;

        if drift <= epsilon {
            trace!(target_secs = target, drift, "Seek within tolerance, skipping native seek");
            return;
        }

        debug!(target_secs = target, drift, "Seeking");
        self.transport.seek_to(target);
    }

    /// Request a play/pause transition from the confirmed play state
    ///
    /// While a previous toggle is unconfirmed, further toggles are no-ops so
    /// the primitive never receives conflicting requests. The play state
    /// itself only flips when the transport confirms.
    pub fn request_toggle(&mut self) {
        let Some(session) = self.session.as_ref() else {
            debug!("Toggle ignored: no source loaded");
            return;
        };

        if self.toggle_pending {
            debug!(session = %session.id(), "Toggle ignored: previous request unconfirmed");
            return;
        }

        let playing = session.is_playing;
        self.toggle_pending = true;
        if playing {
            self.transport.pause();
        } else {
            self.transport.play();
        }
    }

    /// Change playback speed
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        self.transport.set_playback_rate(rate)?;
        debug!(rate, "Playback rate changed");
        Ok(())
    }

    // ===== State Queries =====

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_playing)
    }

    pub fn reported_time(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.reported_time)
    }

    pub fn duration(&self) -> Option<f64> {
        self.session.as_ref().and_then(|s| s.duration)
    }

    /// Whether a toggle is waiting for the transport to confirm it
    pub fn is_toggle_pending(&self) -> bool {
        self.toggle_pending
    }

    /// Whether seek requests currently have an effect (or will, once loaded)
    pub fn can_seek(&self) -> bool {
        match self.state {
            SyncState::Unloaded => false,
            SyncState::Loading => true,
            SyncState::Ready => self.duration().is_some(),
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let Some(session) = self.session.as_ref() else {
            return PlaybackSnapshot::unloaded();
        };

        PlaybackSnapshot {
            state: self.state,
            session: Some(session.id()),
            is_playing: session.is_playing,
            position_secs: session.reported_time,
            duration_secs: session.duration,
            degraded: session.degraded,
            progress: session.progress(),
        }
    }

    pub fn transport(&self) -> &TransportAdapter<P> {
        &self.transport
    }

    /// Mutable access for hosts that drive the primitive's own timeline
    pub fn primitive_mut(&mut self) -> &mut P {
        self.transport.primitive_mut()
    }
}
