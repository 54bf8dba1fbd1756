//! Control surface
//!
//! Play/pause, rewind/forward and scrubbing actions plus the rendered
//! progress readout. All time changes go through the synchronization core;
//! the surface never touches the primitive.

use crate::primitive::MediaPrimitive;
use crate::sync::SyncCore;
use crate::time::{format_time, progress_ratio};
use crate::types::{PlayerConfig, SyncState, DEFAULT_STEP_SECS};
use serde::Serialize;

/// What the controls display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlView {
    pub state: SyncState,
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    /// Elapsed time as `m:ss`
    pub elapsed: String,
    /// Total time as `m:ss` (`0:00` while unknown)
    pub total: String,
    /// `position / duration` in `[0, 1]`, 0 while the duration is unknown
    pub progress: f64,
    pub can_scrub: bool,
}

impl ControlView {
    /// Label for the play/pause button
    pub fn toggle_label(&self) -> &'static str {
        if self.is_playing {
            "Pause"
        } else {
            "Play"
        }
    }

    /// `elapsed / total`, as shown next to the buttons
    pub fn time_label(&self) -> String {
        format!("{} / {}", self.elapsed, self.total)
    }
}

/// Player controls bound to a fixed step size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSurface {
    step_secs: f64,
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self {
            step_secs: DEFAULT_STEP_SECS,
        }
    }
}

impl ControlSurface {
    /// Create controls with a custom step; non-positive or non-finite steps
    /// fall back to the default
    pub fn new(step_secs: f64) -> Self {
        if step_secs.is_finite() && step_secs > 0.0 {
            Self { step_secs }
        } else {
            Self::default()
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.step_secs)
    }

    pub fn step_secs(&self) -> f64 {
        self.step_secs
    }

    /// Play or pause
    pub fn toggle<P: MediaPrimitive>(&self, core: &mut SyncCore<P>) {
        core.request_toggle();
    }

    /// Jump back one step
    pub fn rewind<P: MediaPrimitive>(&self, core: &mut SyncCore<P>) {
        if core.session().is_some() {
            core.request_seek(core.reported_time() - self.step_secs);
        }
    }

    /// Jump forward one step
    pub fn forward<P: MediaPrimitive>(&self, core: &mut SyncCore<P>) {
        if core.session().is_some() {
            core.request_seek(core.reported_time() + self.step_secs);
        }
    }

    /// Move the scrubber to an absolute time
    pub fn scrub_to<P: MediaPrimitive>(&self, core: &mut SyncCore<P>, position_secs: f64) {
        core.request_seek(position_secs);
    }

    /// Move the scrubber to a fraction of the duration
    ///
    /// Needs a known duration; the ratio is clamped to `[0, 1]`.
    pub fn scrub_to_ratio<P: MediaPrimitive>(&self, core: &mut SyncCore<P>, ratio: f64) {
        if ratio.is_nan() {
            return;
        }
        if let Some(duration) = core.duration() {
            core.request_seek(ratio.clamp(0.0, 1.0) * duration);
        }
    }

    pub fn render<P: MediaPrimitive>(&self, core: &SyncCore<P>) -> ControlView {
        let position_secs = core.reported_time();
        let duration_secs = core.duration();

        ControlView {
            state: core.state(),
            is_playing: core.is_playing(),
            position_secs,
            duration_secs,
            elapsed: format_time(position_secs),
            total: format_time(duration_secs.unwrap_or(0.0)),
            progress: progress_ratio(position_secs, duration_secs),
            can_scrub: core.state() == SyncState::Ready && duration_secs.is_some(),
        }
    }
}
