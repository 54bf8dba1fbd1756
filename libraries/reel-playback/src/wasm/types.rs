//! WASM-compatible type definitions

use crate::surface::ControlView;
use serde::Serialize;

/// Control view with JS naming, handed to `onChange` callbacks
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WasmPlayerView {
    state: &'static str,
    is_playing: bool,
    position_secs: f64,
    duration_secs: Option<f64>,
    elapsed: String,
    total: String,
    progress: f64,
    can_scrub: bool,
    toggle_label: &'static str,
    /// Name of the event that caused this update, if any
    event: Option<&'static str>,
}

impl WasmPlayerView {
    pub(crate) fn new(view: ControlView, event: Option<&'static str>) -> Self {
        Self {
            state: view.state.as_str(),
            is_playing: view.is_playing,
            position_secs: view.position_secs,
            duration_secs: view.duration_secs,
            toggle_label: view.toggle_label(),
            elapsed: view.elapsed,
            total: view.total,
            progress: view.progress,
            can_scrub: view.can_scrub,
            event,
        }
    }
}
