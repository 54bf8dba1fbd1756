//! WASM-compatible video player
//!
//! Wraps the synchronization core around an `HTMLVideoElement` with a
//! JavaScript-friendly API. Element events are drained as they arrive and
//! every state change is reported through the `onChange` callback.

use super::element::{HtmlVideoPrimitive, Waker};
use super::types::WasmPlayerView;
use crate::{ControlSurface, MediaPrimitive, PlayerConfig, PlayerEvent, SyncCore};
use js_sys::Function;
use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::HtmlVideoElement;

type SharedCore = Rc<RefCell<SyncCore<HtmlVideoPrimitive>>>;
type Callback = Rc<RefCell<Option<Function>>>;

/// WASM-compatible video player
#[wasm_bindgen]
pub struct WasmVideoPlayer {
    core: SharedCore,
    surface: ControlSurface,
    on_change: Callback,
}

#[wasm_bindgen]
impl WasmVideoPlayer {
    /// Create a player driving `element`
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlVideoElement) -> Self {
        console_error_panic_hook::set_once();

        let config = PlayerConfig::default();
        let on_change: Callback = Rc::new(RefCell::new(None));
        let slot: Rc<OnceCell<Weak<RefCell<SyncCore<HtmlVideoPrimitive>>>>> =
            Rc::new(OnceCell::new());
        let surface = ControlSurface::from_config(&config);

        let waker: Waker = {
            let slot = Rc::clone(&slot);
            let on_change = Rc::clone(&on_change);
            Rc::new(move || {
                if let Some(core) = slot.get().and_then(Weak::upgrade) {
                    drain(&core, surface, &on_change);
                }
            })
        };

        let core = Rc::new(RefCell::new(SyncCore::new(HtmlVideoPrimitive::new(
            element, waker,
        ))));
        let _ = slot.set(Rc::downgrade(&core));

        Self {
            core,
            surface,
            on_change,
        }
    }

    // ===== Session Lifecycle =====

    /// Bind a new source; returns the session tag
    pub fn load(&self, src: String) -> f64 {
        let session = self.core.borrow_mut().load(src);
        self.notify(None);
        session.as_u64() as f64
    }

    /// Release the current source
    pub fn unload(&self) {
        self.core.borrow_mut().unload();
        self.notify(None);
    }

    // ===== Controls =====

    /// Play or pause
    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&self) {
        self.surface.toggle(&mut self.core.borrow_mut());
        self.notify(None);
    }

    /// Seek to position in seconds
    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&self, position_secs: f64) {
        self.surface
            .scrub_to(&mut self.core.borrow_mut(), position_secs);
        self.notify(None);
    }

    /// Seek to a fraction of the duration (0.0 - 1.0)
    #[wasm_bindgen(js_name = seekToRatio)]
    pub fn seek_to_ratio(&self, ratio: f64) {
        self.surface
            .scrub_to_ratio(&mut self.core.borrow_mut(), ratio);
        self.notify(None);
    }

    /// Jump back one step
    pub fn rewind(&self) {
        self.surface.rewind(&mut self.core.borrow_mut());
        self.notify(None);
    }

    /// Jump forward one step
    pub fn forward(&self) {
        self.surface.forward(&mut self.core.borrow_mut());
        self.notify(None);
    }

    /// Change playback speed
    #[wasm_bindgen(js_name = setPlaybackRate)]
    pub fn set_playback_rate(&self, rate: f64) -> Result<(), JsValue> {
        self.core
            .borrow_mut()
            .set_playback_rate(rate)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // ===== State Queries =====

    /// Current control view
    pub fn view(&self) -> JsValue {
        let view = WasmPlayerView::new(self.surface.render(&self.core.borrow()), None);
        serde_wasm_bindgen::to_value(&view).unwrap_or(JsValue::NULL)
    }

    /// Current position in seconds
    #[wasm_bindgen(js_name = getPosition)]
    pub fn get_position(&self) -> f64 {
        self.core.borrow().reported_time()
    }

    /// Duration in seconds, if known
    #[wasm_bindgen(js_name = getDuration)]
    pub fn get_duration(&self) -> Option<f64> {
        self.core.borrow().duration()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.core.borrow().is_playing()
    }

    // ===== Event Listeners =====

    /// Register change callback, called with the current view
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        *self.on_change.borrow_mut() = Some(callback);
    }
}

impl WasmVideoPlayer {
    /// Report a command's effect, then apply anything queued meanwhile
    fn notify(&self, event: Option<PlayerEvent>) {
        emit(&self.core, self.surface, &self.on_change, event);
        drain(&self.core, self.surface, &self.on_change);
    }
}

/// Apply queued element events, reporting each resulting change
///
/// Skipped while the core is borrowed; the events stay queued and the next
/// wake picks them up.
fn drain(core: &SharedCore, surface: ControlSurface, on_change: &Callback) {
    loop {
        let event = match core.try_borrow_mut() {
            Ok(mut core) => core.poll(),
            Err(_) => return,
        };
        match event {
            Some(event) => emit(core, surface, on_change, Some(event)),
            None => return,
        }
    }
}

fn emit(
    core: &SharedCore,
    surface: ControlSurface,
    on_change: &Callback,
    event: Option<PlayerEvent>,
) {
    deliver(core, surface, on_change, event, |callback, view| {
        if let Ok(value) = serde_wasm_bindgen::to_value(view) {
            callback.call1(&JsValue::NULL, &value).ok();
        }
    });
}

/// Render the view and hand it to the registered callback
///
/// Both borrows end before `call` runs, so the callback may drive the
/// player or replace itself.
fn deliver<P, F, C>(
    core: &RefCell<SyncCore<P>>,
    surface: ControlSurface,
    on_change: &RefCell<Option<F>>,
    event: Option<PlayerEvent>,
    call: C,
) where
    P: MediaPrimitive,
    F: Clone,
    C: FnOnce(&F, &WasmPlayerView),
{
    let (callback, view) = {
        let Ok(callback) = on_change.try_borrow() else {
            return;
        };
        let Some(callback) = callback.clone() else {
            return;
        };
        let Ok(core) = core.try_borrow() else {
            return;
        };
        (
            callback,
            WasmPlayerView::new(surface.render(&core), event.map(|e| e.name())),
        )
    };

    call(&callback, &view);
}
