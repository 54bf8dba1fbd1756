//! `HTMLVideoElement` media primitive
//!
//! DOM listeners are registered per session and push tagged events into a
//! shared queue, then call the waker so the owner can drain them. Listeners
//! of a replaced source are removed before the new ones are attached.

use crate::primitive::{MediaPrimitive, PrimitiveEvent};
use crate::session::SessionId;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

type EventQueue = Rc<RefCell<VecDeque<(SessionId, PrimitiveEvent)>>>;

/// Called after an event has been queued
pub type Waker = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy)]
enum MediaEventKind {
    LoadedMetadata,
    TimeUpdate,
    Play,
    Pause,
    Ended,
}

impl MediaEventKind {
    const ALL: [MediaEventKind; 5] = [
        MediaEventKind::LoadedMetadata,
        MediaEventKind::TimeUpdate,
        MediaEventKind::Play,
        MediaEventKind::Pause,
        MediaEventKind::Ended,
    ];

    fn dom_name(self) -> &'static str {
        match self {
            MediaEventKind::LoadedMetadata => "loadedmetadata",
            MediaEventKind::TimeUpdate => "timeupdate",
            MediaEventKind::Play => "play",
            MediaEventKind::Pause => "pause",
            MediaEventKind::Ended => "ended",
        }
    }

    fn read(self, element: &HtmlVideoElement) -> PrimitiveEvent {
        match self {
            MediaEventKind::LoadedMetadata => PrimitiveEvent::LoadedMetadata {
                duration: element.duration(),
            },
            MediaEventKind::TimeUpdate => PrimitiveEvent::TimeUpdate {
                current_time: element.current_time(),
            },
            MediaEventKind::Play => PrimitiveEvent::Play,
            MediaEventKind::Pause => PrimitiveEvent::Pause,
            MediaEventKind::Ended => PrimitiveEvent::Ended,
        }
    }
}

/// Media primitive backed by a DOM video element
pub struct HtmlVideoPrimitive {
    element: HtmlVideoElement,
    queue: EventQueue,
    waker: Waker,
    session: Option<SessionId>,
    listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

impl HtmlVideoPrimitive {
    pub fn new(element: HtmlVideoElement, waker: Waker) -> Self {
        Self {
            element,
            queue: Rc::new(RefCell::new(VecDeque::with_capacity(16))),
            waker,
            session: None,
            listeners: Vec::with_capacity(MediaEventKind::ALL.len()),
        }
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }

    fn register(&mut self, session: SessionId) {
        for kind in MediaEventKind::ALL {
            let element = self.element.clone();
            let queue = Rc::clone(&self.queue);
            let waker = Rc::clone(&self.waker);

            let callback = Closure::wrap(Box::new(move || {
                queue.borrow_mut().push_back((session, kind.read(&element)));
                waker();
            }) as Box<dyn FnMut()>);

            if let Err(e) = self
                .element
                .add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref())
            {
                warn!(
                    event = kind.dom_name(),
                    session = %session,
                    error = ?e,
                    "Failed to attach media listener"
                );
            }
            self.listeners.push((kind.dom_name(), callback));
        }
    }

    fn release(&mut self) {
        for (name, callback) in self.listeners.drain(..) {
            if let Err(e) = self
                .element
                .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
            {
                warn!(event = name, error = ?e, "Failed to detach media listener");
            }
        }
    }
}

impl MediaPrimitive for HtmlVideoPrimitive {
    fn load(&mut self, source_uri: &str, session: SessionId) {
        self.release();
        self.session = Some(session);
        self.register(session);
        self.element.set_src(source_uri);
        self.element.load();
    }

    fn unload(&mut self) {
        self.release();
        self.session = None;
        let _ = self.element.pause();
        let _ = self.element.remove_attribute("src");
        self.element.load();
    }

    fn play(&mut self) {
        let Some(session) = self.session else {
            return;
        };

        // A failed or rejected play() (autoplay policy, unsupported source)
        // fires no pause event, so report one to settle the pending toggle
        match self.element.play() {
            Ok(promise) => {
                let queue = Rc::clone(&self.queue);
                let waker = Rc::clone(&self.waker);
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        debug!(session = %session, error = ?e, "play() rejected");
                        queue
                            .borrow_mut()
                            .push_back((session, PrimitiveEvent::Pause));
                        waker();
                    }
                });
            }
            Err(e) => {
                warn!(session = %session, error = ?e, "play() failed");
                self.queue
                    .borrow_mut()
                    .push_back((session, PrimitiveEvent::Pause));
                (self.waker)();
            }
        }
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn set_current_time(&mut self, position_secs: f64) {
        self.element.set_current_time(position_secs);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.element.set_playback_rate(rate);
    }

    fn poll_event(&mut self) -> Option<(SessionId, PrimitiveEvent)> {
        self.queue.borrow_mut().pop_front()
    }
}

impl Drop for HtmlVideoPrimitive {
    fn drop(&mut self) {
        self.release();
    }
}
