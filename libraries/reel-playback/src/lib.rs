//! Reel - Playback Synchronization
//!
//! Platform-agnostic video playback synchronization for Reel.
//!
//! This crate provides:
//! - Transport adapter (normalizes a native media element's lifecycle events)
//! - Synchronization core (reconciles transport time with external seeks)
//! - Control surface (play/pause, rewind/forward, scrubbing, progress readout)
//! - A headless simulated primitive for tests and previews
//! - WASM bindings for `HTMLVideoElement` (`wasm` feature)
//!
//! # Architecture
//!
//! The adapter is a leaf, the core depends on the adapter and the surface
//! depends on the core. The only flow in the other direction is the stream of
//! normalized transport signals, each tagged with the session it belongs to.
//!
//! Platform-specific playback is provided via the [`MediaPrimitive`] trait.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use reel_playback::{ControlSurface, SimulatedPrimitive, SyncCore, SyncState};
//!
//! let mut core = SyncCore::new(SimulatedPrimitive::new(10.0));
//! let controls = ControlSurface::default();
//!
//! core.load("https://cdn.example.com/clip.mp4");
//! assert_eq!(core.state(), SyncState::Loading);
//!
//! // The element loads metadata and starts playing on its own timeline
//! controls.toggle(&mut core);
//! core.primitive_mut().advance(0.5);
//! while core.poll().is_some() {}
//!
//! assert_eq!(core.state(), SyncState::Ready);
//! assert!(core.is_playing());
//!
//! // Scrubbing past the end clamps to the duration
//! controls.scrub_to(&mut core, 15.0);
//! assert_eq!(core.reported_time(), 10.0);
//! assert_eq!(controls.render(&core).elapsed, "0:10");
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use reel_playback::{MediaPrimitive, PrimitiveEvent, SessionId, SyncCore};
//!
//! // Implement MediaPrimitive for your platform's player
//! struct MyPlayer {
//!     // ... platform-specific handle
//! }
//!
//! impl MediaPrimitive for MyPlayer {
//!     fn load(&mut self, source_uri: &str, session: SessionId) {
//!         // Open the source, register listeners tagged with `session`
//!     }
//!     fn unload(&mut self) {}
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn set_current_time(&mut self, position_secs: f64) {}
//!     fn set_playback_rate(&mut self, rate: f64) {}
//! }
//!
//! let mut core = SyncCore::new(MyPlayer {});
//! let session = core.load("clip.mp4");
//!
//! // Forward native events as they fire
//! core.handle_primitive_event(session, PrimitiveEvent::LoadedMetadata { duration: 42.0 });
//! core.handle_primitive_event(session, PrimitiveEvent::TimeUpdate { current_time: 1.5 });
//! ```

mod error;
mod events;
mod primitive;
mod session;
mod simulated;
mod surface;
mod sync;
pub mod time;
mod transport;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use primitive::{MediaPrimitive, PrimitiveEvent};
pub use session::{PlaybackSession, SessionId};
pub use simulated::{PrimitiveCalls, SimulatedPrimitive};
pub use surface::{ControlSurface, ControlView};
pub use sync::SyncCore;
pub use time::{format_time, progress_ratio};
pub use transport::{SignalEnvelope, TransportAdapter, TransportSignal};
pub use types::{PlaybackSnapshot, PlayerConfig, SyncState};
