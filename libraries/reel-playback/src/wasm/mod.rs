//! WASM bindings for reel-playback
//!
//! Adapts an `HTMLVideoElement` as the media primitive and exposes the
//! synchronization core and control surface to JavaScript.

pub mod element;
pub mod player;
pub mod types;

pub use element::HtmlVideoPrimitive;
pub use player::WasmVideoPlayer;
pub use types::WasmPlayerView;
