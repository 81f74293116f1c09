//! Platform abstraction (browser location, preference storage).

#[cfg(all(target_arch = "wasm32", feature = "dom-web"))]
mod web;
#[cfg(all(target_arch = "wasm32", feature = "dom-web"))]
pub use web::{BrowserLocation, LocalStorage};

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

// Re-export the in-memory implementations shared by every target
pub use crate::prefs::MemoryStore;
pub use crate::sync::MemoryLocation;
