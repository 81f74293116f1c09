//! explorer-params - URL state for a blockchain block explorer
//!
//! The explorer keeps every page's filter/search state (account, page,
//! operation filters, block and date ranges) in the URL so views can be
//! shared. This crate owns that contract:
//!
//! - [`codec`]: typed [`FilterState`] <-> flat [`QueryParams`], omitting
//!   defaults, falling back to defaults on malformed input
//! - [`sync`]: replaces the current location only when it does not already
//!   reflect the desired state
//! - [`router`]: path templates such as `/@:accountName`
//! - [`prefs`]: the two persisted endpoint selections
//!
//! ## Usage
//!
//! ```rust
//! use explorer_params::{codec, FilterState};
//!
//! let defaults = FilterState::new().with("page", 1).with("query", "");
//! let state = FilterState::new().with("page", 2).with("query", "");
//! let params = codec::encode(&state, &defaults);
//! assert_eq!(params.len(), 1);
//! assert_eq!(codec::decode(&params, &defaults), state);
//! ```
//!
//! For the command line tool:
//! ```bash
//! cargo run -- encode account accountName=alice page=2
//! ```

// Core modules (available on all platforms)
pub mod codec;
pub mod config;
pub mod constants;
pub mod query;
pub mod router;
pub mod schema;
pub mod sync;
pub mod types;

// Endpoint preferences (key/value persistence)
pub mod prefs;

// Debug logging system (available on all platforms)
pub mod debug;

// Platform abstraction layer
pub mod platform;

// WASM-facing exports (JS -> Rust) are only built for the browser.
#[cfg(all(target_arch = "wasm32", feature = "dom-web"))]
pub mod wasm_api;

// Re-export commonly used types
pub use prefs::{Endpoint, EndpointPrefs, Endpoints, PrefStore};
pub use router::RouteTemplate;
pub use sync::{Location, SkipReason, SyncOutcome, UrlState};
pub use types::{DefaultState, FieldKind, FieldValue, FilterState, QueryParams};
