//! Minimal JS -> Rust surface for the explorer front end.
//!
//! `explorer_init` also reads the endpoint preferences; later endpoint calls
//! use that copy and write changes through to localStorage.
//!
//! The page calls `explorer_hydrate` when a view mounts and `explorer_sync`
//! whenever its filter state changes. State crosses the boundary as JSON in
//! the tagged form (`{"page": {"kind": "number", "value": 2}}`).
//!
//! # Example
//! ```javascript
//! explorer_init();
//! const state = JSON.parse(explorer_hydrate("account"));
//! state.page = { kind: "number", value: 2 };
//! explorer_sync("account", JSON.stringify(state)); // "replaced:/@alice?page=2"
//! ```

#![cfg(all(target_arch = "wasm32", feature = "dom-web"))]

use std::cell::{OnceCell, RefCell};

use wasm_bindgen::prelude::*;

use crate::platform::{BrowserLocation, LocalStorage};
use crate::prefs::{Endpoint, EndpointPrefs, Endpoints};
use crate::schema::Schema;
use crate::sync::{SyncOutcome, UrlState};
use crate::types::FilterState;

thread_local! {
    // Endpoint prefs are read from localStorage once per page load
    static PREFS: OnceCell<RefCell<EndpointPrefs>> = const { OnceCell::new() };
}

fn with_prefs<R>(f: impl FnOnce(&mut EndpointPrefs) -> R) -> R {
    PREFS.with(|cell| {
        let prefs = cell.get_or_init(|| {
            RefCell::new(EndpointPrefs::load(&LocalStorage, Endpoints::default()))
        });
        f(&mut prefs.borrow_mut())
    })
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn url_state(route: &str) -> Result<UrlState, JsValue> {
    Schema::builtin()
        .and_then(|schema| schema.url_state(route))
        .map_err(js_err)
}

/// Install the panic hook and logger, and read debug categories.
#[wasm_bindgen]
pub fn explorer_init() {
    console_error_panic_hook::set_once();
    let _ = wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    crate::debug::init_from_url_and_storage_once();
    with_prefs(|_| ());
}

/// Initial filter state for `route` from the current page URL.
#[wasm_bindgen]
pub fn explorer_hydrate(route: String) -> Result<String, JsValue> {
    let state = url_state(&route)?.hydrate(&BrowserLocation);
    serde_json::to_string(&state).map_err(js_err)
}

/// Bring the page URL in line with `state_json`.
///
/// Returns `replaced:<url>` or `skipped:<reason>`.
#[wasm_bindgen]
pub fn explorer_sync(route: String, state_json: String) -> Result<String, JsValue> {
    let desired: FilterState = serde_json::from_str(&state_json).map_err(js_err)?;
    let mut location = BrowserLocation;
    Ok(match url_state(&route)?.sync(&mut location, &desired) {
        SyncOutcome::Replaced(url) => format!("replaced:{url}"),
        SyncOutcome::Skipped(reason) => format!("skipped:{reason:?}"),
    })
}

/// Selected endpoint URL (`api` or `rpc`).
#[wasm_bindgen]
pub fn explorer_endpoint(which: String) -> Result<String, JsValue> {
    let which: Endpoint = which.parse().map_err(js_err)?;
    Ok(with_prefs(|prefs| prefs.get(which).to_string()))
}

#[wasm_bindgen]
pub fn explorer_set_endpoint(which: String, url: String) -> Result<(), JsValue> {
    let which: Endpoint = which.parse().map_err(js_err)?;
    with_prefs(|prefs| prefs.set(&mut LocalStorage, which, &url)).map_err(js_err)
}

#[wasm_bindgen]
pub fn explorer_reset_endpoint(which: String) -> Result<(), JsValue> {
    let which: Endpoint = which.parse().map_err(js_err)?;
    with_prefs(|prefs| prefs.reset(&mut LocalStorage, which)).map_err(js_err)
}
