//! Web platform implementation (window.location, history, localStorage)

use anyhow::{anyhow, Result};
use wasm_bindgen::JsValue;
use web_sys::window;

use crate::prefs::PrefStore;
use crate::sync::Location;

/// The page's own location; replacements go through `history.replaceState`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocation;

impl Location for BrowserLocation {
    fn current(&self) -> Option<String> {
        let loc = window()?.location();
        let path = loc.pathname().ok()?;
        let search = loc.search().unwrap_or_default();
        Some(format!("{path}{search}"))
    }

    fn replace(&mut self, url: &str) {
        if let Some(win) = window() {
            if let Ok(hist) = win.history() {
                if let Err(e) = hist.replace_state_with_url(&JsValue::NULL, "", Some(url)) {
                    log::warn!("history.replaceState failed: {e:?}");
                }
            }
        }
    }
}

/// `window.localStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        window()
            .and_then(|win| win.local_storage().ok().flatten())
            .ok_or_else(|| anyhow!("localStorage is not available"))
    }
}

impl PrefStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| anyhow!("localStorage.setItem({key}) failed: {e:?}"))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| anyhow!("localStorage.removeItem({key}) failed: {e:?}"))
    }
}
