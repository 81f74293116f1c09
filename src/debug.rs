//! Filterable debug logging for the codec and synchronizer
//!
//! Categories: CODEC, SYNC, ROUTER, PREFS
//! Enable via: ?explorer_debug=all, localStorage.setItem('explorer.debug','sync,codec'),
//! or `--debug sync,codec` on the CLI.
//!
//! Enabled categories are emitted through the `log` facade at info level.

use std::sync::atomic::{AtomicU32, Ordering};

pub mod cat {
    pub const CODEC: u32 = 1 << 0;
    pub const SYNC: u32 = 1 << 1;
    pub const ROUTER: u32 = 1 << 2;
    pub const PREFS: u32 = 1 << 3;
    pub const ALL: u32 = 0xffff_ffff;
}

static MASK: AtomicU32 = AtomicU32::new(0);

#[inline]
pub fn mask() -> u32 {
    MASK.load(Ordering::Relaxed)
}

#[inline]
pub fn set(mask: u32) {
    MASK.store(mask, Ordering::Relaxed)
}

#[inline]
pub fn enable(bits: u32) {
    MASK.fetch_or(bits, Ordering::Relaxed);
}

#[inline]
pub fn disable(bits: u32) {
    MASK.fetch_and(!bits, Ordering::Relaxed);
}

#[inline]
pub fn is(cat: u32) -> bool {
    (MASK.load(Ordering::Relaxed) & cat) != 0
}

#[inline]
pub fn cat_name(cat: u32) -> &'static str {
    match cat {
        c if c == cat::CODEC => "codec",
        c if c == cat::SYNC => "sync",
        c if c == cat::ROUTER => "router",
        c if c == cat::PREFS => "prefs",
        _ => "misc",
    }
}

/// Parse a comma-separated category list into a mask.
/// Unknown names are ignored; `none` resets what came before it.
pub fn parse_list(list: &str) -> u32 {
    let mut m: u32 = 0;
    for tok in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        match tok.as_str() {
            "" => {}
            "none" => m = 0,
            "all" => m = cat::ALL,
            "codec" => m |= cat::CODEC,
            "sync" => m |= cat::SYNC,
            "router" => m |= cat::ROUTER,
            "prefs" => m |= cat::PREFS,
            _ => {}
        }
    }
    m
}

#[inline]
pub fn set_from_list(list: &str) {
    set(parse_list(list));
}

/// Enable categories named by the debug query parameter, if present
pub fn init_from_query(qs: &str) {
    let params = crate::query::parse(qs);
    if let Some(list) = params.get(crate::constants::DEBUG_QUERY_PARAM) {
        enable(parse_list(list));
    }
}

#[cfg(all(target_arch = "wasm32", feature = "dom-web"))]
pub fn init_from_url_and_storage_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Some(win) = web_sys::window() {
            if let Ok(search) = win.location().search() {
                init_from_query(&search);
            }
            if let Ok(Some(storage)) = win.local_storage() {
                if let Ok(Some(v)) = storage.get_item(crate::constants::prefs::DEBUG_KEY) {
                    enable(parse_list(&v));
                }
            }
        }
        log(cat::SYNC, "debug init (wasm) complete");
    });
}

#[cfg(not(all(target_arch = "wasm32", feature = "dom-web")))]
pub fn init_from_url_and_storage_once() {
    // Native builds configure categories from the CLI/env instead.
}

#[inline]
pub fn log(cat: u32, msg: impl AsRef<str>) {
    if !is(cat) {
        return;
    }
    log::info!("[explorer][{}] {}", cat_name(cat), msg.as_ref());
}
