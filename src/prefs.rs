//! Endpoint preferences
//!
//! Two string preferences select which API and RPC endpoints the explorer
//! talks to. They live in a key/value store (browser `localStorage`, a JSON
//! file on native), are read once at start and written only when the user
//! picks or resets an endpoint.

use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::config::validate_url;
use crate::constants::prefs::{
    API_ENDPOINT_KEY, DEFAULT_API_ENDPOINT, DEFAULT_RPC_ENDPOINT, RPC_ENDPOINT_KEY,
};
use crate::debug::{self, cat};

/// String key/value persistence
pub trait PrefStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Non-persistent store (tests, and browsers with storage disabled)
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Api,
    Rpc,
}

impl Endpoint {
    pub fn key(self) -> &'static str {
        match self {
            Endpoint::Api => API_ENDPOINT_KEY,
            Endpoint::Rpc => RPC_ENDPOINT_KEY,
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "api" => Ok(Endpoint::Api),
            "rpc" | "node" => Ok(Endpoint::Rpc),
            _ => Err(anyhow!("Invalid endpoint '{s}'. Valid options: api, rpc")),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Api => write!(f, "api"),
            Endpoint::Rpc => write!(f, "rpc"),
        }
    }
}

/// Endpoint URLs in effect
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub rpc: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            api: DEFAULT_API_ENDPOINT.to_string(),
            rpc: DEFAULT_RPC_ENDPOINT.to_string(),
        }
    }
}

impl Endpoints {
    pub fn get(&self, which: Endpoint) -> &str {
        match which {
            Endpoint::Api => &self.api,
            Endpoint::Rpc => &self.rpc,
        }
    }

    fn slot(&mut self, which: Endpoint) -> &mut String {
        match which {
            Endpoint::Api => &mut self.api,
            Endpoint::Rpc => &mut self.rpc,
        }
    }
}

/// Stored endpoint selections layered over configured fallbacks
#[derive(Clone, Debug)]
pub struct EndpointPrefs {
    current: Endpoints,
    fallback: Endpoints,
}

impl EndpointPrefs {
    /// Read both preferences once. Stored values that are not valid URLs
    /// are ignored in favor of `fallback`.
    pub fn load(store: &impl PrefStore, fallback: Endpoints) -> Self {
        let mut current = fallback.clone();
        for which in [Endpoint::Api, Endpoint::Rpc] {
            if let Some(stored) = store.get(which.key()) {
                match validate_url(&stored, which.key()) {
                    Ok(()) => *current.slot(which) = stored,
                    Err(e) => log::warn!("ignoring stored {which} endpoint: {e}"),
                }
            }
        }
        debug::log(
            cat::PREFS,
            format!("endpoints api={} rpc={}", current.api, current.rpc),
        );
        Self { current, fallback }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.current
    }

    pub fn get(&self, which: Endpoint) -> &str {
        self.current.get(which)
    }

    /// Select and persist an endpoint
    pub fn set(&mut self, store: &mut impl PrefStore, which: Endpoint, url: &str) -> Result<()> {
        let url = url.trim();
        validate_url(url, which.key())?;
        store.set(which.key(), url)?;
        *self.current.slot(which) = url.to_string();
        debug::log(cat::PREFS, format!("{which} endpoint set to {url}"));
        Ok(())
    }

    /// Forget the stored selection and return to the fallback
    pub fn reset(&mut self, store: &mut impl PrefStore, which: Endpoint) -> Result<()> {
        store.remove(which.key())?;
        *self.current.slot(which) = self.fallback.get(which).to_string();
        debug::log(cat::PREFS, format!("{which} endpoint reset"));
        Ok(())
    }

    /// True when the endpoint differs from the fallback
    pub fn is_custom(&self, which: Endpoint) -> bool {
        self.current.get(which) != self.fallback.get(which)
    }
}
