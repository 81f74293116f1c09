//! Endpoint preference tests - get/set/remove against the stores

use explorer_params::constants::prefs::{API_ENDPOINT_KEY, DEFAULT_RPC_ENDPOINT, RPC_ENDPOINT_KEY};
use explorer_params::platform::{FileStore, MemoryStore};
use explorer_params::{Endpoint, EndpointPrefs, Endpoints, PrefStore};

fn fallback() -> Endpoints {
    Endpoints {
        api: "https://api.example.com".to_string(),
        rpc: "https://rpc.example.com".to_string(),
    }
}

#[test]
fn load_prefers_stored_values() {
    let mut store = MemoryStore::new();
    store.set(API_ENDPOINT_KEY, "https://mirror.example.org/api").unwrap();
    let prefs = EndpointPrefs::load(&store, fallback());
    assert_eq!(prefs.get(Endpoint::Api), "https://mirror.example.org/api");
    assert_eq!(prefs.get(Endpoint::Rpc), "https://rpc.example.com");
    assert!(prefs.is_custom(Endpoint::Api));
    assert!(!prefs.is_custom(Endpoint::Rpc));
}

#[test]
fn set_writes_through_and_reset_removes() {
    let mut store = MemoryStore::new();
    let mut prefs = EndpointPrefs::load(&store, fallback());

    prefs
        .set(&mut store, Endpoint::Rpc, " wss://node.example.net ")
        .unwrap();
    assert_eq!(prefs.get(Endpoint::Rpc), "wss://node.example.net");
    assert_eq!(
        store.get(RPC_ENDPOINT_KEY).as_deref(),
        Some("wss://node.example.net")
    );

    prefs.reset(&mut store, Endpoint::Rpc).unwrap();
    assert_eq!(prefs.get(Endpoint::Rpc), "https://rpc.example.com");
    assert_eq!(store.get(RPC_ENDPOINT_KEY), None);
}

#[test]
fn invalid_url_is_rejected_and_not_stored() {
    let mut store = MemoryStore::new();
    let mut prefs = EndpointPrefs::load(&store, fallback());
    assert!(prefs.set(&mut store, Endpoint::Api, "api.example.com").is_err());
    assert_eq!(store.get(API_ENDPOINT_KEY), None);
    assert_eq!(prefs.get(Endpoint::Api), "https://api.example.com");
}

#[test]
fn default_endpoints_are_valid() {
    let prefs = EndpointPrefs::load(&MemoryStore::new(), Endpoints::default());
    assert_eq!(prefs.get(Endpoint::Rpc), DEFAULT_RPC_ENDPOINT);
}

#[test]
fn file_store_persists_selection_across_loads() {
    let path = std::env::temp_dir()
        .join(format!("explorer-params-it-{}", std::process::id()))
        .join("prefs.json");

    {
        let mut store = FileStore::open(&path).unwrap();
        let mut prefs = EndpointPrefs::load(&store, fallback());
        prefs
            .set(&mut store, Endpoint::Api, "http://localhost:3000")
            .unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    let prefs = EndpointPrefs::load(&store, fallback());
    assert_eq!(prefs.get(Endpoint::Api), "http://localhost:3000");

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

/// Counts reads so tests can see when the store is consulted
struct CountingStore {
    inner: MemoryStore,
    reads: std::cell::Cell<usize>,
}

impl PrefStore for CountingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.reads.set(self.reads.get() + 1);
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.inner.remove(key)
    }
}

#[test]
fn store_is_read_only_at_load() {
    let mut store = CountingStore {
        inner: MemoryStore::new(),
        reads: std::cell::Cell::new(0),
    };
    let mut prefs = EndpointPrefs::load(&store, fallback());
    let after_load = store.reads.get();

    for _ in 0..3 {
        assert_eq!(prefs.get(Endpoint::Api), "https://api.example.com");
    }
    prefs
        .set(&mut store, Endpoint::Api, "https://mirror.example.org/api")
        .unwrap();
    assert_eq!(prefs.get(Endpoint::Api), "https://mirror.example.org/api");
    prefs.reset(&mut store, Endpoint::Api).unwrap();
    assert_eq!(prefs.get(Endpoint::Api), "https://api.example.com");

    assert_eq!(store.reads.get(), after_load);
}
