// Native binary for explorer-params - command line link tool

use anyhow::{anyhow, Context, Result};

use explorer_params::{
    codec,
    config::{self, Command, Config, PrefsAction},
    debug,
    platform::{FileStore, MemoryLocation},
    schema::Schema,
    EndpointPrefs, FilterState, SyncOutcome, UrlState,
};

fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (cfg, command) = config::load().context("Failed to load configuration")?;
    debug::set_from_list(&cfg.debug);
    if !cfg.debug.is_empty() {
        cfg.print_summary();
    }

    match command {
        Command::Routes => {
            let schema = load_schema(&cfg)?;
            for name in schema.route_names() {
                let state = schema.url_state(name)?;
                let fields: Vec<String> = state
                    .defaults()
                    .iter()
                    .map(|(k, v)| format!("{k}:{}", v.kind()))
                    .collect();
                println!("{name:<14} {:<30} {}", state.route(), fields.join(" "));
            }
        }
        Command::Encode { route, fields } => {
            let state = load_schema(&cfg)?.url_state(&route)?;
            let desired = apply_fields(&state, state.defaults().clone(), &fields)?;
            println!("{}", state.url_for(&desired)?);
        }
        Command::Decode { route, url } => {
            let state = load_schema(&cfg)?.url_state(&route)?;
            let decoded = state.hydrate(&MemoryLocation::new(url));
            println!("{}", serde_json::to_string_pretty(&decoded.to_json())?);
        }
        Command::Sync { route, url, fields } => {
            let state = load_schema(&cfg)?.url_state(&route)?;
            let mut location = MemoryLocation::new(url);
            let current = state.hydrate(&location);
            let desired = apply_fields(&state, current, &fields)?;
            match state.sync(&mut location, &desired) {
                SyncOutcome::Replaced(url) => println!("replace {url}"),
                SyncOutcome::Skipped(reason) => println!("unchanged ({reason:?})"),
            }
        }
        Command::Prefs { action } => {
            let mut store = FileStore::open(&cfg.prefs_path)?;
            let mut prefs = EndpointPrefs::load(&store, cfg.endpoints.clone());
            match action {
                PrefsAction::Show => {}
                PrefsAction::Set { endpoint, url } => prefs.set(&mut store, endpoint, &url)?,
                PrefsAction::Reset { endpoint } => prefs.reset(&mut store, endpoint)?,
            }
            let endpoints = prefs.endpoints();
            println!("api {}", endpoints.api);
            println!("rpc {}", endpoints.rpc);
        }
    }

    Ok(())
}

fn load_schema(cfg: &Config) -> Result<Schema> {
    match &cfg.schema_path {
        Some(path) => Schema::load(path),
        None => Schema::builtin(),
    }
}

/// Apply `FIELD=VALUE` arguments on top of `base`, typed by the route defaults.
/// Unlike URL decoding, a bad value here is reported instead of ignored.
fn apply_fields(state: &UrlState, mut base: FilterState, fields: &[String]) -> Result<FilterState> {
    for field in fields {
        let (key, raw) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected FIELD=VALUE, got '{field}'"))?;
        let kind = state
            .defaults()
            .kind_of(key)
            .ok_or_else(|| anyhow!("Route '{}' has no field '{key}'", state.route()))?;
        let value = if raw.is_empty() {
            state.defaults().get(key).cloned().unwrap_or_else(|| raw.into())
        } else {
            codec::decode_value(raw, kind)
                .ok_or_else(|| anyhow!("'{raw}' is not a valid {kind} for field '{key}'"))?
        };
        base.insert(key, value);
    }
    Ok(base)
}
