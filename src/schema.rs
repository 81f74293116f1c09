//! Route schemas: which pages exist, their path templates and filter defaults
//!
//! ```toml
//! [routes.account]
//! path = "/@:accountName"
//!
//! [routes.account.defaults]
//! accountName = { kind = "string", value = "" }
//! page = { kind = "number", value = 1 }
//! filters = { kind = "string_list", value = [] }
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::router::RouteTemplate;
use crate::sync::UrlState;
use crate::types::{FieldValue, FilterState};

/// Pages of the block explorer
pub const BUILTIN_SCHEMA: &str = r#"
[routes.account]
path = "/@:accountName"

[routes.account.defaults]
accountName = { kind = "string", value = "" }
page = { kind = "number", value = 1 }
filters = { kind = "string_list", value = [] }
fromBlock = { kind = "number", value = 0 }
toBlock = { kind = "number", value = 0 }
startDate = { kind = "date", value = "1970-01-01T00:00:00Z" }
endDate = { kind = "date", value = "1970-01-01T00:00:00Z" }
rangeSelectKey = { kind = "string", value = "none" }

[routes.block]
path = "/block/:blockNumber"

[routes.block.defaults]
blockNumber = { kind = "string", value = "" }
filters = { kind = "string_list", value = [] }
virtual = { kind = "bool", value = false }

[routes.transaction]
path = "/transaction/:transactionId"

[routes.transaction.defaults]
transactionId = { kind = "string", value = "" }

[routes.witnesses]
path = "/witnesses"

[routes.witnesses.defaults]
sort = { kind = "string", value = "votes" }
desc = { kind = "bool", value = true }

[routes.block_search]
path = "/block-search"

[routes.block_search.defaults]
accountName = { kind = "string", value = "" }
operations = { kind = "string_list", value = [] }
fromBlock = { kind = "number", value = 0 }
toBlock = { kind = "number", value = 0 }
limit = { kind = "number", value = 100 }
"#;

#[derive(Clone, Debug, Deserialize)]
pub struct RouteSpec {
    pub path: String,
    #[serde(default)]
    pub defaults: BTreeMap<String, FieldValue>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub routes: BTreeMap<String, RouteSpec>,
}

impl Schema {
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_SCHEMA).context("Built-in route schema is invalid")
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let schema: Schema = toml::from_str(s).context("Failed to parse route schema")?;
        // Fail on bad templates at load time rather than on first use
        for name in schema.routes.keys() {
            schema.url_state(name)?;
        }
        Ok(schema)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route schema {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In {}", path.display()))
    }

    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn url_state(&self, name: &str) -> Result<UrlState> {
        let spec = self.routes.get(name).ok_or_else(|| {
            let known = self.route_names().collect::<Vec<_>>().join(", ");
            anyhow!("Unknown route '{name}'. Known routes: {known}")
        })?;
        let route = RouteTemplate::parse(&spec.path)
            .with_context(|| format!("Route '{name}'"))?;
        let defaults: FilterState = spec
            .defaults
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        UrlState::new(route, defaults).with_context(|| format!("Route '{name}'"))
    }
}
