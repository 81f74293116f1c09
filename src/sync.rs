//! Keeps the browser location in step with a view's filter state
//!
//! The synchronizer never pushes history entries: when the URL has to change
//! it asks the [`Location`] to *replace* the current entry, so tweaking a
//! filter does not pollute back-navigation. Calling [`UrlState::sync`] again
//! with the same state is a no-op, which makes it safe to run on every
//! keystroke.

use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

use crate::codec::{decode, encode, encode_value};
use crate::debug::{self, cat};
use crate::query;
use crate::router::{join_location, split_location, RouteTemplate};
use crate::types::{DefaultState, FilterState, QueryParams};

/// Read/replace access to the current location (path + query)
pub trait Location {
    /// `None` while the router is not ready (e.g. during hydration)
    fn current(&self) -> Option<String>;

    /// Replace the current history entry with `url`
    fn replace(&mut self, url: &str);
}

/// In-memory location; records every replacement
#[derive(Clone, Debug, Default)]
pub struct MemoryLocation {
    url: Option<String>,
    replaced: Vec<String>,
}

impl MemoryLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            replaced: Vec::new(),
        }
    }

    /// A location whose router has not resolved yet
    pub fn not_ready() -> Self {
        Self::default()
    }

    /// URLs passed to `replace`, oldest first
    pub fn replaced(&self) -> &[String] {
        &self.replaced
    }

    /// Simulate navigation outside the synchronizer (link click, back button)
    pub fn navigate(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> Option<String> {
        self.url.clone()
    }

    fn replace(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.replaced.push(url.to_string());
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The location has no current URL yet
    NotReady,
    /// A path parameter is missing or empty in the desired state
    MissingPathParam(String),
    /// The current URL already carries the desired params
    ParamsUnchanged,
    /// The rebuilt URL is identical to the current one
    UrlUnchanged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Replaced(String),
    Skipped(SkipReason),
}

impl SyncOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, SyncOutcome::Replaced(_))
    }
}

/// URL binding for one page: its route template and default filter state.
///
/// The template's parameters are the interpolation params; every one of
/// them must have a default so hydration can type it.
#[derive(Clone, Debug)]
pub struct UrlState {
    route: RouteTemplate,
    defaults: DefaultState,
}

impl UrlState {
    pub fn new(route: RouteTemplate, defaults: DefaultState) -> Result<Self> {
        if let Some(missing) = route.params().find(|p| !defaults.contains_key(p)) {
            return Err(anyhow!(
                "route '{route}' uses path parameter '{missing}' which has no default"
            ));
        }
        Ok(Self { route, defaults })
    }

    pub fn route(&self) -> &RouteTemplate {
        &self.route
    }

    pub fn defaults(&self) -> &DefaultState {
        &self.defaults
    }

    /// Initial state for a view: path params and query merged over defaults
    pub fn hydrate(&self, location: &impl Location) -> FilterState {
        let Some(current) = location.current() else {
            return self.defaults.clone();
        };
        let (path, qs) = split_location(&current);
        let mut params = self.query_without_path_params(qs);
        if let Some(path_params) = self.route.extract(path) {
            params.extend(path_params);
        }
        decode(&params, &self.defaults)
    }

    /// Decide what `sync` would do for `current`, without side effects
    pub fn plan(&self, current: Option<&str>, desired: &FilterState) -> SyncOutcome {
        let Some(current) = current else {
            return SyncOutcome::Skipped(SkipReason::NotReady);
        };

        let (path_values, query_params) = match self.split_state(desired) {
            Ok(parts) => parts,
            Err(missing) => return SyncOutcome::Skipped(SkipReason::MissingPathParam(missing)),
        };

        if let Some(current_params) = self.current_params(current) {
            let mut desired_params = query_params.clone();
            desired_params.extend(path_values.iter().map(|(k, v)| (k.clone(), v.clone())));
            if query::shallow_equal(&desired_params, &current_params) {
                return SyncOutcome::Skipped(SkipReason::ParamsUnchanged);
            }
        }

        let url = match self.build_url(&path_values, &query_params) {
            Ok(url) => url,
            Err(e) => {
                debug::log(cat::SYNC, format!("cannot build url: {e}"));
                return SyncOutcome::Skipped(SkipReason::NotReady);
            }
        };
        if url == current.trim() {
            return SyncOutcome::Skipped(SkipReason::UrlUnchanged);
        }
        SyncOutcome::Replaced(url)
    }

    /// Replace the location if it does not reflect `desired` yet
    pub fn sync(&self, location: &mut impl Location, desired: &FilterState) -> SyncOutcome {
        let current = location.current();
        let outcome = self.plan(current.as_deref(), desired);
        match &outcome {
            SyncOutcome::Replaced(url) => {
                debug::log(cat::SYNC, format!("replace -> {url}"));
                location.replace(url);
            }
            SyncOutcome::Skipped(reason) => {
                debug::log(cat::SYNC, format!("skip: {reason:?}"));
            }
        }
        outcome
    }

    /// Link for `state`: interpolated path plus the non-default query params
    pub fn url_for(&self, state: &FilterState) -> Result<String> {
        let (path_values, query_params) = self
            .split_state(state)
            .map_err(|name| anyhow!("path parameter '{name}' is empty"))?;
        self.build_url(&path_values, &query_params)
    }

    /// Path parameter text and query params for `state`.
    /// `Err` names the first path parameter that is missing or empty.
    fn split_state(
        &self,
        state: &FilterState,
    ) -> std::result::Result<(BTreeMap<String, String>, QueryParams), String> {
        let mut path_values = BTreeMap::new();
        for name in self.route.params() {
            let text = state.get(name).map(encode_value).unwrap_or_default();
            if text.is_empty() {
                return Err(name.to_string());
            }
            path_values.insert(name.to_string(), text);
        }

        let mut query_params = encode(state, &self.defaults);
        for name in self.route.params() {
            query_params.remove(name);
        }
        Ok((path_values, query_params))
    }

    fn build_url(
        &self,
        path_values: &BTreeMap<String, String>,
        query_params: &QueryParams,
    ) -> Result<String> {
        let path = self.route.interpolate(path_values)?;
        Ok(join_location(&path, &query::serialize(query_params)))
    }

    /// Query params of `current` plus the path params the template extracts.
    /// `None` when the path does not match the route.
    fn current_params(&self, current: &str) -> Option<QueryParams> {
        let (path, qs) = split_location(current);
        let path_params = self.route.extract(path)?;
        let mut params = self.query_without_path_params(qs);
        params.extend(path_params);
        Some(params)
    }

    /// Path params live in the path only; same-named query keys are noise
    fn query_without_path_params(&self, qs: &str) -> QueryParams {
        let mut params = query::parse(qs);
        for name in self.route.params() {
            params.remove(name);
        }
        params
    }
}
