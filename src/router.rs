//! Route path templates for explorer pages
//!
//! A template is a slash-separated path where a segment may hold a parameter
//! introduced by `:`, optionally after a literal prefix:
//!
//! - `/block/:blockNumber` - block details
//! - `/@:accountName` - account operations (`@` literal, then the name)
//! - `/transaction/:transactionId`
//! - `/witnesses` - no parameters
//!
//! Parameters are the filter fields embedded in the path itself; they must
//! be non-empty to build a URL.
//!
//! ## Example
//!
//! ```rust
//! use explorer_params::router::RouteTemplate;
//! use std::collections::BTreeMap;
//!
//! let route = RouteTemplate::parse("/@:accountName").unwrap();
//! let mut values = BTreeMap::new();
//! values.insert("accountName".to_string(), "alice".to_string());
//! assert_eq!(route.interpolate(&values).unwrap(), "/@alice");
//! assert_eq!(route.extract("/@alice?page=2").unwrap()["accountName"], "alice");
//! ```

use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

use crate::debug::{self, cat};

/// Strip query and fragment from URL path
#[inline]
pub fn strip_query_frag(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'?' || b == b'#' {
            return &s[..i];
        }
    }
    s
}

/// Split a location into `(path, query)`; the query excludes `?` and any
/// fragment. A location without a path is treated as `/`.
pub fn split_location(url: &str) -> (&str, &str) {
    let url = url.trim();
    let path = strip_query_frag(url);
    let rest = &url[path.len()..];
    let query = rest
        .strip_prefix('?')
        .map(|q| q.split('#').next().unwrap_or_default())
        .unwrap_or("");
    let path = if path.is_empty() { "/" } else { path };
    (path, query)
}

/// `path` plus `?query` when the query is non-empty
pub fn join_location(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { prefix: String, name: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !trimmed.starts_with('/') {
            return Err(anyhow!("route template '{raw}' must start with '/'"));
        }

        let mut segments = Vec::new();
        for seg in trimmed.split('/').filter(|s| !s.is_empty()) {
            match seg.split_once(':') {
                Some((prefix, name)) => {
                    if name.is_empty()
                        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(anyhow!(
                            "route template '{raw}' has an invalid parameter in segment '{seg}'"
                        ));
                    }
                    let duplicate = segments.iter().any(
                        |s| matches!(s, Segment::Param { name: n, .. } if n == name),
                    );
                    if duplicate {
                        return Err(anyhow!(
                            "route template '{raw}' repeats parameter '{name}'"
                        ));
                    }
                    segments.push(Segment::Param {
                        prefix: prefix.to_string(),
                        name: name.to_string(),
                    });
                }
                None => segments.push(Segment::Literal(seg.to_string())),
            }
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters embedded in the path, in path order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Build the concrete path. Values are percent-encoded.
    pub fn interpolate(&self, values: &BTreeMap<String, String>) -> Result<String> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }
        let mut path = String::new();
        for seg in &self.segments {
            path.push('/');
            match seg {
                Segment::Literal(lit) => path.push_str(lit),
                Segment::Param { prefix, name } => {
                    let value = values
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| anyhow!("path parameter '{name}' is empty"))?;
                    path.push_str(prefix);
                    path.push_str(&urlencoding::encode(value));
                }
            }
        }
        Ok(path)
    }

    /// Read parameter values out of a concrete path.
    ///
    /// Returns `None` when the path does not match the template. Query,
    /// fragment and extra slashes are ignored.
    pub fn extract(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let path = strip_query_frag(path.trim());
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            debug::log(
                cat::ROUTER,
                format!("'{path}' does not match '{}'", self.raw),
            );
            return None;
        }

        let mut values = BTreeMap::new();
        for (seg, part) in self.segments.iter().zip(parts) {
            match seg {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param { prefix, name } => {
                    let rest = part.strip_prefix(prefix.as_str())?;
                    if rest.is_empty() {
                        return None;
                    }
                    let value = urlencoding::decode(rest)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| rest.to_string());
                    values.insert(name.clone(), value);
                }
            }
        }
        Some(values)
    }
}

impl std::str::FromStr for RouteTemplate {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        RouteTemplate::parse(s)
    }
}

impl std::fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_strip_query_frag() {
        assert_eq!(strip_query_frag("/a/b?x=1#f"), "/a/b");
        assert_eq!(strip_query_frag("/a#f?x"), "/a");
        assert_eq!(strip_query_frag("/a"), "/a");
    }

    #[test]
    fn test_split_location() {
        assert_eq!(split_location("/@alice?page=2#top"), ("/@alice", "page=2"));
        assert_eq!(split_location("/witnesses"), ("/witnesses", ""));
        assert_eq!(split_location("?page=2"), ("/", "page=2"));
        assert_eq!(split_location("/a#frag?not=query"), ("/a", ""));
    }

    #[test]
    fn test_join_location() {
        assert_eq!(join_location("/a", ""), "/a");
        assert_eq!(join_location("/a", "b=1"), "/a?b=1");
    }

    #[test]
    fn test_params_in_order() {
        let r = RouteTemplate::parse("/block/:blockNumber/op/:opIndex").unwrap();
        assert_eq!(r.params().collect::<Vec<_>>(), vec!["blockNumber", "opIndex"]);
    }

    #[test]
    fn test_interpolate_prefix_param() {
        let r = RouteTemplate::parse("/@:accountName/history").unwrap();
        let path = r.interpolate(&values(&[("accountName", "alice")])).unwrap();
        assert_eq!(path, "/@alice/history");
    }

    #[test]
    fn test_interpolate_encodes_values() {
        let r = RouteTemplate::parse("/search/:term").unwrap();
        let path = r.interpolate(&values(&[("term", "a b/c")])).unwrap();
        assert_eq!(path, "/search/a%20b%2Fc");
        assert_eq!(r.extract(&path).unwrap()["term"], "a b/c");
    }

    #[test]
    fn test_interpolate_missing_or_empty() {
        let r = RouteTemplate::parse("/@:accountName").unwrap();
        assert!(r.interpolate(&values(&[])).is_err());
        assert!(r.interpolate(&values(&[("accountName", "")])).is_err());
    }

    #[test]
    fn test_root_template() {
        let r = RouteTemplate::parse("/").unwrap();
        assert_eq!(r.interpolate(&values(&[])).unwrap(), "/");
        assert_eq!(r.extract("/?a=1"), Some(BTreeMap::new()));
    }

    #[test]
    fn test_extract() {
        let r = RouteTemplate::parse("/block/:blockNumber").unwrap();
        assert_eq!(r.extract("/block/42").unwrap()["blockNumber"], "42");
        assert_eq!(r.extract("/block/42/").unwrap()["blockNumber"], "42");
        assert_eq!(r.extract("//block//42?x=1").unwrap()["blockNumber"], "42");
        assert!(r.extract("/blocks/42").is_none());
        assert!(r.extract("/block").is_none());
        assert!(r.extract("/block/42/extra").is_none());
    }

    #[test]
    fn test_extract_requires_prefix() {
        let r = RouteTemplate::parse("/@:accountName").unwrap();
        assert!(r.extract("/alice").is_none());
        assert!(r.extract("/@").is_none());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(RouteTemplate::parse("block/:n").is_err());
        assert!(RouteTemplate::parse("/block/:").is_err());
        assert!(RouteTemplate::parse("/a/:x-y").is_err());
        assert!(RouteTemplate::parse("/:a/:a").is_err());
    }
}
