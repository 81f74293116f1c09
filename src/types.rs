use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized form of a filter: string key to string value.
///
/// A `BTreeMap` keeps iteration (and therefore the generated query string)
/// stable for a given input.
pub type QueryParams = BTreeMap<String, String>;

/// Explicit type tag for a filter field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Date,
    StringList,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::StringList => write!(f, "string_list"),
        }
    }
}

/// A single filter value, tagged with its kind.
///
/// In TOML/JSON this is written as `{ kind = "number", value = 1 }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    String(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    StringList(Vec<String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::StringList(_) => FieldKind::StringList,
        }
    }

    /// Empty strings and empty lists count as "not set"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::String(s) => s.is_empty(),
            FieldValue::StringList(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Build a date value truncated to the precision the codec keeps
    pub fn date(at: DateTime<Utc>) -> Self {
        FieldValue::Date(truncate_to_millis(at))
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::StringList(items.into_iter().map(Into::into).collect())
    }

    /// Plain JSON rendering (no kind tag), used for CLI output
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::from(s.as_str()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Date(d) => {
                serde_json::Value::from(d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::StringList(items) => serde_json::Value::from(items.clone()),
        }
    }
}

/// Drop sub-millisecond precision from an instant
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(at.timestamp_millis())
        .single()
        .unwrap_or(at)
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::date(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::StringList(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::list(value)
    }
}

/// Typed filter/search state held by a view, ordered by field name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, FieldValue>);

/// Baseline state: decides omission and the kind of every field
pub type DefaultState = FilterState;

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn kind_of(&self, key: &str) -> Option<FieldKind> {
        self.0.get(key).map(FieldValue::kind)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain JSON object of the state, used for CLI output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, FieldValue)> for FilterState {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        FilterState(iter.into_iter().collect())
    }
}

impl IntoIterator for FilterState {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        assert_eq!(FieldValue::from("x").kind(), FieldKind::String);
        assert_eq!(FieldValue::from(3).kind(), FieldKind::Number);
        assert_eq!(FieldValue::from(true).kind(), FieldKind::Bool);
        assert_eq!(FieldValue::from(vec!["a"]).kind(), FieldKind::StringList);
        assert_eq!(FieldValue::from(Utc::now()).kind(), FieldKind::Date);
    }

    #[test]
    fn empty_values() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::StringList(vec![]).is_empty());
        assert!(!FieldValue::from(0).is_empty());
        assert!(!FieldValue::from(false).is_empty());
    }

    #[test]
    fn date_constructor_truncates_to_millis() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        match FieldValue::from(at) {
            FieldValue::Date(d) => assert_eq!(d.timestamp_subsec_nanos(), 123_000_000),
            other => panic!("Expected date, got {other:?}"),
        }
    }

    #[test]
    fn tagged_toml_representation() {
        #[derive(Deserialize)]
        struct Doc {
            page: FieldValue,
            tags: FieldValue,
        }
        let doc: Doc = toml::from_str(
            r#"
            page = { kind = "number", value = 1 }
            tags = { kind = "string_list", value = ["a", "b"] }
            "#,
        )
        .unwrap();
        assert_eq!(doc.page, FieldValue::Number(1.0));
        assert_eq!(doc.tags, FieldValue::from(vec!["a", "b"]));
    }

    #[test]
    fn state_json_is_untagged() {
        let state = FilterState::new().with("page", 2).with("q", "alice");
        assert_eq!(
            state.to_json(),
            serde_json::json!({ "page": 2.0, "q": "alice" })
        );
    }
}
