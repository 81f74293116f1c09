//! Filter state <-> query parameter codec
//!
//! `encode` turns a typed [`FilterState`] into flat [`QueryParams`], omitting
//! every field that matches its default or is empty. `decode` goes the other
//! way and is total: each field is parsed according to the kind of its
//! default, and anything absent or malformed falls back to the default.
//!
//! ## Value formats
//!
//! | kind          | query text                                   |
//! |---------------|----------------------------------------------|
//! | `string`      | as is                                        |
//! | `number`      | shortest round-trip decimal (`1`, `2.5`)     |
//! | `bool`        | `true` / `false`                             |
//! | `date`        | RFC 3339, UTC, milliseconds (`...00.000Z`)   |
//! | `string_list` | elements joined by `,`                       |
//!
//! List elements are escaped before joining: `\` becomes `\\` and `,`
//! becomes `\,`. The decoder splits on unescaped commas only, so elements
//! containing commas survive a round trip. A backslash followed by any other
//! character is kept literally, which keeps hand-written links working.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::constants::codec::{LIST_DELIMITER, LIST_ESCAPE};
use crate::debug::{self, cat};
use crate::types::{
    truncate_to_millis, DefaultState, FieldKind, FieldValue, FilterState, QueryParams,
};

/// Serialize `state`, dropping fields equal to their default or empty.
///
/// Fields missing from `defaults` are still emitted, using their own kind.
///
/// A field whose kind differs from its default's kind is a programming
/// error: debug builds panic, release builds log a warning and emit the
/// value's own text form.
pub fn encode(state: &FilterState, defaults: &DefaultState) -> QueryParams {
    let mut out = QueryParams::new();
    for (key, value) in state.iter() {
        let default = defaults.get(key);
        if let Some(d) = default {
            if d.kind() != value.kind() {
                debug_assert!(
                    false,
                    "field `{key}` holds a {} but its default is a {}",
                    value.kind(),
                    d.kind()
                );
                log::warn!(
                    "field `{key}` holds a {} but its default is a {}; encoding as text",
                    value.kind(),
                    d.kind()
                );
            }
        }

        let text = encode_value(value);
        if text.is_empty() {
            continue;
        }
        if default.is_some_and(|d| encode_value(d) == text) {
            continue;
        }
        out.insert(key.clone(), text);
    }
    debug::log(cat::CODEC, format!("encoded {} of {} fields", out.len(), state.len()));
    out
}

/// Parse `params` into a state with exactly the keys of `defaults`
pub fn decode(params: &QueryParams, defaults: &DefaultState) -> FilterState {
    defaults
        .iter()
        .map(|(key, default)| {
            let raw = params.get(key).map(String::as_str).filter(|s| !s.is_empty());
            let value = match raw {
                None => default.clone(),
                Some(raw) => decode_value(raw, default.kind()).unwrap_or_else(|| {
                    debug::log(
                        cat::CODEC,
                        format!(
                            "`{key}`: cannot read {raw:?} as {}, using default",
                            default.kind()
                        ),
                    );
                    default.clone()
                }),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Text form of a single value
pub fn encode_value(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => s.clone(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Date(d) => format_date(d),
        FieldValue::StringList(items) => join_list(items),
    }
}

/// Parse `raw` as `kind`; `None` when the text is not a valid value
pub fn decode_value(raw: &str, kind: FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::String => Some(FieldValue::String(raw.to_string())),
        FieldKind::Number => parse_number(raw).map(FieldValue::Number),
        FieldKind::Bool => parse_bool(raw).map(FieldValue::Bool),
        FieldKind::Date => parse_date(raw).map(FieldValue::Date),
        FieldKind::StringList => Some(FieldValue::StringList(split_list(raw))),
    }
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// RFC 3339 with any offset (normalized to UTC), or a bare `YYYY-MM-DD`
/// meaning midnight UTC. Sub-millisecond digits are dropped.
///
/// Years outside 0000-9999 carry a sign (`+10000-01-01T00:00:00.000Z`,
/// `-0001-...`), which is what [`format_date`] writes for them.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(raw) {
        return Some(truncate_to_millis(d.with_timezone(&Utc)));
    }
    if let Some(at) = parse_extended_year(raw) {
        return Some(truncate_to_millis(at));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_extended_year(raw: &str) -> Option<DateTime<Utc>> {
    if raw.ends_with(['Z', 'z']) {
        let naive = raw.get(..raw.len() - 1)?;
        return NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|dt| dt.and_utc());
    }
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%:z")
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Join list elements, escaping the delimiter and the escape character
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(LIST_DELIMITER);
        }
        for c in item.as_ref().chars() {
            if c == LIST_DELIMITER || c == LIST_ESCAPE {
                out.push(LIST_ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// Split on unescaped delimiters. Always yields at least one element.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut cur = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == LIST_ESCAPE {
            match chars.peek() {
                Some(&next) if next == LIST_DELIMITER || next == LIST_ESCAPE => {
                    cur.push(next);
                    chars.next();
                }
                _ => cur.push(c),
            }
        } else if c == LIST_DELIMITER {
            items.push(std::mem::take(&mut cur));
        } else {
            cur.push(c);
        }
    }
    items.push(cur);
    items
}
