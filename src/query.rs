//! Query string parsing and serialization
//!
//! Parsing is lenient: a leading `?` and any `#fragment` are ignored, `+`
//! means space, and percent sequences that do not decode to UTF-8 are kept
//! as written. Repeated keys fold into a single value by joining the raw
//! values with `,`, so `?tag=a,b&tag=c` reads exactly like `?tag=a,b,c`.

use std::collections::BTreeMap;

use crate::constants::codec::LIST_DELIMITER;
use crate::types::QueryParams;

/// Raw `(key, value)` pairs in order of appearance, percent-decoded
pub fn pairs(qs: &str) -> Vec<(String, String)> {
    let qs = qs.trim();
    let qs = qs.strip_prefix('?').unwrap_or(qs);
    let qs = qs.split('#').next().unwrap_or_default();

    let mut out = Vec::new();
    for part in qs.split('&') {
        if part.is_empty() {
            continue;
        }
        let mut it = part.splitn(2, '=');
        let key = decode_component(it.next().unwrap_or_default());
        let val = decode_component(it.next().unwrap_or_default());
        if key.is_empty() {
            continue;
        }
        out.push((key, val));
    }
    out
}

/// Parse a query string into params
pub fn parse(qs: &str) -> QueryParams {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, val) in pairs(qs) {
        grouped.entry(key).or_default().push(val);
    }
    grouped
        .into_iter()
        .map(|(key, mut vals)| {
            let val = if vals.len() == 1 {
                vals.swap_remove(0)
            } else {
                vals.join(&LIST_DELIMITER.to_string())
            };
            (key, val)
        })
        .collect()
}

/// `k=v&k2=v2` in key order; empty params give an empty string
pub fn serialize(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Same key set and the same string for every key
pub fn shallow_equal(a: &QueryParams, b: &QueryParams) -> bool {
    a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
}

fn decode_component(s: &str) -> String {
    let s = s.replace('+', " ");
    match urlencoding::decode(&s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(items: &[(&str, &str)]) -> QueryParams {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_basic() {
        let p = parse("?page=2&query=alice");
        assert_eq!(p, params(&[("page", "2"), ("query", "alice")]));
    }

    #[test]
    fn parse_decodes_components() {
        let p = parse("q=hello%20world&name=a+b&tags=a%2Cb");
        assert_eq!(p["q"], "hello world");
        assert_eq!(p["name"], "a b");
        assert_eq!(p["tags"], "a,b");
    }

    #[test]
    fn parse_ignores_fragment_and_empty_parts() {
        let p = parse("a=1&&=x&b#frag=2");
        assert_eq!(p, params(&[("a", "1"), ("b", "")]));
    }

    #[test]
    fn parse_keeps_invalid_utf8_escapes() {
        let p = parse("q=%FF");
        assert_eq!(p["q"], "%FF");
    }

    #[test]
    fn repeated_keys_fold_into_list() {
        let p = parse("tag=a&tag=b%2Cc&tag=d");
        assert_eq!(p["tag"], "a,b,c,d");
        assert_eq!(parse("tag=a,b&tag=c"), parse("tag=a,b,c"));
    }

    #[test]
    fn serialize_is_sorted_and_encoded() {
        let p = params(&[("z", "1"), ("a", "x y"), ("tags", "a,b")]);
        assert_eq!(serialize(&p), "a=x%20y&tags=a%2Cb&z=1");
        assert_eq!(serialize(&QueryParams::new()), "");
    }

    #[test]
    fn serialize_then_parse_is_identity() {
        let p = params(&[("q", "a+b&c=d"), ("list", "x\\,y,z"), ("u", "ünï")]);
        assert_eq!(parse(&serialize(&p)), p);
    }

    #[test]
    fn shallow_equal_compares_keys_and_values() {
        let a = params(&[("a", "1"), ("b", "2")]);
        let b = params(&[("b", "2"), ("a", "1")]);
        let c = params(&[("a", "1")]);
        let d = params(&[("a", "1"), ("b", "3")]);
        assert!(shallow_equal(&a, &b));
        assert!(!shallow_equal(&a, &c));
        assert!(!shallow_equal(&c, &a));
        assert!(!shallow_equal(&a, &d));
    }
}
