use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::types::{FaqItem, PostalParts};

static CITY_STATE_ZIP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+),\s*([A-Z]{2})\s+(\d{5})").expect("valid regex"));

/// Schema.org context URL stamped on every top-level node.
pub(super) const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Collect the string tags of a raw schema-type value (without dedupe).
pub(super) fn collect_type_tags(raw: &Value) -> Vec<String> {
    match raw {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            if trimmed.starts_with('[') {
                // JSON-encoded array; anything unparseable counts as no types
                return match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(arr)) => array_tags(&arr),
                    _ => Vec::new(),
                };
            }
            vec![trimmed.to_string()]
        }
        Value::Array(arr) => array_tags(arr),
        _ => Vec::new(),
    }
}

fn array_tags(arr: &[Value]) -> Vec<String> {
    arr.iter()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Convert an array into FAQ items when every element carries string `question` and `answer`.
fn as_faq_array(value: &Value) -> Option<Vec<FaqItem>> {
    let arr = value.as_array()?;
    if arr.is_empty() {
        return None;
    }
    arr.iter()
        .map(|el| {
            let obj = el.as_object()?;
            Some(FaqItem {
                question: obj.get("question")?.as_str()?.to_string(),
                answer: obj.get("answer")?.as_str()?.to_string(),
            })
        })
        .collect()
}

/// Depth-first search for the first FAQ array in a content tree.
///
/// Objects are checked at `faq.items`, then `items`, then every value in
/// insertion order. Arrays that are not FAQ arrays are searched element-wise.
pub(super) fn find_faq_items(value: &Value) -> Option<Vec<FaqItem>> {
    match value {
        Value::Object(obj) => {
            if let Some(items) = obj
                .get("faq")
                .and_then(|faq| faq.get("items"))
                .and_then(as_faq_array)
            {
                return Some(items);
            }
            if let Some(items) = obj.get("items").and_then(as_faq_array) {
                return Some(items);
            }
            obj.values().find_map(find_faq_items)
        }
        Value::Array(arr) => as_faq_array(value).or_else(|| arr.iter().find_map(find_faq_items)),
        _ => None,
    }
}

pub(super) fn parse_postal_parts(line: &str) -> PostalParts {
    match CITY_STATE_ZIP_REGEX.captures(line.trim()) {
        Some(caps) => PostalParts {
            locality: caps[1].trim().to_string(),
            region: caps[2].to_string(),
            postal_code: caps[3].to_string(),
        },
        None => PostalParts::default(),
    }
}

/// Shallow merge: keys in `overrides` replace keys in `base`.
pub(super) fn merge_overrides(mut base: Map<String, Value>, overrides: Option<&Value>) -> Value {
    if let Some(Value::Object(extra)) = overrides {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    Value::Object(base)
}

/// Insert `value` only when it is a non-blank string.
pub(super) fn insert_text(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        map.insert(key.to_string(), Value::String(v.to_string()));
    }
}

/// Expand arrays and `@graph` containers into their member nodes.
pub(super) fn flatten_graph(value: Value) -> Vec<Value> {
    match value {
        Value::Array(arr) => arr.into_iter().flat_map(flatten_graph).collect(),
        Value::Object(mut obj) => {
            let mut out = Vec::new();
            if let Some(graph) = obj.remove("@graph") {
                out.extend(flatten_graph(graph));
                // a bare {"@context", "@graph"} wrapper carries nothing else
                if obj.keys().any(|k| k != "@context") {
                    out.push(Value::Object(obj));
                }
            } else {
                out.push(Value::Object(obj));
            }
            out
        }
        other => vec![other],
    }
}
