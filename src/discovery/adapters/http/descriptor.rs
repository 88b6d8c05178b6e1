//! Helpers for turning JSON self-descriptions into capabilities.

use crate::discovery::domain::{Capability, CapabilityExample};
use serde_json::{Map, Value};

/// Returns the array stored under `key`, or an empty slice.
pub(super) fn array_field<'a>(document: &'a Value, key: &str) -> &'a [Value] {
    document
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Returns a trimmed, non-empty string field.
pub(super) fn text_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Returns the `name` field, or `unknown`.
pub(super) fn name_or_unknown(object: &Map<String, Value>) -> &str {
    text_field(object, "name").unwrap_or("unknown")
}

/// Returns the first non-null value among `keys`.
pub(super) fn schema_field(object: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
        .cloned()
}

/// Returns the string tags listed under `tags`.
pub(super) fn tag_field(object: &Map<String, Value>) -> Vec<String> {
    object
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Returns the worked examples listed under `examples`.
pub(super) fn example_field(object: &Map<String, Value>) -> Vec<CapabilityExample> {
    object
        .get("examples")
        .and_then(Value::as_array)
        .map(|examples| examples.iter().map(CapabilityExample::from_value).collect())
        .unwrap_or_default()
}

/// Returns the display name from a document unless it is blank or `unknown`.
pub(super) fn advertised_name(document: &Value) -> Option<&str> {
    document
        .as_object()
        .and_then(|object| text_field(object, "name"))
        .filter(|name| !name.eq_ignore_ascii_case("unknown"))
}

/// Builds a capability from a bare string entry.
pub(super) fn string_capability(name: &str, description: String, tags: &[&str]) -> Option<Capability> {
    Capability::new(name, description)
        .ok()
        .map(|capability| capability.with_tags(tags))
}
