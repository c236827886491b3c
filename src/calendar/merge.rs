//! Recursive merge of JSON calendar tiers.

use serde_json::Value;

/// Merge `overlay` onto `base`.
///
/// Objects merge key by key, recursively. Any other overlay value (scalar,
/// array, null) replaces the base value outright, so month lists from a plant
/// file replace the category's list rather than extending it.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge tiers left to right, starting from an empty object.
pub fn merge_tiers<I>(tiers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    tiers
        .into_iter()
        .fold(Value::Object(Default::default()), deep_merge)
}
