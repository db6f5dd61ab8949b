use serde_json::Value;

/// Deep merges `source` into `target`, with `source` taking precedence
///
/// Mappings present on both sides are merged key by key. Everything else on
/// the source side, arrays included, replaces the target value wholesale.
/// If either side is not a mapping the source wins outright.
///
/// Both arguments are taken by value, so the result never shares nodes with
/// a tree the caller still holds.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut merged), Value::Object(overlay)) => {
            for (key, overlay_value) in overlay {
                let merged_value = match merged.remove(&key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        deep_merge(base_value, overlay_value)
                    }
                    _ => overlay_value,
                };
                merged.insert(key, merged_value);
            }

            Value::Object(merged)
        }
        (_, source) => source,
    }
}
