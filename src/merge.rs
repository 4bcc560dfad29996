//! Descriptor merge logic.
//!
//! Implements the defaults-plus-caller merge with:
//! - Objects: deep-merge by key
//! - Arrays: CONCATENATE (base first, overlay appended)
//! - Scalars: override (overlay wins)
//! - Null: override (null can override any value)
//!
//! An overlay node of the exact shape `{"mode": "replace", "value": v}`
//! bypasses the structural rules and replaces the base subtree with `v`
//! wholesale; `{"mode": "merge", "value": v}` merges `v` under the normal
//! rules. [`FieldOverride`] serializes to that shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Explicit merge-or-replace marker for a single descriptor field.
///
/// Lets a caller opt out of the default-append behavior for one subtree
/// (typically a packaging glob list or the plugin list) without affecting
/// its siblings:
///
/// ```
/// use janis_sls_hooks::FieldOverride;
/// use serde_json::json;
///
/// let plugins = FieldOverride::Replace(vec!["my-unique-plugin"]);
/// assert_eq!(
///     serde_json::to_value(&plugins).unwrap(),
///     json!({ "mode": "replace", "value": ["my-unique-plugin"] }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum FieldOverride<T> {
    /// Merge the value with the base subtree under the normal rules.
    Merge(T),
    /// Replace the base subtree wholesale.
    Replace(T),
}

/// Deep merge two descriptor trees.
///
/// `base` holds the generated defaults, `overlay` the caller's partial
/// descriptor. Keys present on only one side pass through verbatim. A
/// replace directive in the overlay (see [`FieldOverride`]) discards the
/// base subtree; a directive on a key with no base counterpart resolves to
/// its payload.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    let overlay = match try_into_directive(overlay) {
        Ok(FieldOverride::Replace(value)) => return value,
        Ok(FieldOverride::Merge(value)) => value,
        Err(value) => value,
    };

    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => deep_merge(Value::Null, overlay_value),
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (Value::Array(mut base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items);
            Value::Array(base_items)
        }

        // Scalars and type mismatches: overlay wins.
        (_, overlay) => overlay,
    }
}

/// Split off a directive node, or give the value back untouched.
///
/// Only the exact two-key shape counts; an object carrying extra keys next
/// to `mode`/`value` is caller data and merges structurally.
fn try_into_directive(value: Value) -> Result<FieldOverride<Value>, Value> {
    match value {
        Value::Object(mut map)
            if map.len() == 2
                && map.contains_key("value")
                && matches!(
                    map.get("mode").and_then(Value::as_str),
                    Some("merge" | "replace")
                ) =>
        {
            let replace = map.get("mode").and_then(Value::as_str) == Some("replace");
            let payload = map.remove("value").unwrap_or(Value::Null);
            if replace {
                Ok(FieldOverride::Replace(payload))
            } else {
                Ok(FieldOverride::Merge(payload))
            }
        }
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let base = json!({"memorySize": 1024});
        let overlay = json!({"memorySize": 512});
        let result = deep_merge(base, overlay);
        assert_eq!(result["memorySize"], 512);
    }

    #[test]
    fn test_object_deep_merge() {
        let base = json!({
            "provider": {
                "runtime": "nodejs18.x",
                "logRetentionInDays": 14
            }
        });
        let overlay = json!({
            "provider": {
                "logRetentionInDays": 30
            }
        });
        let result = deep_merge(base, overlay);

        // logRetentionInDays should be overridden
        assert_eq!(result["provider"]["logRetentionInDays"], 30);
        // runtime should be preserved
        assert_eq!(result["provider"]["runtime"], "nodejs18.x");
    }

    #[test]
    fn test_array_concat_base_first() {
        let base = json!({
            "plugins": ["a", "b"]
        });
        let overlay = json!({
            "plugins": ["c"]
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["plugins"], json!(["a", "b", "c"]));
    }

    #[test]
    fn test_add_new_key() {
        let base = json!({"a": 1});
        let overlay = json!({"b": 2});
        let result = deep_merge(base, overlay);

        assert_eq!(result["a"], 1);
        assert_eq!(result["b"], 2);
    }

    #[test]
    fn test_null_override() {
        let base = json!({"value": 100});
        let overlay = json!({"value": null});
        let result = deep_merge(base, overlay);

        assert!(result["value"].is_null());
    }

    #[test]
    fn test_replace_directive() {
        let base = json!({
            "plugins": ["a", "b"]
        });
        let overlay = json!({
            "plugins": { "mode": "replace", "value": ["mine"] }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["plugins"], json!(["mine"]));
    }

    #[test]
    fn test_merge_directive_behaves_like_plain_value() {
        let base = json!({
            "plugins": ["a"]
        });
        let overlay = json!({
            "plugins": { "mode": "merge", "value": ["b"] }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["plugins"], json!(["a", "b"]));
    }

    #[test]
    fn test_directive_without_base_counterpart() {
        let base = json!({});
        let overlay = json!({
            "extra": { "mode": "replace", "value": [1, 2] }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["extra"], json!([1, 2]));
    }

    #[test]
    fn test_object_with_extra_keys_is_not_a_directive() {
        let base = json!({
            "field": { "kept": true }
        });
        let overlay = json!({
            "field": { "mode": "replace", "value": 1, "other": 2 }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["field"]["kept"], true);
        assert_eq!(result["field"]["mode"], "replace");
        assert_eq!(result["field"]["value"], 1);
        assert_eq!(result["field"]["other"], 2);
    }

    #[test]
    fn test_type_mismatch_overlay_wins() {
        // Caller passing a scalar where the defaults hold an object is
        // defined as a full override.
        let base = json!({"package": {"individually": false}});
        let overlay = json!({"package": "none"});
        let result = deep_merge(base, overlay);

        assert_eq!(result["package"], "none");
    }

    #[test]
    fn test_nested_deep_merge() {
        let base = json!({
            "custom": {
                "customDomain": {
                    "basePath": "api",
                    "stage": "local"
                }
            }
        });
        let overlay = json!({
            "custom": {
                "customDomain": {
                    "stage": "beta",
                    "createRoute53Record": true
                }
            }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["custom"]["customDomain"]["basePath"], "api");
        assert_eq!(result["custom"]["customDomain"]["stage"], "beta");
        assert_eq!(result["custom"]["customDomain"]["createRoute53Record"], true);
    }

    #[test]
    fn test_field_override_serialization() {
        let merge = FieldOverride::Merge(json!(["x"]));
        assert_eq!(
            serde_json::to_value(&merge).unwrap(),
            json!({ "mode": "merge", "value": ["x"] }),
        );

        let replace: FieldOverride<Value> =
            serde_json::from_value(json!({ "mode": "replace", "value": 7 })).unwrap();
        assert_eq!(replace, FieldOverride::Replace(json!(7)));
    }
}
