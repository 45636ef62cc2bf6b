//! Structural deep merge for pricing documents.
//!
//! An externally supplied document is a partial overlay on the compiled-in
//! defaults. The merge walks both values field by field:
//!
//! - `null` in the overlay wins: the field is forcibly cleared, even when
//!   the default holds a structured value.
//! - arrays replace wholesale, never element-wise.
//! - objects merge recursively over the union of keys; keys absent from
//!   the overlay inherit the default.
//! - a present scalar (including falsy values such as `0` or `""`)
//!   replaces the default.
//!
//! Absence and `null` are distinct at every level: absence means "inherit",
//! `null` means "cleared".

use serde_json::{Map, Value};

/// Merge `overlay` onto `base`, producing the effective document.
#[must_use]
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (_, Value::Null) => Value::Null,
        // Arrays on either side: the overlay sequence replaces the default.
        (Value::Array(_), src) | (_, src @ Value::Array(_)) => src.clone(),
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut out = Map::with_capacity(base_map.len() + overlay_map.len());
            for (key, base_val) in base_map {
                match overlay_map.get(key) {
                    Some(overlay_val) => {
                        out.insert(key.clone(), deep_merge(base_val, overlay_val));
                    }
                    None => {
                        out.insert(key.clone(), base_val.clone());
                    }
                }
            }
            for (key, overlay_val) in overlay_map {
                if !base_map.contains_key(key) {
                    out.insert(key.clone(), overlay_val.clone());
                }
            }
            Value::Object(out)
        }
        (_, src) => src.clone(),
    }
}
