//! Entity fingerprints.
//!
//! The digest only needs to detect change, so any stable hash would do; we
//! use SHA-256 over a canonical JSON encoding (object keys sorted,
//! sub-attributes sorted) and hex-encode it.

use cardstash_types::{Entity, SubAttribute};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded fingerprint.
pub const FINGERPRINT_LEN: usize = 64;

/// Computes the fingerprint of an entity.
///
/// Only progression, equipment and sub-attributes contribute. The display
/// name and cosmetics are ignored.
#[must_use]
pub fn fingerprint(entity: &Entity) -> String {
    fingerprint_value(&projection(entity))
}

/// Computes the fingerprint of an arbitrary JSON value, with object keys
/// sorted at every level.
#[must_use]
pub fn fingerprint_value(value: &Value) -> String {
    let mut canonical = String::new();
    write_canonical(value, &mut canonical);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn projection(entity: &Entity) -> Value {
    let mut subs: Vec<&SubAttribute> = entity.sub_attributes.iter().collect();
    subs.sort_by(|a, b| {
        a.type_id
            .cmp(&b.type_id)
            .then(a.value.total_cmp(&b.value))
            .then(a.enhancements.cmp(&b.enhancements))
    });

    json!({
        "progression": {
            "level": entity.progression.level,
            "ascension": entity.progression.ascension,
            "rank": entity.progression.rank,
        },
        "equipment": entity.equipment.as_ref().map(|e| json!({
            "id": e.id,
            "level": e.level,
            "refinement": e.refinement,
        })),
        "sub_attributes": subs
            .iter()
            .map(|s| json!({
                "type_id": s.type_id,
                "value": s.value,
                "enhancements": s.enhancements,
            }))
            .collect::<Vec<_>>(),
    })
}

// serde_json's map ordering depends on the `preserve_order` feature, which any
// crate in the graph can switch on, so key order is fixed here explicitly.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
