use cardstash_types::{EntityId, Manifest, ManifestEntry};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn entry(fingerprint: &str, label: &str) -> ManifestEntry {
    ManifestEntry {
        fingerprint: fingerprint.to_string(),
        label: label.to_string(),
        updated_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
    }
}

#[test]
fn empty_manifest() {
    let manifest = Manifest::new();
    assert!(manifest.is_empty());
    assert_eq!(manifest.len(), 0);
}

#[test]
fn insert_and_lookup() {
    let mut manifest = Manifest::new();
    let id = EntityId::parse("1004").unwrap();
    manifest.insert(id.clone(), entry("abc", "Welt"));

    assert_eq!(manifest.fingerprint(&id), Some("abc"));
    assert_eq!(manifest.get(&id).unwrap().label, "Welt");
    assert_eq!(manifest.fingerprint(&EntityId::parse("1005").unwrap()), None);
}

#[test]
fn json_uses_updated_at_key() {
    let manifest: Manifest = [(EntityId::parse("1004").unwrap(), entry("abc", "Welt"))]
        .into_iter()
        .collect();

    let value = serde_json::to_value(&manifest).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "1004": {
                "fingerprint": "abc",
                "label": "Welt",
                "updatedAt": "2026-01-02T03:04:05Z"
            }
        })
    );
}

#[test]
fn parses_document() {
    let json = r#"{
        "1001": {"fingerprint": "f1", "label": "March 7th", "updatedAt": "2026-03-01T00:00:00Z"},
        "1002": {"fingerprint": "f2", "label": "Dan Heng", "updatedAt": "2026-03-01T00:00:00Z"}
    }"#;
    let manifest: Manifest = serde_json::from_str(json).unwrap();
    assert_eq!(manifest.len(), 2);
    let ids: Vec<_> = manifest.iter().map(|(id, _)| id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["1001", "1002"]);
}

#[test]
fn rejects_unsafe_entity_keys() {
    let json = r#"{"../x": {"fingerprint": "f", "label": "l", "updatedAt": "2026-03-01T00:00:00Z"}}"#;
    assert!(serde_json::from_str::<Manifest>(json).is_err());
}
