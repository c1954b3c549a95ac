use cardstash_types::{EntityId, OwnerId};
use std::collections::HashSet;
use std::str::FromStr;

// ── Parsing ───────────────────────────────────────────────────────

#[test]
fn owner_id_parse_and_display() {
    let id = OwnerId::parse("123456789012345678").unwrap();
    assert_eq!(id.to_string(), "123456789012345678");
    assert_eq!(id.as_str(), "123456789012345678");
}

#[test]
fn entity_id_from_str() {
    let id = EntityId::from_str("1004").unwrap();
    assert_eq!(id.as_ref(), "1004");
}

#[test]
fn rejects_empty() {
    assert!(OwnerId::parse("").is_err());
    assert!(EntityId::parse("").is_err());
}

#[test]
fn rejects_path_separators() {
    assert!(OwnerId::parse("a/b").is_err());
    assert!(OwnerId::parse("a\\b").is_err());
    assert!(EntityId::parse("..").is_err());
    assert!(EntityId::parse("x..y").is_err());
    assert!(EntityId::parse(".").is_err());
}

#[test]
fn rejects_surrounding_whitespace() {
    assert!(OwnerId::parse(" 42").is_err());
    assert!(OwnerId::parse("42\n").is_err());
}

#[test]
fn accepts_dotted_names() {
    assert!(EntityId::parse("card.v2").is_ok());
}

// ── Serde ─────────────────────────────────────────────────────────

#[test]
fn serializes_as_plain_string() {
    let id = EntityId::parse("1102").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"1102\"");
}

#[test]
fn deserialize_validates() {
    let ok: Result<OwnerId, _> = serde_json::from_str("\"777\"");
    assert!(ok.is_ok());
    let bad: Result<OwnerId, _> = serde_json::from_str("\"../etc\"");
    assert!(bad.is_err());
}

#[test]
fn hash_and_eq() {
    let a = EntityId::parse("1").unwrap();
    let mut set = HashSet::new();
    set.insert(a.clone());
    set.insert(a);
    assert_eq!(set.len(), 1);
}

#[test]
fn ordering_is_lexicographic() {
    let mut ids = vec![
        EntityId::parse("b").unwrap(),
        EntityId::parse("a").unwrap(),
    ];
    ids.sort();
    assert_eq!(ids[0].as_str(), "a");
}
