use cardstash_cache::ExpiringMap;
use std::time::Duration;
use tokio::time::advance;

const TTL: Duration = Duration::from_secs(300);

#[tokio::test(start_paused = true)]
async fn live_entries_are_visible() {
    let mut map = ExpiringMap::new(TTL);
    map.insert("u1".to_string(), vec!["1004", "1005"]);

    advance(Duration::from_secs(299)).await;
    assert_eq!(map.get("u1"), Some(&vec!["1004", "1005"]));
    assert!(map.contains_key("u1"));
}

#[tokio::test(start_paused = true)]
async fn expired_entries_disappear_on_access() {
    let mut map = ExpiringMap::new(TTL);
    map.insert("u1", 1);

    advance(TTL).await;
    assert!(!map.contains_key("u1"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("u1"), None);
    assert_eq!(map.len(), 0);
}

#[tokio::test(start_paused = true)]
async fn insert_resets_expiry() {
    let mut map = ExpiringMap::new(TTL);
    map.insert("u1", 1);
    advance(Duration::from_secs(200)).await;

    assert_eq!(map.insert("u1", 2), Some(1));
    advance(Duration::from_secs(200)).await;
    assert_eq!(map.get("u1"), Some(&2));
}

#[tokio::test(start_paused = true)]
async fn insert_over_expired_returns_none() {
    let mut map = ExpiringMap::new(TTL);
    map.insert("u1", 1);
    advance(TTL + Duration::from_secs(1)).await;
    assert_eq!(map.insert("u1", 2), None);
}

#[tokio::test(start_paused = true)]
async fn evict_expired_removes_only_stale() {
    let mut map = ExpiringMap::new(TTL);
    map.insert("old", 1);
    advance(Duration::from_secs(200)).await;
    map.insert("new", 2);
    advance(Duration::from_secs(150)).await;

    assert_eq!(map.evict_expired(), 1);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("new"), Some(&2));
}

#[tokio::test(start_paused = true)]
async fn remove_returns_live_value_only() {
    let mut map = ExpiringMap::new(TTL);
    map.insert("a", 1);
    map.insert("b", 2);
    assert_eq!(map.remove("a"), Some(1));

    advance(TTL).await;
    assert_eq!(map.remove("b"), None);
    assert!(map.is_empty());
}

#[test]
fn clear_and_ttl() {
    let mut map: ExpiringMap<u64, &str> = ExpiringMap::new(TTL);
    assert_eq!(map.ttl(), TTL);
    map.insert(1, "x");
    map.clear();
    assert!(map.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unrepresentable_ttl_never_expires() {
    let mut map = ExpiringMap::new(Duration::MAX);
    assert_eq!(map.insert("u1", 1), None);
    assert_eq!(map.insert("u1", 2), Some(1));

    advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
    assert_eq!(map.get("u1"), Some(&2));
    assert_eq!(map.evict_expired(), 0);
    assert_eq!(map.remove("u1"), Some(2));
}
