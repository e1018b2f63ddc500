use reelscript::history::{HistoryStore, HISTORY_KEY};
use reelscript::storage::{BlobStore, HistoryItem, SledBlobStore};

mod common;

#[test]
fn test_history_survives_reopen_newest_first() {
    let (mut history, _tmp, db_path) = common::create_temp_history();

    let first = HistoryItem::new("Storytelling", "first idea", "script one");
    let second = HistoryItem::new("Top List", "second idea", "script two");
    let (first_id, second_id) = (first.id.clone(), second.id.clone());
    history.append(first).unwrap();
    history.append(second).unwrap();
    drop(history);

    let reopened = HistoryStore::open(SledBlobStore::open(&db_path).unwrap()).unwrap();
    let ids: Vec<&str> = reopened.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec![second_id.as_str(), first_id.as_str()]);
    assert_eq!(reopened.items()[1].content, "script one");
}

#[test]
fn test_delete_then_clear_persist() {
    let (mut history, _tmp, db_path) = common::create_temp_history();

    let items: Vec<HistoryItem> = (0..3)
        .map(|n| HistoryItem::new("Explainer", &format!("idea {}", n), format!("script {}", n)))
        .collect();
    let middle = items[1].id.clone();
    for item in items {
        history.append(item).unwrap();
    }

    assert!(history.delete(&middle).unwrap());
    assert!(!history.delete(&middle).unwrap());
    drop(history);

    let mut reopened = HistoryStore::open(SledBlobStore::open(&db_path).unwrap()).unwrap();
    assert_eq!(reopened.len(), 2);
    assert!(reopened.items().iter().all(|i| i.id != middle));

    reopened.clear().unwrap();
    assert!(reopened.backend().get(HISTORY_KEY).unwrap().is_none());
    drop(reopened);

    let emptied = HistoryStore::open(SledBlobStore::open(&db_path).unwrap()).unwrap();
    assert!(emptied.is_empty());
}

#[test]
fn test_stored_value_is_camel_case_json_array() {
    let (mut history, _tmp, _db_path) = common::create_temp_history();
    history
        .append(HistoryItem::new("Review", &"x".repeat(60), "ok"))
        .unwrap();

    let raw = history.backend().get(HISTORY_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let entry = &value.as_array().unwrap()[0];

    assert_eq!(entry["templateTitle"], "Review");
    assert_eq!(entry["inputPreview"], format!("{}...", "x".repeat(50)));
    assert!(entry["timestamp"].as_i64().unwrap() > 0);
}

#[test]
fn test_corrupt_blob_recovers_to_empty() {
    let (history, _tmp, db_path) = common::create_temp_history();
    history.backend().put(HISTORY_KEY, b"\x00\x01 not json").unwrap();
    drop(history);

    let mut reopened = HistoryStore::open(SledBlobStore::open(&db_path).unwrap()).unwrap();
    assert!(reopened.is_empty());

    reopened
        .append(HistoryItem::new("News Recap", "storm", "A storm hit..."))
        .unwrap();
    assert_eq!(reopened.len(), 1);
}
