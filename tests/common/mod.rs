use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use reelscript::history::HistoryStore;
use reelscript::storage::SledBlobStore;

#[allow(dead_code)]
pub fn create_temp_history() -> (HistoryStore<SledBlobStore>, TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("history.sled");
    let backend = SledBlobStore::open(&db_path).expect("failed to open sled store");
    let history = HistoryStore::open(backend).expect("failed to open history");
    (history, tmp, db_path)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn gemini_text_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 321, "candidatesTokenCount": 1234 }
    })
}
