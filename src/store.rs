//! On-disk state owned by the racer engine.
//!
//! The GUI only ever reads these documents: `state/state.json` holds the
//! global [`Snapshot`], and `state/batches/<name>.json` holds one [`Batch`]
//! each. All writes go through the racer collaborator.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GuiError, GuiResult};

/// Batch name reserved for the racer's immediate-mode batch. The GUI never
/// lets the user set it current or open it.
pub const RESERVED_BATCH: &str = "Imm";

/// One captured HTTP request as recorded by the racer.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestInfo {
    pub url: String,
    pub method: String,
    pub timestamp: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestInfo {
    /// `Host` header of the capture, blank if none was recorded.
    pub fn host(&self) -> &str {
        self.headers.get("Host").map(String::as_str).unwrap_or("")
    }
}

/// Full global state, read wholesale at screen construction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    pub requests: BTreeMap<String, RequestInfo>,
    #[serde(default)]
    pub current_batch: Option<String>,
    #[serde(default)]
    pub cp_history: Vec<String>,
}

/// One reference from a batch to a captured request. The racer persists the
/// reference as a composite `key` array whose first element is the request id.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchItem {
    pub key: Vec<serde_json::Value>,
}

impl BatchItem {
    pub fn request_id(&self) -> GuiResult<String> {
        match self.key.first() {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
            _ => Err(GuiError::malformed("batch item has no usable request id")),
        }
    }
}

/// A persisted batch document. The batch name is the file stem, not part of
/// the document itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub items: Vec<BatchItem>,
    pub allow_redirects: bool,
    pub sync_last_byte: bool,
    pub send_timeout: u64,
}

/// Read-only view over the racer's state directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.dir.join("state.json")
    }

    pub fn batches_dir(&self) -> PathBuf {
        self.dir.join("batches")
    }

    pub fn batch_file(&self, name: &str) -> PathBuf {
        self.batches_dir().join(format!("{name}.json"))
    }

    pub fn load_snapshot(&self) -> GuiResult<Snapshot> {
        read_json(&self.state_file())
    }

    pub fn load_batch(&self, name: &str) -> GuiResult<Batch> {
        read_json(&self.batch_file(name))
    }

    /// All batch documents in the batches directory, sorted by name.
    /// Non-`.json` entries are ignored.
    pub fn load_batches(&self) -> GuiResult<Vec<(String, Batch)>> {
        let dir = self.batches_dir();
        let entries = fs::read_dir(&dir).map_err(|e| io_error(&dir, &e))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&dir, &e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            out.push((name.to_string(), read_json(&path)?));
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> GuiResult<T> {
    let raw = fs::read_to_string(path).map_err(|e| io_error(path, &e))?;
    serde_json::from_str(&raw)
        .map_err(|e| GuiError::malformed(format!("malformed state in {}: {e}", path.display())))
}

fn io_error(path: &Path, err: &std::io::Error) -> GuiError {
    if err.kind() == std::io::ErrorKind::NotFound {
        GuiError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        // Read failures other than absence (permissions, directory in place
        // of a file) never reached the parser; say so.
        GuiError::malformed(format!("failed to read {}: {err}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r#"{
        "requests": {
            "1": {"url": "http://a", "method": "GET", "timestamp": "t", "headers": {"Host": "a"}}
        },
        "current_batch": "B1",
        "cp_history": []
    }"#;

    const BATCH_B1: &str = r#"{
        "items": [{"key": ["1"]}],
        "allow_redirects": true,
        "sync_last_byte": false,
        "send_timeout": 30
    }"#;

    fn store_with(snapshot: Option<&str>, batches: &[(&str, &str)]) -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path());
        fs::create_dir_all(store.batches_dir()).expect("mkdir batches");
        if let Some(raw) = snapshot {
            fs::write(store.state_file(), raw).expect("write state");
        }
        for (name, raw) in batches {
            fs::write(store.batch_file(name), raw).expect("write batch");
        }
        (dir, store)
    }

    #[test]
    fn snapshot_parses_requests_and_current_batch() {
        let (_dir, store) = store_with(Some(SNAPSHOT), &[]);
        let snapshot = store.load_snapshot().expect("load");
        assert_eq!(snapshot.current_batch.as_deref(), Some("B1"));
        assert_eq!(snapshot.requests.len(), 1);
        let req = &snapshot.requests["1"];
        assert_eq!(req.url, "http://a");
        assert_eq!(req.method, "GET");
        assert_eq!(req.host(), "a");
        assert!(snapshot.cp_history.is_empty());
    }

    #[test]
    fn missing_state_file_is_not_found() {
        let (_dir, store) = store_with(None, &[]);
        match store.load_snapshot() {
            Err(GuiError::NotFound { path }) => assert_eq!(path, store.state_file()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_malformed_state() {
        let (_dir, store) = store_with(Some("{not json"), &[]);
        assert!(matches!(
            store.load_snapshot(),
            Err(GuiError::MalformedState(_))
        ));
    }

    #[test]
    fn unreadable_state_file_reports_a_read_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path());
        // A directory where state.json should be: readable as a path, not as
        // a file, so the error is a read failure rather than a parse one.
        fs::create_dir_all(store.state_file()).expect("mkdir");
        let err = store.load_snapshot().expect_err("load should fail");
        assert!(matches!(err, GuiError::MalformedState(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("failed to read"), "unexpected message: {msg}");
    }

    #[test]
    fn batch_missing_option_key_is_malformed_state() {
        let (_dir, store) = store_with(Some(SNAPSHOT), &[("B1", r#"{"items": []}"#)]);
        assert!(matches!(
            store.load_batch("B1"),
            Err(GuiError::MalformedState(_))
        ));
    }

    #[test]
    fn batch_parses_items_and_options() {
        let (_dir, store) = store_with(Some(SNAPSHOT), &[("B1", BATCH_B1)]);
        let batch = store.load_batch("B1").expect("load");
        assert!(batch.allow_redirects);
        assert!(!batch.sync_last_byte);
        assert_eq!(batch.send_timeout, 30);
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].request_id().expect("id"), "1");
    }

    #[test]
    fn batch_item_numeric_key_stringifies() {
        let item: BatchItem = serde_json::from_str(r#"{"key": [7, "extra"]}"#).expect("parse");
        assert_eq!(item.request_id().expect("id"), "7");
    }

    #[test]
    fn batch_item_without_key_entry_is_malformed() {
        let item: BatchItem = serde_json::from_str(r#"{"key": []}"#).expect("parse");
        assert!(matches!(
            item.request_id(),
            Err(GuiError::MalformedState(_))
        ));
    }

    #[test]
    fn load_batches_sorts_by_name_and_skips_non_json() {
        let (_dir, store) = store_with(
            Some(SNAPSHOT),
            &[("beta", BATCH_B1), ("alpha", BATCH_B1)],
        );
        fs::write(store.batches_dir().join("notes.txt"), "ignore me").expect("write");
        let names: Vec<String> = store
            .load_batches()
            .expect("list")
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn missing_batches_dir_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path());
        assert!(matches!(
            store.load_batches(),
            Err(GuiError::NotFound { .. })
        ));
    }
}
