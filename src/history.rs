//! Analysis history (bounded, newest first, persisted)
//!
//! [`HistoryStore`] owns the entries. Every successful analysis is
//! inserted at the head, the oldest entry falls off past
//! [`HISTORY_CAPACITY`], and the whole sequence is written back through a
//! [`HistoryStorage`] under one key.
//!
//! Persistence is best effort: read failures start an empty history, write
//! failures are logged and the in-memory copy stays authoritative until
//! the next successful write.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::model::{AnalysisResult, Label};

pub const HISTORY_CAPACITY: usize = 10;

/// Max characters kept from the submitted text
pub const HISTORY_TEXT_CHARS: usize = 50;

/// Storage key of the serialized history
pub const HISTORY_KEY: &str = "sentiment_history";

const ELLIPSIS: &str = "...";

// ─────────────────────────────────────────────────────────────────────────────
// Entry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in ms, strictly increasing within a store
    pub id: i64,
    /// Truncated display copy of the submitted text
    pub text: String,
    /// Lowercase label
    pub sentiment: String,
    pub probability: f64,
}

impl HistoryEntry {
    pub fn label(&self) -> Label {
        Label::new(&self.sentiment)
    }
}

/// Keep at most [`HISTORY_TEXT_CHARS`] characters, marking the cut
pub fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(HISTORY_TEXT_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────────────────────────────────────

/// Keyed durable record store
pub trait HistoryStorage: Send + Sync {
    /// `Ok(None)` when nothing was stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the record under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key
pub struct FileStorage {
    dir: PathBuf,
    /// Explicit file for [`HISTORY_KEY`]
    history_file: Option<PathBuf>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            history_file: None,
        }
    }

    /// Storage whose [`HISTORY_KEY`] record is exactly `path`
    pub fn for_history_file(path: &Path) -> Self {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            dir,
            history_file: Some(path.to_path_buf()),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        match &self.history_file {
            Some(path) if key == HISTORY_KEY => path.clone(),
            _ => self.dir.join(format!("{}.json", key)),
        }
    }
}

impl HistoryStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SentimentError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let persist_err = |e: std::io::Error| {
            SentimentError::Persistence(format!("Failed to write {}: {}", path.display(), e))
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }

        // Write-then-rename keeps the previous record intact on a crash
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(persist_err)?;
        fs::rename(&tmp, &path).map_err(persist_err)?;
        Ok(())
    }
}

/// In-process storage for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .records
            .lock()
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl HistoryStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.records
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Bounded history of past analyses
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    storage: Box<dyn HistoryStorage>,
    last_id: i64,
}

impl HistoryStore {
    /// Empty store that has not read `storage` yet
    pub fn new(storage: Box<dyn HistoryStorage>) -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
            storage,
            last_id: 0,
        }
    }

    /// Hydrate from `storage`; unreadable or malformed data starts empty
    pub fn load(storage: Box<dyn HistoryStorage>) -> Self {
        let mut store = Self::new(storage);

        let raw = match store.storage.read(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return store,
            Err(e) => {
                tracing::warn!(error = %e, "History unreadable, starting empty");
                return store;
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => {
                store.entries = entries.into_iter().take(HISTORY_CAPACITY).collect();
                store.last_id = store.entries.iter().map(|e| e.id).max().unwrap_or(0);
                tracing::debug!(entries = store.entries.len(), "History loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "History record malformed, starting empty");
            }
        }
        store
    }

    /// Insert a successful analysis at the head and persist
    pub fn record(&mut self, text: &str, result: &AnalysisResult) -> Vec<HistoryEntry> {
        let id = self.next_id(chrono::Utc::now().timestamp_millis());
        self.entries.push_front(HistoryEntry {
            id,
            text: truncate_text(text),
            sentiment: result.label.as_str().to_string(),
            probability: result.probability,
        });
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_back();
        }

        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "History not persisted; keeping in-memory copy");
        }

        self.snapshot()
    }

    /// Newest-first copy of the entries
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.storage.write(HISTORY_KEY, &json)
    }

    fn next_id(&mut self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn result(label: &str, probability: f64) -> AnalysisResult {
        AnalysisResult::new(Label::new(label), probability)
    }

    /// Storage handle that stays inspectable after moving into a store
    #[derive(Clone, Default)]
    struct SharedStorage(Arc<MemoryStorage>);

    impl HistoryStorage for SharedStorage {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.0.read(key)
        }
        fn write(&self, key: &str, value: &str) -> Result<()> {
            self.0.write(key, value)
        }
    }

    struct FailingStorage;

    impl HistoryStorage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(SentimentError::Persistence("disk on fire".into()))
        }
        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(SentimentError::Persistence("disk on fire".into()))
        }
    }

    #[test]
    fn truncate_keeps_short_text() {
        let text = "a".repeat(40);
        assert_eq!(truncate_text(&text), text);
        assert_eq!(truncate_text(&"b".repeat(50)), "b".repeat(50));
    }

    #[test]
    fn truncate_cuts_long_text_at_50_chars() {
        let text = "x".repeat(60);
        assert_eq!(truncate_text(&text), format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "é".repeat(55);
        let truncated = truncate_text(&text);
        assert_eq!(truncated.chars().count(), 53);
        assert!(truncated.starts_with(&"é".repeat(50)));
    }

    #[test]
    fn record_inserts_newest_first() {
        let mut store = HistoryStore::new(Box::new(MemoryStorage::new()));
        store.record("first text", &result("positivo", 0.9));
        let snapshot = store.record("second text", &result("negativo", 0.6));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text, "second text");
        assert_eq!(snapshot[0].sentiment, "negativo");
        assert_eq!(snapshot[1].text, "first text");
        assert!(snapshot[0].id > snapshot[1].id);
    }

    #[test]
    fn record_evicts_oldest_past_capacity() {
        let mut store = HistoryStore::new(Box::new(MemoryStorage::new()));
        for i in 0..15 {
            store.record(&format!("text number {}", i), &result("positivo", 0.5));
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), HISTORY_CAPACITY);
        let texts: Vec<_> = snapshot.iter().map(|e| e.text.clone()).collect();
        let expected: Vec<_> = (5..15).rev().map(|i| format!("text number {}", i)).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn ids_are_unique_within_same_millisecond() {
        let mut store = HistoryStore::new(Box::new(MemoryStorage::new()));
        assert_eq!(store.next_id(1_000), 1_000);
        assert_eq!(store.next_id(1_000), 1_001);
        assert_eq!(store.next_id(999), 1_002);
        assert_eq!(store.next_id(5_000), 5_000);
    }

    #[test]
    fn record_after_max_persisted_id_does_not_overflow() {
        let raw = format!(
            r#"[{{"id":{},"text":"hello","sentiment":"positivo","probability":0.5}}]"#,
            i64::MAX
        );
        let mut store =
            HistoryStore::load(Box::new(MemoryStorage::with_record(HISTORY_KEY, &raw)));

        let entries = store.record("new text", &result("negativo", 0.3));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "new text");
        assert_eq!(entries[0].id, i64::MAX);
    }

    #[test]
    fn persist_and_reload_round_trip() {
        let storage = SharedStorage::default();
        let mut store = HistoryStore::new(Box::new(storage.clone()));
        store.record("I love this product", &result("Positivo", 0.92));
        store.record(&"long ".repeat(20), &result("NEGATIVO", 0.13));
        let before = store.snapshot();

        let reloaded = HistoryStore::load(Box::new(storage));
        assert_eq!(reloaded.snapshot(), before);
    }

    #[test]
    fn reloaded_store_keeps_ids_increasing() {
        let storage = SharedStorage::default();
        let mut store = HistoryStore::new(Box::new(storage.clone()));
        let first = store.record("some text", &result("positivo", 0.9))[0].id;

        let mut reloaded = HistoryStore::load(Box::new(storage));
        let second = reloaded.record("more text", &result("positivo", 0.9))[0].id;
        assert!(second > first);
    }

    #[test]
    fn load_missing_record_is_empty() {
        let store = HistoryStore::load(Box::new(MemoryStorage::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn load_malformed_record_is_empty() {
        let storage = MemoryStorage::with_record(HISTORY_KEY, "{not json");
        let store = HistoryStore::load(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn load_drops_entries_past_capacity() {
        let entries: Vec<HistoryEntry> = (0..12)
            .map(|i| HistoryEntry {
                id: 100 - i,
                text: format!("entry {}", i),
                sentiment: "positivo".into(),
                probability: 0.5,
            })
            .collect();
        let storage =
            MemoryStorage::with_record(HISTORY_KEY, &serde_json::to_string(&entries).unwrap());

        let store = HistoryStore::load(Box::new(storage));
        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.snapshot()[0].text, "entry 0");
    }

    #[test]
    fn write_failure_keeps_memory_copy() {
        let mut store = HistoryStore::load(Box::new(FailingStorage));
        assert!(store.is_empty());

        let snapshot = store.record("still recorded", &result("positivo", 0.8));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        assert_eq!(storage.read(HISTORY_KEY).unwrap(), None);
        storage.write(HISTORY_KEY, "[]").unwrap();
        assert_eq!(storage.read(HISTORY_KEY).unwrap(), Some("[]".to_string()));
        assert!(storage.path_for(HISTORY_KEY).exists());
    }

    #[test]
    fn file_storage_for_history_file_maps_key_to_path() {
        let storage = FileStorage::for_history_file(Path::new("/var/lib/app/h.json"));
        assert_eq!(storage.path_for(HISTORY_KEY), PathBuf::from("/var/lib/app/h.json"));
        assert_eq!(
            storage.path_for("other"),
            PathBuf::from("/var/lib/app/other.json")
        );
    }

    #[test]
    fn persisted_format_is_json_array() {
        let storage = SharedStorage::default();
        let mut store = HistoryStore::new(Box::new(storage.clone()));
        store.record("hello world", &result("positivo", 0.75));

        let raw = storage.read(HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value.as_array().unwrap()[0];
        assert_eq!(entry["text"], "hello world");
        assert_eq!(entry["sentiment"], "positivo");
        assert_eq!(entry["probability"], 0.75);
        assert!(entry["id"].is_i64());
    }
}
