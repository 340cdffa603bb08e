use std::sync::Arc;

use crate::error::Result;
use crate::models::HistoryEntry;
use crate::storage::{KvStore, keys};

/// Default cap on persisted history entries.
pub const HISTORY_LIMIT: usize = 50;

/// Bounded, most-recent-first log of completed queries, persisted through
/// the injected key-value store.
///
/// Entries are immutable snapshots: appended on success, evicted from the
/// tail once the cap is exceeded, and removed only by `clear`.
pub struct HistoryLog {
    store: Arc<dyn KvStore>,
    limit: usize,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            limit: HISTORY_LIMIT,
        }
    }

    pub fn with_limit(store: Arc<dyn KvStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// All stored entries, most recent first. A corrupted payload is logged
    /// and treated as empty rather than wedging the session.
    pub async fn entries(&self) -> Result<Vec<HistoryEntry>> {
        let Some(raw) = self.store.get(keys::HISTORY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, "stored history is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Prepend `entry`, evicting the oldest entries beyond the cap.
    pub async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.entries().await?;
        entries.insert(0, entry);
        entries.truncate(self.limit);
        self.save(&entries).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(keys::HISTORY).await
    }

    async fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(keys::HISTORY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanvasData, ModeResult};
    use crate::storage::MemoryStore;

    fn entry(query: &str) -> HistoryEntry {
        HistoryEntry::new(
            query.to_string(),
            ModeResult::Canvas(CanvasData {
                sources: vec![],
                code: vec![],
            }),
        )
    }

    #[tokio::test]
    async fn entries_start_empty() {
        let log = HistoryLog::new(Arc::new(MemoryStore::new()));
        assert!(log.entries().await.expect("entries").is_empty());
    }

    #[tokio::test]
    async fn append_keeps_most_recent_first() {
        let log = HistoryLog::new(Arc::new(MemoryStore::new()));

        log.append(entry("first")).await.expect("append");
        log.append(entry("second")).await.expect("append");
        log.append(entry("third")).await.expect("append");

        let entries = log.entries().await.expect("entries");
        let queries: Vec<&str> = entries.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn cap_evicts_the_oldest_entry() {
        let log = HistoryLog::new(Arc::new(MemoryStore::new()));

        for i in 0..=HISTORY_LIMIT {
            log.append(entry(&format!("query {i}"))).await.expect("append");
        }

        let entries = log.entries().await.expect("entries");
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries.first().expect("newest").query, "query 50");
        // "query 0" fell off the tail.
        assert_eq!(entries.last().expect("oldest").query, "query 1");
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let log = HistoryLog::new(Arc::new(MemoryStore::new()));
        log.append(entry("only")).await.expect("append");

        log.clear().await.expect("clear");

        assert!(log.entries().await.expect("entries").is_empty());
    }

    #[tokio::test]
    async fn unreadable_history_is_treated_as_empty() {
        let store = Arc::new(MemoryStore::with_entry(keys::HISTORY, "{broken"));
        let log = HistoryLog::new(store);
        assert!(log.entries().await.expect("entries").is_empty());
    }

    #[tokio::test]
    async fn entries_survive_reserialization() {
        let store = Arc::new(MemoryStore::new());
        let log = HistoryLog::new(store.clone());
        let original = entry("persisted");
        log.append(original.clone()).await.expect("append");

        let reloaded = HistoryLog::new(store).entries().await.expect("entries");
        assert_eq!(reloaded, vec![original]);
    }
}
