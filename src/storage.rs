use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// Keys the application persists. Only these two exist.
pub mod keys {
    /// The stored service credential.
    pub const API_KEY: &str = "api_key";
    /// The serialized history entry array, most-recent-first.
    pub const HISTORY: &str = "history";
}

/// Injected key-value persistence boundary.
///
/// The core logic only ever sees this trait, so it is testable without a
/// real storage backend.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait KvStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Production backend: one JSON object per file, string keys and values.
/// The whole map is rewritten on every mutation; with two known keys that
/// is well within budget.
pub struct FileStore {
    path: PathBuf,
    cells: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cells = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "store file is not valid JSON, starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            cells: Mutex::new(cells),
        })
    }

    async fn persist(&self, cells: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(cells)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let cells = self.cells.lock().await;
        Ok(cells.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut cells = self.cells.lock().await;
        cells.insert(key.to_string(), value.to_string());
        self.persist(&cells).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut cells = self.cells.lock().await;
        if cells.remove(key).is_some() {
            self.persist(&cells).await?;
        }
        Ok(())
    }
}

/// In-memory store for tests that need real get/set semantics rather than
/// per-call mock expectations.
#[cfg(test)]
pub(crate) struct MemoryStore {
    cells: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn with_entry(key: &str, value: &str) -> Self {
        let mut cells = HashMap::new();
        cells.insert(key.to_string(), value.to_string());
        Self {
            cells: Mutex::new(cells),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cells.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.cells
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.cells.lock().await.remove(key);
        Ok(())
    }
}
