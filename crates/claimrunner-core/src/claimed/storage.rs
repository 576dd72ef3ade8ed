//! Storage backends for the claimed set.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::fs;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use claimrunner_protocols::{ClaimId, StorageError};

/// Key of the single durable record.
pub const STORAGE_KEY: &str = "claimedNumbers";

/// A durable home for the claimed ids.
#[async_trait]
pub trait ClaimStorage: Send + Sync {
    /// Read the raw stored values. `Ok(None)` when nothing is stored.
    async fn read(&self) -> Result<Option<Vec<Value>>, StorageError>;

    /// Replace the stored record.
    async fn write(&self, ids: &[ClaimId]) -> Result<(), StorageError>;

    /// Signals that the durable copy may have changed out of band.
    fn subscribe(&self) -> broadcast::Receiver<()>;
}

/// Extract the id list from a stored document.
///
/// Anything but an array under [`STORAGE_KEY`] reads as "nothing stored".
fn ids_from_document(doc: &Value) -> Option<Vec<Value>> {
    doc.get(STORAGE_KEY).and_then(Value::as_array).cloned()
}

/// In-memory backend for tests and ephemeral runs.
pub struct MemoryClaimStorage {
    data: Mutex<Option<Vec<Value>>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    changes: broadcast::Sender<()>,
}

impl MemoryClaimStorage {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            data: Mutex::new(None),
            writes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            changes,
        }
    }

    /// Start with a stored record.
    pub fn with_values(values: Vec<Value>) -> Self {
        let storage = Self::new();
        *storage.data.lock() = Some(values);
        storage
    }

    /// Simulate another writer replacing the record, and notify subscribers.
    pub fn write_external(&self, values: Option<Vec<Value>>) {
        *self.data.lock() = values;
        let _ = self.changes.send(());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current stored ids, as written.
    pub fn stored(&self) -> Option<Vec<Value>> {
        self.data.lock().clone()
    }
}

impl Default for MemoryClaimStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClaimStorage for MemoryClaimStorage {
    async fn read(&self) -> Result<Option<Vec<Value>>, StorageError> {
        Ok(self.data.lock().clone())
    }

    async fn write(&self, ids: &[ClaimId]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("write disabled")));
        }
        *self.data.lock() = Some(ids.iter().map(|id| json!(id)).collect());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}

/// JSON file backend: `{"claimedNumbers": [..]}`.
///
/// Writes go through a sibling temp file and a rename, so readers never see a
/// half-written document.
pub struct FileClaimStorage {
    path: PathBuf,
    changes: broadcast::Sender<()>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl FileClaimStorage {
    /// Create the backend, making sure the parent directory exists.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let (changes, _) = broadcast::channel(16);
        debug!("FileClaimStorage initialized at {:?}", path);
        Ok(Self {
            path,
            changes,
            watcher: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Watch the file for edits made by other processes.
    ///
    /// The parent directory is watched so that creation, deletion and
    /// rename-over all register. Calling this twice is a no-op.
    pub fn watch(&self) -> Result<(), StorageError> {
        let mut slot = self.watcher.lock();
        if slot.is_some() {
            return Ok(());
        }

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = self.path.file_name().map(|n| n.to_os_string());
        let changes = self.changes.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Access(_)) {
                        return;
                    }
                    let touches_file = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_file {
                        let _ = changes.send(());
                    }
                }
                Err(e) => warn!("Claimed file watch error: {}", e),
            },
            Config::default(),
        )
        .map_err(|e| StorageError::Watch(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| StorageError::Watch(format!("Failed to watch {:?}: {}", dir, e)))?;

        info!("Watching claimed file {:?}", self.path);
        *slot = Some(watcher);
        Ok(())
    }
}

#[async_trait]
impl ClaimStorage for FileClaimStorage {
    async fn read(&self) -> Result<Option<Vec<Value>>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc: Value = serde_json::from_str(&content)?;
        Ok(ids_from_document(&doc))
    }

    async fn write(&self, ids: &[ClaimId]) -> Result<(), StorageError> {
        let doc = json!({ STORAGE_KEY: ids });
        let content = serde_json::to_string_pretty(&doc)?;
        let tmp = self.temp_path();
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Saved {} claimed ids to {:?}", ids.len(), self.path);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}
