//! In-memory mirror of the durable claimed set.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use claimrunner_protocols::{normalize_ids, ClaimId, StorageError};

use super::storage::ClaimStorage;

/// Set of claimed ids backed by a [`ClaimStorage`].
///
/// Reads hit the mirror only. Every mutation holds `write_lock` across the
/// persist, so after each write the durable copy equals the mirror.
pub struct ClaimedSet {
    storage: Arc<dyn ClaimStorage>,
    mirror: RwLock<BTreeSet<ClaimId>>,
    write_lock: Mutex<()>,
}

impl ClaimedSet {
    /// Load the set from storage. Missing or malformed data yields an empty set.
    pub async fn load(storage: Arc<dyn ClaimStorage>) -> Arc<Self> {
        let initial = match storage.read().await {
            Ok(Some(values)) => normalize_ids(values.iter()).into_iter().collect(),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!("Failed to load claimed set, starting empty: {}", e);
                BTreeSet::new()
            }
        };
        info!("Loaded {} claimed ids", initial.len());

        Arc::new(Self {
            storage,
            mirror: RwLock::new(initial),
            write_lock: Mutex::new(()),
        })
    }

    pub fn contains(&self, id: ClaimId) -> bool {
        self.mirror.read().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.mirror.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.read().is_empty()
    }

    /// Sorted copy of the current ids.
    pub fn snapshot(&self) -> Vec<ClaimId> {
        self.mirror.read().iter().copied().collect()
    }

    /// Copy of the current ids as a set, for membership-heavy callers.
    pub fn set(&self) -> BTreeSet<ClaimId> {
        self.mirror.read().clone()
    }

    /// Insert one id and persist it before returning.
    ///
    /// Returns `false` when the id was already present (no write happens).
    /// Zero is not a valid id and is never inserted.
    pub async fn add(&self, id: ClaimId) -> bool {
        if id == 0 {
            return false;
        }
        let _guard = self.write_lock.lock().await;
        let ids = {
            let mut mirror = self.mirror.write();
            if !mirror.insert(id) {
                return false;
            }
            mirror.iter().copied().collect::<Vec<_>>()
        };
        self.persist(&ids).await;
        debug!("Claimed id {} recorded", id);
        true
    }

    /// Insert many ids with a single write. Returns how many were new.
    pub async fn merge<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = ClaimId>,
    {
        let _guard = self.write_lock.lock().await;
        let (added, all) = {
            let mut mirror = self.mirror.write();
            let added = ids
                .into_iter()
                .filter(|id| *id > 0)
                .filter(|id| mirror.insert(*id))
                .count();
            (added, mirror.iter().copied().collect::<Vec<_>>())
        };
        if added > 0 {
            self.persist(&all).await;
            debug!("Merged {} new claimed ids", added);
        }
        added
    }

    async fn persist(&self, ids: &[ClaimId]) {
        if let Err(e) = self.storage.write(ids).await {
            warn!("Failed to persist claimed set, keeping in memory: {}", e);
        }
    }

    /// Replace the mirror with the durable content.
    ///
    /// A missing record or a well-formed document replaces the mirror. A
    /// malformed or empty document is treated as a write still in progress
    /// and keeps the current mirror, as does an I/O failure.
    pub async fn resync(&self) {
        let _guard = self.write_lock.lock().await;
        let next = match self.storage.read().await {
            Ok(Some(values)) => normalize_ids(values.iter()).into_iter().collect(),
            Ok(None) => BTreeSet::new(),
            Err(StorageError::Serialization(e)) => {
                warn!("Claimed storage holds malformed data, keeping current set: {}", e);
                return;
            }
            Err(e) => {
                warn!("Failed to re-read claimed storage: {}", e);
                return;
            }
        };
        let mut mirror = self.mirror.write();
        if *mirror != next {
            info!(
                "Claimed set changed externally ({} -> {} ids)",
                mirror.len(),
                next.len()
            );
            *mirror = next;
        }
    }

    /// Follow storage change notifications until the set is dropped.
    pub fn spawn_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.storage.subscribe();
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                let Some(set) = weak.upgrade() else { break };
                set.resync().await;
            }
            debug!("Claimed set sync task stopped");
        })
    }
}
