use super::*;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

async fn memory_set(values: Vec<serde_json::Value>) -> (Arc<MemoryClaimStorage>, Arc<ClaimedSet>) {
    let storage = Arc::new(MemoryClaimStorage::with_values(values));
    let set = ClaimedSet::load(storage.clone()).await;
    (storage, set)
}

#[tokio::test]
async fn test_load_empty_storage() {
    let storage = Arc::new(MemoryClaimStorage::new());
    let set = ClaimedSet::load(storage).await;
    assert!(set.is_empty());
    assert_eq!(set.snapshot(), Vec::<u64>::new());
}

#[tokio::test]
async fn test_load_drops_malformed_entries() {
    let (_, set) = memory_set(vec![
        json!(5),
        json!("7"),
        json!("abc"),
        json!(-1),
        json!(0),
        json!(null),
        json!(3.0),
        json!(2.5),
    ])
    .await;
    assert_eq!(set.snapshot(), vec![3, 5, 7]);
}

#[tokio::test]
async fn test_add_is_idempotent() {
    let (storage, set) = memory_set(vec![]).await;

    assert!(set.add(42).await);
    assert!(!set.add(42).await);
    assert!(set.contains(42));
    assert_eq!(set.len(), 1);
    assert_eq!(storage.write_count(), 1);
    assert_eq!(storage.stored(), Some(vec![json!(42)]));
}

#[tokio::test]
async fn test_add_rejects_zero() {
    let (storage, set) = memory_set(vec![]).await;
    assert!(!set.add(0).await);
    assert!(set.is_empty());
    assert_eq!(storage.write_count(), 0);
}

#[tokio::test]
async fn test_merge_writes_once() {
    let (storage, set) = memory_set(vec![json!(2)]).await;

    let added = set.merge([1, 2, 3, 3, 0]).await;
    assert_eq!(added, 2);
    assert_eq!(set.snapshot(), vec![1, 2, 3]);
    assert_eq!(storage.write_count(), 1);

    assert_eq!(set.merge([1, 2]).await, 0);
    assert_eq!(storage.write_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_disjoint_adds() {
    let (storage, set) = memory_set(vec![]).await;

    let a = {
        let set = set.clone();
        tokio::spawn(async move {
            for id in 1..=50 {
                set.add(id).await;
            }
        })
    };
    let b = {
        let set = set.clone();
        tokio::spawn(async move { set.merge(51..=100).await })
    };
    a.await.unwrap();
    b.await.unwrap();

    assert_eq!(set.snapshot(), (1..=100).collect::<Vec<_>>());
    let stored = storage.stored().unwrap();
    assert_eq!(stored.len(), 100);
}

#[tokio::test]
async fn test_failed_write_keeps_memory() {
    let storage = Arc::new(MemoryClaimStorage::new());
    let set = ClaimedSet::load(storage.clone()).await;
    storage.set_fail_writes(true);

    assert!(set.add(9).await);
    assert!(set.contains(9));
    assert_eq!(storage.stored(), None);
}

#[tokio::test]
async fn test_external_change_is_observed() {
    let (storage, set) = memory_set(vec![json!(1)]).await;
    let _sync = set.spawn_sync();

    storage.write_external(Some(vec![json!(1), json!(8)]));
    for _ in 0..50 {
        if set.contains(8) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(set.snapshot(), vec![1, 8]);

    storage.write_external(None);
    for _ in 0..50 {
        if set.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(set.is_empty());
}

#[tokio::test]
async fn test_file_storage_missing_file_reads_none() {
    let dir = TempDir::new().unwrap();
    let storage = FileClaimStorage::new(dir.path().join("claimed.json"))
        .await
        .unwrap();
    assert!(storage.read().await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_storage_document_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("claimed.json");
    let storage = FileClaimStorage::new(&path).await.unwrap();

    storage.write(&[3, 11]).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc, json!({ "claimedNumbers": [3, 11] }));
    assert!(!dir.path().join("nested").join("claimed.json.tmp").exists());
}

#[tokio::test]
async fn test_file_storage_malformed_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");
    std::fs::write(&path, "{ not json").unwrap();

    let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
    assert!(storage.read().await.is_err());

    let set = ClaimedSet::load(storage).await;
    assert!(set.is_empty());
}

#[tokio::test]
async fn test_file_storage_wrong_shape_reads_none() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");
    std::fs::write(&path, r#"{"claimedNumbers": "nope"}"#).unwrap();

    let storage = FileClaimStorage::new(&path).await.unwrap();
    assert!(storage.read().await.unwrap().is_none());
}

#[tokio::test]
async fn test_restart_durability() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");

    {
        let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
        let set = ClaimedSet::load(storage).await;
        set.add(4).await;
        set.merge([10, 2]).await;
    }

    let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
    let set = ClaimedSet::load(storage).await;
    assert_eq!(set.snapshot(), vec![2, 4, 10]);
}

#[tokio::test]
async fn test_resync_keeps_set_on_partial_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");
    let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
    let set = ClaimedSet::load(storage.clone()).await;
    set.merge([1, 2, 3]).await;

    std::fs::write(&path, r#"{"claimedNumbers": [1, 2,"#).unwrap();
    set.resync().await;
    assert_eq!(set.snapshot(), vec![1, 2, 3]);

    set.add(9).await;
    let on_disk = storage.read().await.unwrap().unwrap();
    assert_eq!(on_disk, vec![json!(1), json!(2), json!(3), json!(9)]);
}

#[tokio::test]
async fn test_resync_keeps_set_on_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");
    let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
    let set = ClaimedSet::load(storage).await;
    set.merge([4, 5]).await;

    std::fs::write(&path, "").unwrap();
    set.resync().await;
    assert_eq!(set.snapshot(), vec![4, 5]);
}

#[tokio::test]
async fn test_resync_follows_deletion_and_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");
    let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
    let set = ClaimedSet::load(storage).await;
    set.merge([1, 2]).await;

    std::fs::write(&path, r#"{"claimedNumbers": [7]}"#).unwrap();
    set.resync().await;
    assert_eq!(set.snapshot(), vec![7]);

    std::fs::remove_file(&path).unwrap();
    set.resync().await;
    assert!(set.is_empty());
}

async fn wait_until(set: &ClaimedSet, cond: impl Fn(&ClaimedSet) -> bool) -> bool {
    for _ in 0..100 {
        if cond(set) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    cond(set)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_file_watch_observes_external_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");
    let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
    storage.watch().unwrap();
    storage.watch().unwrap();

    let set = ClaimedSet::load(storage.clone()).await;
    let _sync = set.spawn_sync();
    set.add(1).await;

    std::fs::write(&path, r#"{"claimedNumbers": [1, 12]}"#).unwrap();
    assert!(wait_until(&set, |s| s.contains(12)).await);
    assert_eq!(set.snapshot(), vec![1, 12]);

    // Another writer replacing the file through a rename.
    let staged = dir.path().join("staged.json");
    std::fs::write(&staged, r#"{"claimedNumbers": [1, 12, 30]}"#).unwrap();
    std::fs::rename(&staged, &path).unwrap();
    assert!(wait_until(&set, |s| s.contains(30)).await);

    std::fs::remove_file(&path).unwrap();
    assert!(wait_until(&set, |s| s.is_empty()).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_file_watch_ignores_unrelated_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claimed.json");
    let storage = Arc::new(FileClaimStorage::new(&path).await.unwrap());
    storage.watch().unwrap();
    let mut changes = storage.subscribe();

    std::fs::write(dir.path().join("other.json"), "{}").unwrap();
    let got = tokio::time::timeout(Duration::from_millis(500), changes.recv()).await;
    assert!(got.is_err());

    std::fs::write(&path, r#"{"claimedNumbers": [3]}"#).unwrap();
    let got = tokio::time::timeout(Duration::from_secs(5), changes.recv()).await;
    assert!(matches!(got, Ok(Ok(()))));
}
