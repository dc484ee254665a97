//! Integration tests for `FileStore`: persistence across instances,
//! handles sharing one file, atomic failure behaviour, and the on-disk
//! layout.

use chrono::{DateTime, Utc};
use gateforge_store::{
    FileStore, Record, RecordId, RecordKind, RecordStore, StoreError,
};
use serde::{Deserialize, Serialize};

// =========================================================================
// Test record
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Ticket {
    id: Option<RecordId>,
    code: String,
    redeemed: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn ticket(code: &str) -> Ticket {
    Ticket {
        id: None,
        code: code.to_string(),
        redeemed: false,
        created_at: None,
        updated_at: None,
    }
}

impl Record for Ticket {
    const KIND: RecordKind = RecordKind::License;

    fn raw_key(&self) -> &str {
        &self.code
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_open_missing_file_starts_empty_without_creating_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = FileStore::open(&path).await.unwrap();

    assert_eq!(store.count::<Ticket>().await.unwrap(), 0);
    assert!(!path.exists(), "file should only appear on first write");
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = FileStore::open(&path).await.unwrap();
        store.create(ticket("AAAAA-BBBBB-CCCCC-DDDDD")).await.unwrap();
        let mut second = store.create(ticket("EEEEE-FFFFF-GGGGG-HHHHH")).await.unwrap();
        second.redeemed = true;
        store.update(&second).await.unwrap();
    }

    // A fresh instance on the same path sees everything, in order.
    let reopened = FileStore::open(&path).await.unwrap();
    let all: Vec<Ticket> = reopened.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].code, "AAAAA-BBBBB-CCCCC-DDDDD");
    assert!(all[1].redeemed);

    // The id counter also survives, so new ids don't collide.
    let third = reopened.create(ticket("IIIII-JJJJJ-KKKKK-LLLLL")).await.unwrap();
    assert_eq!(third.id, Some(3));
}

#[tokio::test]
async fn test_failed_create_leaves_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).await.unwrap();
    store.create(ticket("DUP")).await.unwrap();
    let before = std::fs::read(&path).unwrap();

    let result = store.create(ticket("DUP")).await;

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn test_delete_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).await.unwrap();
    store.create(ticket("GONE")).await.unwrap();

    store.delete::<Ticket>("GONE").await.unwrap();

    let reopened = FileStore::open(&path).await.unwrap();
    assert!(reopened.get::<Ticket>("GONE").await.unwrap().is_none());
    assert!(
        reopened.delete::<Ticket>("GONE").await.unwrap_err().is_not_found()
    );
}

#[tokio::test]
async fn test_file_uses_collection_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");
    let store = FileStore::open(&path).await.unwrap();

    store.create(ticket("VISIBLE")).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("generated_licenses"));
    assert!(text.contains("VISIBLE"));
    assert!(!dir.path().join("nested").join("store.tmp").exists());
}

#[tokio::test]
async fn test_corrupt_file_returns_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, b"{ this is not a store").unwrap();

    let result = FileStore::open(&path).await;

    assert!(matches!(result, Err(StoreError::Decode(_))));
}

#[tokio::test]
async fn test_second_handle_does_not_undo_first_handles_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let first = FileStore::open(&path).await.unwrap();
    let mut admin = first.create(ticket("ADMIN-ADMIN-PERMANENT")).await.unwrap();

    // Opened while the record is still unredeemed.
    let second = FileStore::open(&path).await.unwrap();

    admin.redeemed = true;
    first.update(&admin).await.unwrap();
    second.create(ticket("OTHER")).await.unwrap();

    let reopened = FileStore::open(&path).await.unwrap();
    let admin: Ticket = reopened.get("ADMIN-ADMIN-PERMANENT").await.unwrap().unwrap();
    assert!(admin.redeemed, "update from the first handle was lost");
    assert!(reopened.get::<Ticket>("OTHER").await.unwrap().is_some());
    assert_eq!(reopened.count::<Ticket>().await.unwrap(), 2);
}

#[tokio::test]
async fn test_handles_see_each_others_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let first = FileStore::open(&path).await.unwrap();
    let second = FileStore::open(&path).await.unwrap();

    first.create(ticket("SHARED")).await.unwrap();

    assert!(second.get::<Ticket>("SHARED").await.unwrap().is_some());
    // The id counter is shared too.
    let next = second.create(ticket("NEXT")).await.unwrap();
    assert_eq!(next.id, Some(2));
    assert!(second.create(ticket("SHARED")).await.unwrap_err().is_conflict());
}

#[tokio::test]
async fn test_concurrent_creates_across_handles_all_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let a = std::sync::Arc::new(FileStore::open(&path).await.unwrap());
    let b = std::sync::Arc::new(FileStore::open(&path).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = if i % 2 == 0 { a.clone() } else { b.clone() };
        handles.push(tokio::spawn(async move {
            store.create(ticket(&format!("T{i}"))).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(reopened.count::<Ticket>().await.unwrap(), 8);
}
