//! In-memory tables shared by every store implementation.
//!
//! Each collection keeps two maps in sync:
//!
//! - `rows`: record id → serialized record. A `BTreeMap`, so iteration
//!   follows id order, which is creation order.
//! - `index`: normalized unique key → record id. This is what makes
//!   `get("admin")` O(log n) instead of a scan, and what enforces the
//!   unique constraint on `create`.
//!
//! Both maps are serialized as-is by [`FileStore`](crate::FileStore), so a
//! store file can be loaded without knowing the record types it holds.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Record, RecordId, RecordKind, StoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Collection {
    rows: BTreeMap<RecordId, serde_json::Value>,
    index: BTreeMap<String, RecordId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Tables {
    /// The last id handed out. Ids start at 1.
    next_id: RecordId,
    /// Keyed by [`RecordKind::collection`] so the file format reads
    /// `"admin_accounts"` rather than an enum discriminant.
    collections: BTreeMap<String, Collection>,
}

impl Tables {
    fn collection(&self, kind: RecordKind) -> Option<&Collection> {
        self.collections.get(kind.collection())
    }

    fn collection_mut(&mut self, kind: RecordKind) -> &mut Collection {
        self.collections
            .entry(kind.collection().to_string())
            .or_default()
    }

    pub(crate) fn get_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let Some(collection) = self.collection(R::KIND) else {
            return Ok(Vec::new());
        };
        collection
            .rows
            .values()
            .map(|value| decode(value))
            .collect()
    }

    pub(crate) fn get<R: Record>(
        &self,
        key: &str,
    ) -> Result<Option<R>, StoreError> {
        let Some(collection) = self.collection(R::KIND) else {
            return Ok(None);
        };
        let normalized = R::normalize_key(key);
        match collection
            .index
            .get(&normalized)
            .and_then(|id| collection.rows.get(id))
        {
            Some(value) => decode(value).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn count<R: Record>(&self) -> usize {
        self.collection(R::KIND).map_or(0, |c| c.rows.len())
    }

    pub(crate) fn create<R: Record>(
        &mut self,
        mut record: R,
        now: DateTime<Utc>,
    ) -> Result<R, StoreError> {
        let key = record.unique_key();
        if self
            .collection(R::KIND)
            .is_some_and(|c| c.index.contains_key(&key))
        {
            return Err(StoreError::Conflict { kind: R::KIND, key });
        }

        let id = self.next_id + 1;
        record.set_id(id);
        record.set_created_at(now);
        record.set_updated_at(now);
        // Serialize before touching either map so a failure leaves the
        // tables exactly as they were.
        let value = serde_json::to_value(&record).map_err(StoreError::Encode)?;

        self.next_id = id;
        let collection = self.collection_mut(R::KIND);
        collection.index.insert(key, id);
        collection.rows.insert(id, value);
        Ok(record)
    }

    pub(crate) fn update<R: Record>(
        &mut self,
        record: &R,
        now: DateTime<Utc>,
    ) -> Result<R, StoreError> {
        let key = record.unique_key();
        let (id, stored) = self
            .collection(R::KIND)
            .and_then(|c| {
                let id = c.index.get(&key).copied()?;
                Some((id, c.rows.get(&id)?))
            })
            .ok_or_else(|| StoreError::NotFound { kind: R::KIND, key })?;
        let stored: R = decode(stored)?;

        let mut updated = record.clone();
        updated.set_id(id);
        if let Some(created_at) = stored.created_at() {
            updated.set_created_at(created_at);
        }
        updated.set_updated_at(now);
        let value =
            serde_json::to_value(&updated).map_err(StoreError::Encode)?;

        self.collection_mut(R::KIND).rows.insert(id, value);
        Ok(updated)
    }

    pub(crate) fn delete<R: Record>(
        &mut self,
        key: &str,
    ) -> Result<(), StoreError> {
        let normalized = R::normalize_key(key);
        let collection = self.collection_mut(R::KIND);
        let id = collection.index.remove(&normalized).ok_or_else(|| {
            StoreError::NotFound {
                kind: R::KIND,
                key: normalized,
            }
        })?;
        collection.rows.remove(&id);
        Ok(())
    }
}

fn decode<R: Record>(value: &serde_json::Value) -> Result<R, StoreError> {
    R::deserialize(value).map_err(StoreError::Decode)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A minimal record with a case-insensitive key, standing in for the
    /// real record types that live in higher crates.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub(crate) struct Player {
        pub id: Option<RecordId>,
        pub name: String,
        pub score: u32,
        pub created_at: Option<DateTime<Utc>>,
        pub updated_at: Option<DateTime<Utc>>,
    }

    impl Player {
        pub(crate) fn named(name: &str) -> Self {
            Self {
                id: None,
                name: name.to_string(),
                score: 0,
                created_at: None,
                updated_at: None,
            }
        }
    }

    impl Record for Player {
        const KIND: RecordKind = RecordKind::AdminAccount;

        fn raw_key(&self) -> &str {
            &self.name
        }

        fn normalize_key(key: &str) -> String {
            key.trim().to_lowercase()
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

    #[test]
    fn test_create_assigns_increasing_ids_and_timestamps() {
        let mut tables = Tables::default();
        let now = Utc::now();

        let a = tables.create(Player::named("alice"), now).unwrap();
        let b = tables.create(Player::named("bob"), now).unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(a.created_at, Some(now));
        assert_eq!(a.updated_at, Some(now));
    }

    #[test]
    fn test_create_duplicate_key_returns_conflict() {
        let mut tables = Tables::default();
        tables.create(Player::named("alice"), Utc::now()).unwrap();

        // Same key after normalization.
        let result = tables.create(Player::named("ALICE"), Utc::now());

        assert!(
            matches!(result, Err(StoreError::Conflict { ref key, .. }) if key == "alice"),
            "got {result:?}"
        );
        assert_eq!(tables.count::<Player>(), 1);
    }

    #[test]
    fn test_conflict_does_not_consume_an_id() {
        let mut tables = Tables::default();
        tables.create(Player::named("alice"), Utc::now()).unwrap();
        let _ = tables.create(Player::named("alice"), Utc::now());

        let bob = tables.create(Player::named("bob"), Utc::now()).unwrap();
        assert_eq!(bob.id, Some(2));
    }

    #[test]
    fn test_get_uses_normalized_key() {
        let mut tables = Tables::default();
        tables.create(Player::named("Alice"), Utc::now()).unwrap();

        let found: Option<Player> = tables.get("  aLiCe ").unwrap();
        assert_eq!(found.map(|p| p.name), Some("Alice".to_string()));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let tables = Tables::default();
        let found: Option<Player> = tables.get("nobody").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_get_all_returns_creation_order() {
        let mut tables = Tables::default();
        for name in ["zed", "amy", "mo"] {
            tables.create(Player::named(name), Utc::now()).unwrap();
        }

        let names: Vec<String> = tables
            .get_all::<Player>()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["zed", "amy", "mo"]);
    }

    #[test]
    fn test_update_refreshes_updated_at_and_keeps_id() {
        let mut tables = Tables::default();
        let created_at = Utc::now();
        let mut alice = tables.create(Player::named("alice"), created_at).unwrap();

        alice.score = 10;
        let later = created_at + chrono::Duration::seconds(5);
        let updated = tables.update(&alice, later).unwrap();

        assert_eq!(updated.id, Some(1));
        assert_eq!(updated.created_at, Some(created_at));
        assert_eq!(updated.updated_at, Some(later));
        let stored: Player = tables.get("alice").unwrap().unwrap();
        assert_eq!(stored.score, 10);
    }

    #[test]
    fn test_update_keeps_stored_created_at() {
        let mut tables = Tables::default();
        let created_at = Utc::now();
        let mut alice = tables.create(Player::named("alice"), created_at).unwrap();

        let backdated = created_at - chrono::Duration::days(30);
        alice.created_at = Some(backdated);
        let updated = tables.update(&alice, created_at).unwrap();

        assert_eq!(updated.created_at, Some(created_at));
        let stored: Player = tables.get("alice").unwrap().unwrap();
        assert_eq!(stored.created_at, Some(created_at));
    }

    #[test]
    fn test_update_missing_returns_not_found() {
        let mut tables = Tables::default();
        let result = tables.update(&Player::named("ghost"), Utc::now());
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_delete_removes_row_and_index() {
        let mut tables = Tables::default();
        tables.create(Player::named("alice"), Utc::now()).unwrap();

        tables.delete::<Player>("ALICE").unwrap();

        assert_eq!(tables.count::<Player>(), 0);
        assert!(tables.get::<Player>("alice").unwrap().is_none());
        // The key is free again.
        assert!(tables.create(Player::named("alice"), Utc::now()).is_ok());
    }

    #[test]
    fn test_delete_missing_returns_not_found() {
        let mut tables = Tables::default();
        let result = tables.delete::<Player>("ghost");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
