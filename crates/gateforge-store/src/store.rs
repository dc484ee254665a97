//! The [`RecordStore`] trait: the persistence contract the authorities
//! are written against.

use std::future::Future;

use crate::{Record, StoreError};

/// Asynchronous keyed record store.
///
/// Every method is generic over the record type, which selects the
/// collection (`R::KIND`) and the key normalization (`R::normalize_key`).
/// Each call is atomic on its own; nothing spans two calls.
///
/// # Trait bounds
///
/// - `Send + Sync` → a store is shared (`Arc<S>`) by the license
///   authority, the session coordinator and the admin directory, which
///   may run on different Tokio worker threads.
/// - `'static` → the store lives as long as the platform.
///
/// # Example
///
/// ```rust
/// use gateforge_store::{MemoryStore, RecordStore};
/// # use gateforge_store::{Record, RecordId, RecordKind};
/// # use chrono::{DateTime, Utc};
/// # #[derive(Clone, serde::Serialize, serde::Deserialize)]
/// # struct Account { id: Option<RecordId>, username: String }
/// # impl Record for Account {
/// #     const KIND: RecordKind = RecordKind::AdminAccount;
/// #     fn raw_key(&self) -> &str { &self.username }
/// #     fn created_at(&self) -> Option<DateTime<Utc>> { None }
/// #     fn set_id(&mut self, id: RecordId) { self.id = Some(id) }
/// #     fn set_created_at(&mut self, _: DateTime<Utc>) {}
/// #     fn set_updated_at(&mut self, _: DateTime<Utc>) {}
/// # }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = MemoryStore::new();
/// let created = store
///     .create(Account { id: None, username: "admin".into() })
///     .await
///     .unwrap();
/// assert_eq!(created.id, Some(1));
///
/// let found: Option<Account> = store.get("admin").await.unwrap();
/// assert!(found.is_some());
/// # });
/// ```
pub trait RecordStore: Send + Sync + 'static {
    /// Returns every record of kind `R`, in creation order.
    fn get_all<R: Record>(
        &self,
    ) -> impl Future<Output = Result<Vec<R>, StoreError>> + Send;

    /// Looks a record up by its unique key.
    ///
    /// Returns `Ok(None)` on a miss; the key is normalized first.
    fn get<R: Record>(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<R>, StoreError>> + Send;

    /// Inserts a new record, assigning its id and both timestamps.
    ///
    /// # Errors
    /// [`StoreError::Conflict`] if the unique key is already taken.
    fn create<R: Record>(
        &self,
        record: R,
    ) -> impl Future<Output = Result<R, StoreError>> + Send;

    /// Replaces the stored record with the same unique key, refreshing
    /// `updated_at`. Returns the record as stored.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if no record has this unique key.
    fn update<R: Record>(
        &self,
        record: &R,
    ) -> impl Future<Output = Result<R, StoreError>> + Send;

    /// Removes the record with this unique key.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if no record has this unique key.
    fn delete<R: Record>(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Number of records of kind `R`.
    fn count<R: Record>(
        &self,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;
}
