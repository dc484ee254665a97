//! Error types for the record store.

use crate::RecordKind;

/// Errors that can occur during record store operations.
///
/// Lookups that simply miss are not errors (`get` returns `Ok(None)`);
/// `NotFound` is reserved for operations that require the record to
/// exist, like `update` and `delete`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this unique key exists in the collection.
    #[error("{kind} record '{key}' not found")]
    NotFound { kind: RecordKind, key: String },

    /// A record with this unique key already exists.
    /// Raised by `create` for a duplicate username or license key.
    #[error("{kind} record '{key}' already exists")]
    Conflict { kind: RecordKind, key: String },

    /// A record (or the whole table file) could not be serialized.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Stored bytes could not be turned back into a record.
    ///
    /// Usually a hand-edited or truncated store file, or a record
    /// written by an incompatible version.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// Reading or writing the backing file failed.
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`StoreError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
