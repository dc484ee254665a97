//! The [`Record`] trait: what a type must provide to be persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

/// Store-assigned numeric identifier of a record.
///
/// Ids are handed out from a single counter shared by all collections,
/// so they are unique across the whole store and increase with creation
/// order.
pub type RecordId = u64;

/// The collections a store holds.
///
/// Each kind maps to one keyed collection with a unique index on one
/// field: `admin_accounts` is indexed by username, `generated_licenses`
/// by license key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    AdminAccount,
    License,
}

impl RecordKind {
    /// The collection name used in persisted files and in logs.
    pub fn collection(self) -> &'static str {
        match self {
            Self::AdminAccount => "admin_accounts",
            Self::License => "generated_licenses",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// A persisted record type.
///
/// Records are stored as serde values, so any `Serialize +
/// DeserializeOwned` type can implement this. The store never looks
/// inside a record except through these methods.
///
/// # Unique keys
///
/// [`raw_key`](Record::raw_key) returns the field the collection is
/// indexed on, and [`normalize_key`](Record::normalize_key) folds it into
/// the form used for lookups. A type with case-insensitive keys lower-cases
/// there; the same function is applied to the argument of
/// `RecordStore::get`, so `get("Admin")` and `get("admin")` hit the same
/// record.
pub trait Record:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Which collection this record type lives in.
    const KIND: RecordKind;

    /// The unique-key field, as stored.
    fn raw_key(&self) -> &str;

    /// Folds a key into its lookup form. Default: unchanged.
    fn normalize_key(key: &str) -> String {
        key.to_string()
    }

    /// The normalized unique key of this record.
    fn unique_key(&self) -> String {
        Self::normalize_key(self.raw_key())
    }

    /// The creation stamp, if the record has one. `update` carries the
    /// stored value forward instead of trusting the caller's copy.
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Called by the store when the record is created or updated.
    fn set_id(&mut self, id: RecordId);

    /// Called by the store on `create`.
    fn set_created_at(&mut self, at: DateTime<Utc>);

    /// Called by the store on `create` and `update`.
    fn set_updated_at(&mut self, at: DateTime<Utc>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_collection_names() {
        assert_eq!(RecordKind::AdminAccount.collection(), "admin_accounts");
        assert_eq!(RecordKind::License.collection(), "generated_licenses");
        assert_eq!(RecordKind::License.to_string(), "generated_licenses");
    }
}
