//! Admin accounts and roles.

use std::fmt;

use chrono::{DateTime, Utc};
use gateforge_store::{Record, RecordId, RecordKind};
use serde::{Deserialize, Serialize};

/// What an admin may do.
///
/// Every admin can issue and revoke licenses. Only a `SuperAdmin` can
/// create and delete admin accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn can_manage_accounts(self) -> bool {
        self == Role::SuperAdmin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted admin account, stored in the `admin_accounts` collection.
///
/// The username is unique case-insensitively: `"Admin"` and `"admin"`
/// are the same account. The spelling given at creation is kept for
/// display.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    #[serde(default)]
    pub id: Option<RecordId>,

    pub username: String,

    /// Argon2id PHC string. Never the plaintext.
    pub password_hash: String,

    pub role: Role,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl AdminAccount {
    /// Builds an unsaved account. Timestamps are set by the store.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive username comparison.
    pub fn is_named(&self, username: &str) -> bool {
        Self::normalize_key(&self.username) == Self::normalize_key(username)
    }
}

// The hash is kept out of logs.
impl fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl Record for AdminAccount {
    const KIND: RecordKind = RecordKind::AdminAccount;

    fn raw_key(&self) -> &str {
        &self.username
    }

    fn normalize_key(key: &str) -> String {
        key.trim().to_lowercase()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
