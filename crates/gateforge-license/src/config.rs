//! License authority configuration.

use serde::{Deserialize, Serialize};

/// Configuration for license validation and key generation.
///
/// By default `expiration_days` is recorded on every license but not
/// enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Reject (and stop honouring) licenses whose `expiration_days`
    /// window, counted from `created_at`, has passed.
    pub enforce_expiration: bool,

    /// How many random keys to try before giving up on finding one that
    /// isn't already persisted.
    pub key_generation_attempts: u32,

    /// The `used_by` label stamped on a license when it is first used
    /// through a plain `login`.
    pub default_used_by: String,

    /// Refuse admin session keys (`ADMIN-<USERNAME>-PERMANENT`) on the
    /// plain `login` path. Those keys are derived from the username, so
    /// anyone who knows a username can type one while it is active.
    pub reject_admin_keys: bool,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            enforce_expiration: false,
            key_generation_attempts: 16,
            default_used_by: "user".to_string(),
            reject_admin_keys: false,
        }
    }
}
