//! Error types for the license layer.

use gateforge_store::StoreError;

/// Errors that can occur during license operations.
///
/// `LicenseAuthority::login` folds all of these into `false`; they reach
/// callers only through the `Result`-returning operations (key
/// generation, `reload_current`).
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    /// No license with this key exists.
    #[error("license {0} not found")]
    NotFound(String),

    /// The license exists but has been revoked.
    #[error("license {0} has been revoked")]
    Revoked(String),

    /// The license is past its expiration window (only raised when
    /// expiration is enforced, see `LicenseConfig::enforce_expiration`).
    #[error("license {0} has expired")]
    Expired(String),

    /// An admin session key was presented on the end-user login path
    /// while `LicenseConfig::reject_admin_keys` is set.
    #[error("license {0} is an admin session key")]
    AdminKey(String),

    /// Every generated key collided with an existing one.
    /// With 36^20 possible keys this means something is badly wrong
    /// with the RNG, not that the key space is actually full.
    #[error("no unique license key found after {0} attempts")]
    KeySpaceExhausted(u32),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
