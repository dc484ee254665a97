//! Unified error type for Gateforge.

use gateforge_admin::AdminError;
use gateforge_license::LicenseError;
use gateforge_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls,
/// so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GateforgeError {
    /// A persistence error (missing record, duplicate key, I/O, codec).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A license error (unknown or revoked key, key generation).
    #[error(transparent)]
    License(#[from] LicenseError),

    /// An admin error (credentials, authorization, input).
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// The configuration could not be read or parsed, or logging could
    /// not be set up.
    #[error("configuration error: {0}")]
    Config(String),
}
