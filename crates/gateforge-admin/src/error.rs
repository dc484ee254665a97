//! Error types for the admin layer.

use gateforge_license::LicenseError;
use gateforge_store::StoreError;

/// Errors that can occur during admin operations.
///
/// The `bool`-returning operations (`login_admin`,
/// `create_admin_account`, `delete_admin_account`) log these and return
/// `false`; `generate_license`, `revoke_license` and the other
/// `Result`-returning operations hand them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Unknown username or wrong password. Deliberately doesn't say which.
    #[error("invalid admin credentials")]
    InvalidCredentials,

    /// The acting session lacks the required privilege.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The target account or license does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// An account with this username already exists.
    #[error("{0} already exists")]
    Conflict(String),

    /// Blank username, empty password, and similar.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing failed, or a stored hash could not be parsed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    License(#[from] LicenseError),
}
