//! The admin directory: admin accounts, admin login, and license
//! administration.

use std::sync::Arc;

use chrono::Utc;
use gateforge_license::{GameId, License, LicenseKey, SessionSink, unique_license_key};
use gateforge_store::{Record, RecordStore, StoreError};
use tokio::sync::watch;

use crate::{AdminAccount, AdminConfig, AdminError, PasswordHasher, Role, SessionCoordinator};

/// Admin accounts, admin sessions and the licenses admins issue.
///
/// ## Caches
///
/// The directory keeps two in-memory snapshots for display: every admin
/// account, and every generated (non-admin) license. Both are reloaded
/// from the store after each mutation and can be observed with
/// [`subscribe_accounts`](Self::subscribe_accounts) /
/// [`subscribe_licenses`](Self::subscribe_licenses). A failed reload is
/// logged and leaves the previous snapshot in place.
///
/// ## Authorization
///
/// | Operation                         | Needs            |
/// |-----------------------------------|------------------|
/// | `generate_license`                | any admin        |
/// | `create/delete_admin_account`     | `super_admin`    |
/// | `revoke_license`, reads           | nothing          |
///
/// The acting admin's role is always read from the store, not from the
/// cache.
pub struct AdminDirectory<S: RecordStore> {
    store: Arc<S>,
    sink: Arc<dyn SessionSink>,
    coordinator: Arc<SessionCoordinator<S>>,
    hasher: PasswordHasher,
    key_generation_attempts: u32,
    accounts: watch::Sender<Vec<AdminAccount>>,
    licenses: watch::Sender<Vec<License>>,
}

impl<S: RecordStore> AdminDirectory<S> {
    /// Creates a directory with empty caches. Call [`reload`](Self::reload)
    /// to fill them.
    ///
    /// # Errors
    /// [`AdminError::Hash`] if the password parameters are invalid.
    pub fn new(
        store: Arc<S>,
        sink: Arc<dyn SessionSink>,
        coordinator: Arc<SessionCoordinator<S>>,
        config: &AdminConfig,
    ) -> Result<Self, AdminError> {
        let (accounts, _) = watch::channel(Vec::new());
        let (licenses, _) = watch::channel(Vec::new());
        Ok(Self {
            store,
            sink,
            coordinator,
            hasher: PasswordHasher::new(&config.password)?,
            key_generation_attempts: config.key_generation_attempts,
            accounts,
            licenses,
        })
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    // =========================================================================
    // Admin sessions
    // =========================================================================

    /// Logs an admin in by username (case-insensitive) and password.
    ///
    /// On success the admin's permanent license becomes the session.
    /// Every failure returns `false`.
    pub async fn login_admin(&self, username: &str, password: &str) -> bool {
        match self.try_login_admin(username, password).await {
            Ok(account) => {
                tracing::info!(username = %account.username, role = %account.role, "admin login");
                true
            }
            Err(AdminError::InvalidCredentials) => {
                tracing::debug!(username, "admin login rejected");
                false
            }
            Err(error) => {
                tracing::warn!(username, error = %error, "admin login failed");
                false
            }
        }
    }

    async fn try_login_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminAccount, AdminError> {
        let account = self
            .store
            .get::<AdminAccount>(username)
            .await?
            .ok_or(AdminError::InvalidCredentials)?;

        if !self.hasher.verify_password(password, &account.password_hash)? {
            return Err(AdminError::InvalidCredentials);
        }

        self.coordinator
            .mint_admin_session(&account.username)
            .await?;
        Ok(account)
    }

    /// Logs the current admin out and revokes their permanent license, so
    /// a restart does not restore the session.
    ///
    /// The session is cleared even if the revocation cannot be persisted.
    pub async fn logout_admin(&self) {
        match self.coordinator.revoke_admin_session().await {
            Ok(Some(username)) => tracing::info!(username, "admin logout"),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(error = %error, "admin logout could not revoke session license")
            }
        }
    }

    /// `true` iff the session is a valid admin session.
    pub fn is_admin_logged_in(&self) -> bool {
        self.sink.session().is_admin()
    }

    /// The logged-in admin's username (lower-case), parsed from the
    /// session key.
    pub fn current_admin_username(&self) -> Option<String> {
        self.sink.session().admin_username()
    }

    /// The logged-in admin's role, from the account cache.
    pub fn current_admin_role(&self) -> Option<Role> {
        let username = self.current_admin_username()?;
        self.accounts
            .borrow()
            .iter()
            .find(|account| account.is_named(&username))
            .map(|account| account.role)
    }

    async fn acting_super_admin(&self) -> Result<AdminAccount, AdminError> {
        let username = self
            .current_admin_username()
            .ok_or_else(|| AdminError::Unauthorized("no admin session".into()))?;
        let account = self
            .store
            .get::<AdminAccount>(&username)
            .await?
            .ok_or_else(|| AdminError::Unauthorized(format!("account {username} no longer exists")))?;

        if !account.role.can_manage_accounts() {
            return Err(AdminError::Unauthorized(format!(
                "{} is not a super admin",
                account.username
            )));
        }
        Ok(account)
    }

    // =========================================================================
    // Admin accounts
    // =========================================================================

    /// Creates an admin account. Only a super admin may do this.
    ///
    /// Returns `false` for an unauthorized caller, a blank username, an
    /// empty password, or a username that already exists in any casing.
    /// Usernames whose case mapping is lossy (such as `"straße"`) are
    /// refused as well, since their admin key would name another account.
    pub async fn create_admin_account(&self, username: &str, password: &str, role: Role) -> bool {
        match self.try_create_admin_account(username, password, role).await {
            Ok(account) => {
                tracing::info!(username = %account.username, role = %account.role, "admin account created");
                true
            }
            Err(error) => {
                tracing::warn!(username, error = %error, "admin account not created");
                false
            }
        }
    }

    async fn try_create_admin_account(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<AdminAccount, AdminError> {
        self.acting_super_admin().await?;

        let username = username.trim();
        if username.is_empty() {
            return Err(AdminError::InvalidInput("username is blank".into()));
        }
        if !LicenseKey::admin_key_round_trips(username) {
            return Err(AdminError::InvalidInput(format!(
                "username {username} has no unambiguous admin key"
            )));
        }
        if password.is_empty() {
            return Err(AdminError::InvalidInput("password is empty".into()));
        }

        let hash = self.hasher.hash_password(password)?;
        let account = self
            .store
            .create(AdminAccount::new(username, hash, role))
            .await
            .map_err(|error| match error {
                StoreError::Conflict { .. } => {
                    AdminError::Conflict(format!("account {username}"))
                }
                other => other.into(),
            })?;

        self.refresh_accounts().await;
        Ok(account)
    }

    /// Deletes an admin account. Only a super admin may do this, and never
    /// to their own account.
    ///
    /// The deleted admin's permanent license is revoked too.
    pub async fn delete_admin_account(&self, username: &str) -> bool {
        match self.try_delete_admin_account(username).await {
            Ok(()) => {
                tracing::info!(username, "admin account deleted");
                true
            }
            Err(error) => {
                tracing::warn!(username, error = %error, "admin account not deleted");
                false
            }
        }
    }

    async fn try_delete_admin_account(&self, username: &str) -> Result<(), AdminError> {
        let acting = self.acting_super_admin().await?;
        if acting.is_named(username) {
            return Err(AdminError::Unauthorized(
                "cannot delete your own account".into(),
            ));
        }

        self.store
            .delete::<AdminAccount>(username)
            .await
            .map_err(|error| match error {
                StoreError::NotFound { .. } => {
                    AdminError::NotFound(format!("account {}", username.trim()))
                }
                other => other.into(),
            })?;

        let normalized = AdminAccount::normalize_key(username);
        if let Err(error) = self.coordinator.revoke_admin_license(&normalized).await {
            tracing::warn!(username, error = %error, "deleted admin's license not revoked");
        }

        self.refresh_accounts().await;
        Ok(())
    }

    /// The last-loaded account snapshot, in creation order.
    pub fn admin_accounts(&self) -> Vec<AdminAccount> {
        self.accounts.borrow().clone()
    }

    /// Receives every new account snapshot. Drop it to unsubscribe.
    pub fn subscribe_accounts(&self) -> watch::Receiver<Vec<AdminAccount>> {
        self.accounts.subscribe()
    }

    // =========================================================================
    // Licenses
    // =========================================================================

    /// Issues a new license valid for `expiration_days`, restricted to
    /// `allowed_games` (empty means every game).
    ///
    /// # Errors
    /// - [`AdminError::Unauthorized`] without an admin session
    /// - [`AdminError::License`] if no unique key could be found
    /// - [`AdminError::Store`] if the license could not be saved
    pub async fn generate_license(
        &self,
        expiration_days: u32,
        allowed_games: impl IntoIterator<Item = GameId>,
    ) -> Result<License, AdminError> {
        let issuer = self
            .current_admin_username()
            .ok_or_else(|| AdminError::Unauthorized("no admin session".into()))?;

        let key =
            unique_license_key(self.store.as_ref(), self.key_generation_attempts).await?;
        let license = self
            .store
            .create(License::issue(
                key,
                Some(expiration_days),
                allowed_games,
                issuer,
            ))
            .await?;

        tracing::info!(
            key = %license.key,
            created_by = %license.created_by,
            expiration_days,
            games = license.allowed_games.len(),
            "license generated"
        );
        self.refresh_licenses().await;
        Ok(license)
    }

    /// Revokes a license. Revoking an already revoked license succeeds.
    ///
    /// If the license backs the current session, the session sees the
    /// revocation immediately.
    ///
    /// # Errors
    /// [`AdminError::NotFound`] for an unknown key.
    pub async fn revoke_license(&self, key: &str) -> Result<(), AdminError> {
        let key = LicenseKey::new(key);
        let mut license = self
            .store
            .get::<License>(key.as_str())
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("license {key}")))?;

        if license.is_active {
            license.is_active = false;
            license = self.store.update(&license).await?;
            tracing::info!(%key, "license revoked");
        }

        if self
            .sink
            .current_license()
            .is_some_and(|current| current.key == license.key)
        {
            self.sink.set_current_license(license);
        }

        self.refresh_licenses().await;
        Ok(())
    }

    /// Looks a key up in the license cache; `Some` only for active,
    /// generated licenses.
    pub fn validate_license_key(&self, key: &str) -> Option<License> {
        let key = LicenseKey::new(key);
        self.licenses
            .borrow()
            .iter()
            .find(|license| license.key == key && license.is_active)
            .cloned()
    }

    /// Records a use of the license by `used_by`, overwriting any earlier
    /// usage stamp.
    ///
    /// # Errors
    /// [`AdminError::NotFound`] for an unknown key.
    pub async fn mark_license_used(&self, key: &str, used_by: &str) -> Result<(), AdminError> {
        let key = LicenseKey::new(key);
        let mut license = self
            .store
            .get::<License>(key.as_str())
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("license {key}")))?;

        license.mark_used(used_by, Utc::now());
        self.store.update(&license).await?;
        tracing::debug!(%key, used_by, "license marked used");

        self.refresh_licenses().await;
        Ok(())
    }

    /// The last-loaded snapshot of generated licenses, in creation order.
    /// Admin session licenses are not included.
    pub fn generated_licenses(&self) -> Vec<License> {
        self.licenses.borrow().clone()
    }

    /// Receives every new license snapshot. Drop it to unsubscribe.
    pub fn subscribe_licenses(&self) -> watch::Receiver<Vec<License>> {
        self.licenses.subscribe()
    }

    // =========================================================================
    // Cache loading
    // =========================================================================

    /// Reloads both caches from the store.
    pub async fn reload(&self) -> Result<(), AdminError> {
        self.reload_accounts().await?;
        self.reload_licenses().await?;
        Ok(())
    }

    async fn reload_accounts(&self) -> Result<(), AdminError> {
        let accounts = self.store.get_all::<AdminAccount>().await?;
        self.accounts.send_replace(accounts);
        Ok(())
    }

    async fn reload_licenses(&self) -> Result<(), AdminError> {
        let licenses: Vec<License> = self
            .store
            .get_all::<License>()
            .await?
            .into_iter()
            .filter(|license| !license.is_admin)
            .collect();
        self.licenses.send_replace(licenses);
        Ok(())
    }

    async fn refresh_accounts(&self) {
        if let Err(error) = self.reload_accounts().await {
            tracing::warn!(error = %error, "account cache reload failed");
        }
    }

    async fn refresh_licenses(&self) {
        if let Err(error) = self.reload_licenses().await {
            tracing::warn!(error = %error, "license cache reload failed");
        }
    }
}
