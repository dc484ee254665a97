//! The session coordinator: mints, restores and revokes admin sessions.

use std::sync::Arc;

use chrono::Utc;
use gateforge_license::{License, LicenseKey, SessionSink};
use gateforge_store::RecordStore;

use crate::AdminError;

/// Manages the permanent `ADMIN-{USERNAME}-PERMANENT` licenses that back
/// admin sessions.
///
/// Each admin has exactly one such record. Logging in reactivates it,
/// logging out revokes it, and on a cold start the first active one is
/// adopted as the session again.
///
/// ```text
/// login_admin ──→ mint_admin_session ──→ store (create or refresh)
///                                    └──→ SessionSink::set_current_license
///
/// cold start ──→ ensure_session_restored ──→ first active admin license
/// ```
pub struct SessionCoordinator<S: RecordStore> {
    store: Arc<S>,
    sink: Arc<dyn SessionSink>,
}

impl<S: RecordStore> SessionCoordinator<S> {
    pub fn new(store: Arc<S>, sink: Arc<dyn SessionSink>) -> Self {
        Self { store, sink }
    }

    /// Creates or refreshes the admin's permanent license and adopts it
    /// as the session.
    ///
    /// # Errors
    /// [`AdminError::InvalidInput`] if the username does not survive the
    /// round trip through its admin key (see
    /// [`LicenseKey::admin_key_round_trips`]). Such a key would resolve to
    /// another account.
    pub async fn mint_admin_session(&self, username: &str) -> Result<License, AdminError> {
        if !LicenseKey::admin_key_round_trips(username) {
            return Err(AdminError::InvalidInput(format!(
                "username {username} has no unambiguous admin key"
            )));
        }
        let now = Utc::now();
        let key = LicenseKey::admin(username);

        let license = match self.store.get::<License>(key.as_str()).await? {
            Some(mut existing) => {
                existing.is_active = true;
                existing.is_admin = true;
                existing.mark_used(username, now);
                self.store.update(&existing).await?
            }
            None => {
                self.store
                    .create(License::admin_session(username, now))
                    .await?
            }
        };

        tracing::info!(%key, username, "admin session started");
        self.sink.set_current_license(license.clone());
        Ok(license)
    }

    /// Makes sure an admin session is current if one can be restored.
    ///
    /// Returns `true` right away when the session already is a valid
    /// admin session. Otherwise adopts the first persisted admin license
    /// that is still active. Store failures are logged and yield `false`.
    pub async fn ensure_session_restored(&self) -> bool {
        if self.is_admin_session() {
            return true;
        }

        match self.find_restorable().await {
            Ok(Some(license)) => {
                tracing::info!(
                    key = %license.key,
                    last_login = %license.session_anchor(),
                    "admin session restored"
                );
                self.sink.set_current_license(license);
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(error = %error, "admin session restore failed");
                false
            }
        }
    }

    async fn find_restorable(&self) -> Result<Option<License>, AdminError> {
        let licenses = self.store.get_all::<License>().await?;
        // `session_anchor()` is total, so "has a usable timestamp" holds
        // for every decoded record; only the flags and key shape matter.
        Ok(licenses.into_iter().find(|license| {
            license.is_admin && license.is_active && license.admin_username().is_some()
        }))
    }

    /// Revokes the admin's permanent license so it cannot be restored.
    ///
    /// Returns `Ok(false)` if the admin never had one.
    pub async fn revoke_admin_license(&self, username: &str) -> Result<bool, AdminError> {
        let key = LicenseKey::admin(username);
        let Some(mut license) = self.store.get::<License>(key.as_str()).await? else {
            return Ok(false);
        };

        if license.is_active {
            license.is_active = false;
            self.store.update(&license).await?;
            tracing::info!(%key, "admin license revoked");
        }
        Ok(true)
    }

    /// Ends the current admin session: clears the session, then revokes
    /// that admin's permanent license.
    ///
    /// Returns the username of the admin that was logged out.
    pub async fn revoke_admin_session(&self) -> Result<Option<String>, AdminError> {
        let username = self.sink.session().admin_username();
        self.sink.logout();

        if let Some(username) = &username {
            self.revoke_admin_license(username).await?;
        }
        Ok(username)
    }

    /// `true` iff the current session is a valid admin session.
    pub fn is_admin_session(&self) -> bool {
        self.sink.session().is_admin()
    }
}
