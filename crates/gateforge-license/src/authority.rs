//! The license authority: validates keys and owns the current session.

use std::sync::Arc;

use chrono::Utc;
use gateforge_store::RecordStore;
use tokio::sync::watch;

use crate::session::{SessionSink, SessionView};
use crate::{GameId, License, LicenseConfig, LicenseError, LicenseKey};

/// Validates license keys against the store and holds the single
/// current session.
///
/// ## Ownership
///
/// The authority keeps the only `watch::Sender` for the session, so every
/// change to "who is logged in" goes through one of its methods. Readers
/// get [`SessionView`]s from [`session`](Self::session).
///
/// ```text
/// login(key) ──→ store.get ──→ active? ──→ first use? store.update
///                                  │
///                                  └──→ send_replace(Some(license))
/// ```
///
/// The authority is cheap to share: wrap it in an `Arc` and hand the same
/// instance to the admin layer as an `Arc<dyn SessionSink>`.
pub struct LicenseAuthority<S: RecordStore> {
    store: Arc<S>,
    config: LicenseConfig,
    current: watch::Sender<Option<License>>,
}

impl<S: RecordStore> LicenseAuthority<S> {
    /// Creates an authority with no current session.
    pub fn new(store: Arc<S>, config: LicenseConfig) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            store,
            config,
            current,
        }
    }

    pub fn config(&self) -> &LicenseConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Logs in with a license key, stamping first use with
    /// [`LicenseConfig::default_used_by`].
    ///
    /// Returns `true` if the key now backs the session. On `false` the
    /// previous session (if any) is left exactly as it was.
    ///
    /// Admin session keys are accepted here too unless
    /// [`LicenseConfig::reject_admin_keys`] is set. An admin key is
    /// `ADMIN-<USERNAME>-PERMANENT`, so with the default config anyone who
    /// knows an admin's username can open an admin session while that
    /// admin's license is active.
    pub async fn login(&self, key: &str) -> bool {
        self.login_as(key, &self.config.default_used_by).await
    }

    /// Like [`login`](Self::login), recording `used_by` as the first user.
    pub async fn login_as(&self, key: &str, used_by: &str) -> bool {
        let key = LicenseKey::new(key);
        match self.try_login(&key, used_by).await {
            Ok(license) => {
                tracing::info!(%key, admin = license.is_admin, "license login");
                self.current.send_replace(Some(license));
                true
            }
            Err(LicenseError::Store(error)) => {
                tracing::warn!(%key, error = %error, "license login failed on store error");
                false
            }
            Err(error) => {
                tracing::debug!(%key, reason = %error, "license login rejected");
                false
            }
        }
    }

    async fn try_login(
        &self,
        key: &LicenseKey,
        used_by: &str,
    ) -> Result<License, LicenseError> {
        let mut license = self
            .store
            .get::<License>(key.as_str())
            .await?
            .ok_or_else(|| LicenseError::NotFound(key.to_string()))?;

        let now = Utc::now();
        if !license.is_active {
            return Err(LicenseError::Revoked(key.to_string()));
        }
        if self.config.reject_admin_keys && license.is_admin {
            return Err(LicenseError::AdminKey(key.to_string()));
        }
        if self.config.enforce_expiration && license.is_expired_at(now) {
            return Err(LicenseError::Expired(key.to_string()));
        }

        if license.is_unused() {
            license.mark_used(used_by, now);
            license = self.store.update(&license).await?;
        }
        Ok(license)
    }

    /// Clears the session. Persisted records are untouched.
    pub fn logout(&self) {
        if let Some(previous) = self.current.send_replace(None) {
            tracing::info!(key = %previous.key, "session cleared");
        }
    }

    /// `true` iff a session exists and is currently valid.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Whether the current session may open `game`.
    pub fn has_game_access(&self, game: &GameId) -> bool {
        self.session().has_game_access(game)
    }

    /// Adopts `license` as the session without consulting the store.
    pub fn set_current_license(&self, license: License) {
        tracing::debug!(key = %license.key, "session adopted");
        self.current.send_replace(Some(license));
    }

    pub fn current_license(&self) -> Option<License> {
        self.current.borrow().clone()
    }

    /// A read handle on the session.
    pub fn session(&self) -> SessionView {
        SessionView::new(self.current.subscribe(), self.config.enforce_expiration)
    }

    /// Re-reads the current license from the store.
    ///
    /// Picks up revocations made since login. If the record has been
    /// deleted the session is cleared. A concurrent logout or login wins
    /// over the reload: the fresh copy is only installed if the session
    /// still holds the same key.
    pub async fn reload_current(&self) -> Result<Option<License>, LicenseError> {
        let Some(current) = self.current_license() else {
            return Ok(None);
        };

        let fresh = self.store.get::<License>(current.key.as_str()).await?;
        let installed = self.current.send_if_modified(|slot| {
            if slot.as_ref().is_some_and(|held| held.key == current.key) {
                *slot = fresh.clone();
                true
            } else {
                false
            }
        });

        if installed && fresh.is_none() {
            tracing::info!(key = %current.key, "session license deleted, session cleared");
        }
        Ok(if installed { fresh } else { self.current_license() })
    }
}

impl<S: RecordStore> SessionSink for LicenseAuthority<S> {
    fn set_current_license(&self, license: License) {
        LicenseAuthority::set_current_license(self, license);
    }

    fn current_license(&self) -> Option<License> {
        LicenseAuthority::current_license(self)
    }

    fn logout(&self) {
        LicenseAuthority::logout(self);
    }

    fn session(&self) -> SessionView {
        LicenseAuthority::session(self)
    }
}
