//! `Platform` builder and the boundary operations.
//!
//! This is the entry point for embedding Gateforge. It ties together all
//! the layers: store → license authority → session coordinator → admin
//! directory.

use std::sync::Arc;

use gateforge_admin::{AdminDirectory, Role, SessionCoordinator};
use gateforge_license::{
    GameId, License, LicenseAuthority, SessionSink, SessionView, accessible_games,
};
use gateforge_store::RecordStore;

use crate::bootstrap::seed_store;
use crate::guard::{self, GuardDecision};
use crate::{GateforgeError, PlatformConfig};

/// Builder for configuring and starting a [`Platform`].
///
/// # Example
///
/// ```rust,no_run
/// use gateforge::prelude::*;
///
/// # async fn run() -> Result<(), GateforgeError> {
/// let store = FileStore::open("data/platform.json").await?;
/// let platform = PlatformBuilder::new()
///     .config(PlatformConfig::default())
///     .build(store)
///     .await?;
///
/// if platform.login("TEST-LICENSE-12345DEMO").await {
///     assert!(platform.is_authenticated());
/// }
/// # Ok(())
/// # }
/// ```
pub struct PlatformBuilder {
    config: PlatformConfig,
}

impl PlatformBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: PlatformConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the license configuration.
    pub fn license_config(mut self, config: gateforge_license::LicenseConfig) -> Self {
        self.config.license = config;
        self
    }

    /// Sets the password hashing cost.
    pub fn password_config(mut self, config: gateforge_admin::PasswordConfig) -> Self {
        self.config.password = config;
        self
    }

    /// Sets what is seeded into an empty store.
    pub fn bootstrap_config(mut self, config: crate::BootstrapConfig) -> Self {
        self.config.bootstrap = config;
        self
    }

    /// Builds the platform over `store`.
    ///
    /// 1. constructs the license authority, session coordinator and admin
    ///    directory, wiring the authority in as their `SessionSink`;
    /// 2. seeds the store (default super admin, demo license) if enabled;
    /// 3. loads the directory caches and restores a persisted admin
    ///    session if there is one.
    pub async fn build<S: RecordStore>(self, store: S) -> Result<Platform<S>, GateforgeError> {
        let store = Arc::new(store);
        let authority = Arc::new(LicenseAuthority::new(
            store.clone(),
            self.config.license.clone(),
        ));
        let sink: Arc<dyn SessionSink> = authority.clone();
        let coordinator = Arc::new(SessionCoordinator::new(store.clone(), sink.clone()));
        let admins = AdminDirectory::new(
            store.clone(),
            sink,
            coordinator.clone(),
            &self.config.admin_config(),
        )?;

        let seeded = seed_store(store.as_ref(), &self.config.bootstrap, admins.hasher()).await?;
        admins.reload().await?;
        let restored = coordinator.ensure_session_restored().await;

        tracing::info!(
            admin_seeded = seeded.admin_created,
            demo_license_seeded = seeded.demo_license_created,
            admin_session_restored = restored,
            "platform ready"
        );

        Ok(Platform {
            store,
            authority,
            coordinator,
            admins,
            config: self.config,
        })
    }
}

impl Default for PlatformBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running license and admin authority.
///
/// The methods here are the operations a UI calls. The components behind
/// them are reachable through [`licenses()`](Self::licenses),
/// [`admins()`](Self::admins) and [`coordinator()`](Self::coordinator).
pub struct Platform<S: RecordStore> {
    store: Arc<S>,
    authority: Arc<LicenseAuthority<S>>,
    coordinator: Arc<SessionCoordinator<S>>,
    admins: AdminDirectory<S>,
    config: PlatformConfig,
}

impl<S: RecordStore> Platform<S> {
    pub fn licenses(&self) -> &LicenseAuthority<S> {
        &self.authority
    }

    pub fn admins(&self) -> &AdminDirectory<S> {
        &self.admins
    }

    pub fn coordinator(&self) -> &SessionCoordinator<S> {
        &self.coordinator
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// A read handle on the session.
    pub fn session(&self) -> SessionView {
        self.authority.session()
    }

    // =========================================================================
    // Session queries
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.authority.is_authenticated()
    }

    pub fn has_game_access(&self, game: &GameId) -> bool {
        self.authority.has_game_access(game)
    }

    pub fn is_admin_logged_in(&self) -> bool {
        self.admins.is_admin_logged_in()
    }

    /// The subset of `catalog` the current session may open, in catalog
    /// order. Empty without a valid session.
    pub fn accessible_games(&self, catalog: impl IntoIterator<Item = GameId>) -> Vec<GameId> {
        accessible_games(self.session().valid_license().as_ref(), catalog)
    }

    pub async fn ensure_session_restored(&self) -> bool {
        self.coordinator.ensure_session_restored().await
    }

    // =========================================================================
    // Login / logout
    // =========================================================================

    pub async fn login(&self, key: &str) -> bool {
        self.authority.login(key).await
    }

    pub fn logout(&self) {
        self.authority.logout();
    }

    pub async fn login_admin(&self, username: &str, password: &str) -> bool {
        self.admins.login_admin(username, password).await
    }

    pub async fn logout_admin(&self) {
        self.admins.logout_admin().await;
    }

    /// Ends whatever session is current. Admin sessions also have their
    /// permanent license revoked.
    pub async fn sign_out(&self) {
        if self.admins.is_admin_logged_in() {
            self.admins.logout_admin().await;
        } else {
            self.authority.logout();
        }
    }

    // =========================================================================
    // Administration
    // =========================================================================

    pub async fn generate_license(
        &self,
        expiration_days: u32,
        allowed_games: impl IntoIterator<Item = GameId>,
    ) -> Result<License, GateforgeError> {
        Ok(self
            .admins
            .generate_license(expiration_days, allowed_games)
            .await?)
    }

    pub async fn revoke_license(&self, key: &str) -> Result<(), GateforgeError> {
        Ok(self.admins.revoke_license(key).await?)
    }

    pub async fn create_admin_account(&self, username: &str, password: &str, role: Role) -> bool {
        self.admins
            .create_admin_account(username, password, role)
            .await
    }

    pub async fn delete_admin_account(&self, username: &str) -> bool {
        self.admins.delete_admin_account(username).await
    }

    // =========================================================================
    // Guards
    // =========================================================================

    pub fn auth_guard(&self) -> GuardDecision {
        guard::auth_guard(&self.session())
    }

    pub fn game_guard(&self, game: &GameId) -> GuardDecision {
        guard::game_guard(&self.session(), game)
    }

    pub fn admin_guard(&self) -> GuardDecision {
        guard::admin_guard(&self.session())
    }

    /// [`admin_guard`](Self::admin_guard) after trying to restore a
    /// persisted admin session, for the first navigation after a start.
    pub async fn admin_guard_restoring(&self) -> GuardDecision {
        self.coordinator.ensure_session_restored().await;
        self.admin_guard()
    }
}
