//! Platform scenarios, including restarts over a file-backed store.

use gateforge::prelude::*;

fn fast_config() -> PlatformConfig {
    PlatformConfig {
        password: PasswordConfig::insecure_fast(),
        ..PlatformConfig::default()
    }
}

async fn memory_platform() -> Platform<MemoryStore> {
    PlatformBuilder::new()
        .config(fast_config())
        .build(MemoryStore::new())
        .await
        .unwrap()
}

async fn file_platform(path: &std::path::Path) -> Platform<FileStore> {
    let store = FileStore::open(path).await.unwrap();
    PlatformBuilder::new()
        .config(fast_config())
        .build(store)
        .await
        .unwrap()
}

// =============================================================================
// Fresh start
// =============================================================================

#[tokio::test]
async fn test_fresh_platform_is_seeded_and_logged_out() {
    let platform = memory_platform().await;

    assert!(!platform.is_authenticated());
    assert!(!platform.is_admin_logged_in());
    assert_eq!(platform.admins().admin_accounts().len(), 1);
    assert_eq!(platform.admins().generated_licenses().len(), 1, "demo license");
}

#[tokio::test]
async fn test_demo_license_opens_every_game() {
    let platform = memory_platform().await;

    assert!(platform.login("TEST-LICENSE-12345DEMO").await);

    assert!(platform.has_game_access(&GameId::from("slot-machine")));
    assert!(platform.has_game_access(&GameId::from("test-game")));
    assert!(!platform.is_admin_logged_in());
    assert_eq!(platform.admin_guard(), GuardDecision::Redirect(Route::Login));
}

#[tokio::test]
async fn test_admin_login_logout_then_no_restore() {
    let platform = memory_platform().await;

    assert!(platform.login_admin("admin", "admin123").await);
    assert!(platform.is_admin_logged_in());

    platform.logout_admin().await;

    assert!(!platform.ensure_session_restored().await);
    assert!(!platform.is_admin_logged_in());
    assert!(!platform.is_authenticated());
}

#[tokio::test]
async fn test_end_to_end_license_lifecycle() {
    let platform = memory_platform().await;
    let catalog = || ["slot-machine", "test-game"].map(GameId::from);

    assert!(platform.login_admin("admin", "admin123").await);
    let license = platform
        .generate_license(30, [GameId::from("test-game")])
        .await
        .unwrap();
    platform.sign_out().await;
    assert!(!platform.is_authenticated());

    assert!(platform.login(license.key.as_str()).await);
    assert_eq!(platform.accessible_games(catalog()), vec![GameId::from("test-game")]);
    assert_eq!(
        platform.game_guard(&GameId::from("slot-machine")),
        GuardDecision::Redirect(Route::Home)
    );

    platform.revoke_license(license.key.as_str()).await.unwrap();
    assert!(!platform.is_authenticated());
    assert!(platform.accessible_games(catalog()).is_empty());

    platform.sign_out().await;
    assert!(!platform.login(license.key.as_str()).await);
}

#[tokio::test]
async fn test_generate_license_as_user_is_unauthorized() {
    let platform = memory_platform().await;
    platform.login("TEST-LICENSE-12345DEMO").await;

    let result = platform.generate_license(30, []).await;

    assert!(matches!(
        result,
        Err(GateforgeError::Admin(gateforge::admin::AdminError::Unauthorized(_)))
    ));
}

#[tokio::test]
async fn test_account_management_through_platform() {
    let platform = memory_platform().await;
    platform.login_admin("admin", "admin123").await;

    assert!(platform.create_admin_account("ops", "ops-pass", Role::Admin).await);
    assert!(!platform.create_admin_account("OPS", "other", Role::Admin).await);
    assert!(!platform.delete_admin_account("admin").await);
    assert!(platform.delete_admin_account("ops").await);
    assert!(!platform.login_admin("ops", "ops-pass").await);
}

#[tokio::test]
async fn test_builder_setters_compose_from_default() {
    let platform = PlatformBuilder::default()
        .password_config(PasswordConfig::insecure_fast())
        .license_config(LicenseConfig {
            reject_admin_keys: true,
            ..LicenseConfig::default()
        })
        .build(MemoryStore::new())
        .await
        .unwrap();

    assert!(platform.config().license.reject_admin_keys);
    assert!(platform.login_admin("admin", "admin123").await);

    // Clearing only the session leaves the admin license active, but the
    // key itself is refused on the end-user path.
    platform.logout();
    assert!(!platform.login("ADMIN-ADMIN-PERMANENT").await);
    assert!(platform.login("TEST-LICENSE-12345DEMO").await);
}

#[tokio::test]
async fn test_bootstrap_can_be_disabled() {
    let platform = PlatformBuilder::new()
        .config(fast_config())
        .bootstrap_config(BootstrapConfig {
            seed: false,
            ..BootstrapConfig::default()
        })
        .build(MemoryStore::new())
        .await
        .unwrap();

    assert!(platform.admins().admin_accounts().is_empty());
    assert!(!platform.login_admin("admin", "admin123").await);
    assert!(!platform.login("TEST-LICENSE-12345DEMO").await);
}

// =============================================================================
// Restarts
// =============================================================================

#[tokio::test]
async fn test_admin_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("platform.json");

    {
        let platform = file_platform(&path).await;
        assert!(platform.login_admin("admin", "admin123").await);
    }

    let platform = file_platform(&path).await;
    assert!(platform.is_admin_logged_in());
    assert_eq!(
        platform.admins().current_admin_username().as_deref(),
        Some("admin")
    );
    assert!(platform.admin_guard().is_allowed());
}

#[tokio::test]
async fn test_logged_out_admin_stays_out_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("platform.json");

    {
        let platform = file_platform(&path).await;
        assert!(platform.login_admin("admin", "admin123").await);
        platform.logout_admin().await;
    }

    let platform = file_platform(&path).await;
    assert!(!platform.is_admin_logged_in());
    assert_eq!(
        platform.admin_guard_restoring().await,
        GuardDecision::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_restart_does_not_reseed_or_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("platform.json");

    let key = {
        let platform = file_platform(&path).await;
        platform.login_admin("admin", "admin123").await;
        platform.login_admin("admin", "admin123").await;
        platform.generate_license(7, []).await.unwrap().key
    };

    let platform = file_platform(&path).await;
    let licenses: Vec<License> = platform.store().get_all().await.unwrap();
    let admin_keys = licenses.iter().filter(|l| l.is_admin).count();

    assert_eq!(admin_keys, 1);
    assert_eq!(platform.admins().admin_accounts().len(), 1);
    assert_eq!(platform.admins().generated_licenses().len(), 2);
    assert!(platform.admins().validate_license_key(key.as_str()).is_some());
}

#[tokio::test]
async fn test_end_user_session_is_not_restored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("platform.json");

    {
        let platform = file_platform(&path).await;
        assert!(platform.login("TEST-LICENSE-12345DEMO").await);
    }

    let platform = file_platform(&path).await;
    assert!(!platform.is_authenticated());
    assert!(!platform.ensure_session_restored().await);
}

#[tokio::test]
async fn test_config_from_file_drives_platform() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("gateforge.json");
    tokio::fs::write(
        &config_path,
        r#"{
            "password": { "memory_kib": 8, "iterations": 1, "parallelism": 1 },
            "bootstrap": { "admin_username": "root", "admin_password": "toor-pass" }
        }"#,
    )
    .await
    .unwrap();

    let config = PlatformConfig::from_file(&config_path).await.unwrap();
    let platform = PlatformBuilder::new()
        .config(config)
        .build(MemoryStore::new())
        .await
        .unwrap();

    assert!(!platform.login_admin("admin", "admin123").await);
    assert!(platform.login_admin("root", "toor-pass").await);
}
