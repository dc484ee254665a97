use std::path::PathBuf;

use gateforge::prelude::*;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The games this arcade cabinet ships with.
fn catalog() -> Vec<GameId> {
    ["slot-machine", "test-game"].map(GameId::from).to_vec()
}

fn show_menu(platform: &Platform<FileStore>) {
    let games = platform.accessible_games(catalog());
    let names: Vec<&str> = games.iter().map(GameId::as_str).collect();
    println!("  menu: {names:?}");
    for game in catalog() {
        let decision = platform.game_guard(&game);
        println!("  open {game}: {decision:?}");
    }
    println!("  admin pages: {:?}", platform.admin_guard());
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), GateforgeError> {
    // Usage: arcade-console [DATA_FILE] [CONFIG_FILE]
    let mut args = std::env::args().skip(1);
    let data_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("arcade-data.json"));
    let config = match args.next() {
        Some(path) => PlatformConfig::from_file(path).await?,
        None => PlatformConfig::default(),
    };

    init_tracing(&config.log)?;

    let store = FileStore::open(&data_path).await?;
    let platform = PlatformBuilder::new().config(config).build(store).await?;

    // Print every session change as it happens.
    let mut session = platform.session();
    let watcher = tokio::spawn(async move {
        while session.changed().await {
            match session.snapshot() {
                Some(license) if license.is_admin => {
                    println!("[session] admin {}", license.key)
                }
                Some(license) => println!(
                    "[session] license {} (active: {})",
                    license.key, license.is_active
                ),
                None => println!("[session] signed out"),
            }
        }
    });

    println!("startup, admin restored: {}", platform.is_admin_logged_in());
    show_menu(&platform);

    println!("admin signs in");
    if !platform.login_admin("admin", "admin123").await {
        tracing::warn!("default admin credentials rejected, stopping demo");
        return Ok(());
    }
    let license = platform
        .generate_license(30, [GameId::from("test-game")])
        .await?;
    println!(
        "  issued {} for {}",
        license.key,
        gateforge::license::describe_game_access(&license)
    );
    platform.sign_out().await;

    println!("player signs in with {}", license.key);
    platform.login(license.key.as_str()).await;
    show_menu(&platform);

    println!("license revoked");
    platform.revoke_license(license.key.as_str()).await?;
    show_menu(&platform);

    println!("admin signs in again and stays signed in across restarts");
    platform.sign_out().await;
    platform.login_admin("admin", "admin123").await;
    show_menu(&platform);

    drop(platform);
    let _ = watcher.await;
    println!("data written to {}", data_path.display());
    Ok(())
}
