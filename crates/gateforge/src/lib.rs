//! # Gateforge
//!
//! License and admin authority for multi-game platforms.
//!
//! Gateforge decides who may enter a platform and which games they may
//! open. End users log in with a license key; administrators log in with
//! a username and password, issue and revoke license keys, and (as super
//! admins) manage other admin accounts. Everything is persisted through a
//! [`RecordStore`](gateforge_store::RecordStore), so an admin session
//! survives a restart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gateforge::prelude::*;
//!
//! # async fn run() -> Result<(), GateforgeError> {
//! let platform = PlatformBuilder::new().build(MemoryStore::new()).await?;
//!
//! assert!(platform.login_admin("admin", "admin123").await);
//! let license = platform
//!     .generate_license(30, [GameId::from("slot-machine")])
//!     .await?;
//!
//! platform.logout_admin().await;
//! assert!(platform.login(license.key.as_str()).await);
//! assert!(platform.has_game_access(&GameId::from("slot-machine")));
//! # Ok(())
//! # }
//! ```

mod bootstrap;
mod config;
mod error;
pub mod guard;
mod logging;
mod platform;

pub use bootstrap::{SeedReport, seed_store};
pub use config::{BootstrapConfig, LogConfig, PlatformConfig};
pub use error::GateforgeError;
pub use logging::init_tracing;
pub use platform::{Platform, PlatformBuilder};

pub use gateforge_admin as admin;
pub use gateforge_license as license;
pub use gateforge_store as store;

/// Everything needed to embed Gateforge.
pub mod prelude {
    pub use crate::guard::{GuardDecision, Route};
    pub use crate::{
        BootstrapConfig, GateforgeError, LogConfig, Platform, PlatformBuilder, PlatformConfig,
        init_tracing,
    };
    pub use gateforge_admin::{AdminAccount, AdminDirectory, PasswordConfig, Role};
    pub use gateforge_license::{
        GameId, License, LicenseAuthority, LicenseConfig, LicenseKey, SessionView,
    };
    pub use gateforge_store::{FileStore, MemoryStore, RecordStore};
}
