//! Admin layer for Gateforge.
//!
//! Administrators manage the platform: they issue and revoke licenses,
//! and super admins manage the admin accounts themselves. This crate
//! provides:
//!
//! - [`AdminAccount`] and [`Role`], the persisted account records;
//! - [`PasswordHasher`], argon2id hashing for account passwords;
//! - [`SessionCoordinator`], which mints, restores and revokes the
//!   permanent licenses behind admin sessions;
//! - [`AdminDirectory`], the operations an admin UI calls.
//!
//! # How it fits in the stack
//!
//! ```text
//! AdminDirectory ──→ SessionCoordinator ──→ SessionSink (the license authority)
//!       │                   │
//!       └───────────────────┴──→ RecordStore
//! ```
//!
//! The admin layer never names the license authority's concrete type; it
//! is handed an `Arc<dyn SessionSink>` at construction.

mod account;
mod config;
mod coordinator;
mod directory;
mod error;
mod password;

pub use account::{AdminAccount, Role};
pub use config::{AdminConfig, PasswordConfig};
pub use coordinator::SessionCoordinator;
pub use directory::AdminDirectory;
pub use error::AdminError;
pub use password::PasswordHasher;
