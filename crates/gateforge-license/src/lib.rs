//! License layer for Gateforge.
//!
//! This crate owns the answer to "who is allowed in right now":
//!
//! 1. **Licenses**: the persisted credential records ([`License`],
//!    [`LicenseKey`], [`GameId`]) and how new keys are generated
//!    ([`generate_license_key`], [`unique_license_key`]).
//! 2. **The session**: the single current license, owned by the
//!    [`LicenseAuthority`] and observed through [`SessionView`] handles.
//! 3. **Access**: whether the current session may open a given game
//!    ([`has_game_access`] and friends in [`access`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Admin Directory (above)  ← adopts admin licenses through SessionSink
//!     ↕
//! License Authority (this crate)  ← owns the current session
//!     ↕
//! Record Store (below)  ← generated_licenses collection
//! ```

pub mod access;
mod authority;
mod config;
mod error;
mod keygen;
mod session;
mod types;

pub use access::{accessible_games, describe_game_access, has_game_access};
pub use authority::LicenseAuthority;
pub use config::LicenseConfig;
pub use error::LicenseError;
pub use keygen::{
    KEY_ALPHABET, KEY_SEGMENT_LEN, KEY_SEGMENTS, generate_license_key,
    unique_license_key, unique_license_key_with,
};
pub use session::{SessionSink, SessionView};
pub use types::{GameId, License, LicenseKey, SYSTEM_ISSUER};
