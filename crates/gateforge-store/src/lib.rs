//! Keyed record store for Gateforge.
//!
//! Everything the authority layers persist goes through this crate:
//!
//! - **Records** ([`Record`], [`RecordKind`]): the contract a persisted
//!   type fulfils: which collection it lives in, which field is its
//!   unique key, and how the store stamps ids and timestamps on it.
//! - **Stores** ([`RecordStore`] trait, [`MemoryStore`], [`FileStore`]):
//!   asynchronous get/create/update/delete, each operation atomic on its
//!   own. There is no multi-record transaction; callers tolerate partial
//!   completion (e.g. create-then-reload).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how a [`FileStore`]
//!   turns its tables into bytes on disk.
//!
//! # How it fits in the stack
//!
//! ```text
//! Admin Directory / Session Coordinator (above)
//!     ↕
//! License Authority  ← reads and stamps licenses
//!     ↕
//! Record Store (this crate)  ← admin_accounts, generated_licenses
//! ```

mod codec;
mod error;
mod file;
mod memory;
mod record;
mod store;
mod tables;

pub use codec::{Codec, JsonCodec};
pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{Record, RecordId, RecordKind};
pub use store::RecordStore;
