//! Flat-file object store engine.
//!
//! [`FileStore`] keeps live records in memory, indexed by composite key
//! `TypeName.id`, and persists the whole index to a single JSON file.
//! The engine never inspects records beyond the `stays-models` contract:
//! enough to compute keys and round-trip through field-maps.
//!
//! # Consistency contract
//!
//! - `insert` mutates memory only; nothing reaches disk until `save`.
//! - `save` replaces the file wholesale (temp file + rename).
//! - `reload` replaces the index wholesale with the file's contents;
//!   a missing file is a no-op, a malformed file is a hard error, and a
//!   failed reload never leaves partial state behind.
//!
//! # Concurrency
//!
//! Single-threaded and synchronous by design. The store does no internal
//! locking; hosts that share a store across threads must serialize access
//! themselves.
//!
//! ```no_run
//! use stays_models::User;
//! use stays_store::FileStore;
//!
//! fn example() -> stays_store::StoreResult<()> {
//!     let mut store = FileStore::new("file.json");
//!     store.reload()?;
//!
//!     let mut user = User::new();
//!     user.email = "lin@example.org".to_string();
//!     store.insert(user);
//!
//!     store.save()
//! }
//! ```

pub mod error;
pub mod file_store;

pub use error::{StoreError, StoreResult};
pub use file_store::{FileStore, DEFAULT_STORE_FILE};
