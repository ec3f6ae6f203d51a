//! Stored-record contract for the stays object store.
//!
//! This crate defines what it means to be storable: a record carries a
//! [`RecordMeta`] block (unique `id` plus `created_at`/`updated_at`
//! timestamps), converts to and from a flat [`FieldMap`], and names itself
//! with a compile-time type tag. The engine crate never inspects records
//! beyond this contract.
//!
//! # Key Types
//!
//! - [`Model`] — static side of the contract, implemented per record type
//! - [`Record`] — object-safe side, what the store holds as `Box<dyn Record>`
//! - [`RecordMeta`] — shared identity/timestamp block
//! - [`TypeRegistry`] — fixed tag-to-constructor table used during reload
//!
//! # Record Types
//!
//! [`User`], [`State`], [`City`], [`Amenity`], [`Place`], [`Review`] — the
//! lodging-domain family the registry covers.

pub mod error;
pub mod meta;
pub mod models;
pub mod record;
pub mod registry;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{RecordError, RecordResult};
pub use meta::RecordMeta;
pub use models::{Amenity, City, Place, Review, State, User};
pub use record::{from_fields, FieldMap, Model, Record, TYPE_TAG};
pub use registry::{Factory, TypeRegistry};
