//! Database module: ownership-scoped storage for favorites and list entries.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `actor.rs`: the `DbActor` owning the pool, and its cloneable handle

pub mod actor;
pub mod models;
pub mod schema;

mod patch_impl;

pub use actor::{DbActorHandle, ListFilter, spawn};
pub use models::{DbFavorite, DbListEntry};
pub use schema::SQLITE_INIT;
