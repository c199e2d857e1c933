//! Core entity definitions for UserVault.
//!
//! This crate defines the data types shared across the UserVault
//! application: user records, roles, the raw form draft, and the versioned
//! envelope the collection is persisted in.

mod draft;
mod role;
mod schema;
mod user;

pub use draft::*;
pub use role::*;
pub use schema::*;
pub use user::*;
