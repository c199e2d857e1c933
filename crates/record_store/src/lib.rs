//! User record storage for UserVault.
//!
//! This crate owns the durable collection of user records. It provides the
//! storage backend abstraction (a flat key-value store of string payloads,
//! the analogue of the browser storage the original tool persisted into),
//! load/persist with a versioned envelope, field validation, and
//! uniqueness-checked create/update/delete.

mod backend;
mod error;
mod store;
mod validate;

pub use backend::*;
pub use error::*;
pub use store::*;
pub use validate::*;
