//! View projection and UI command handling for UserVault.
//!
//! The projection half turns "record collection + search query + sort key"
//! into the ordered list to display, as a pure function. The session half is
//! the command surface the UI layer drives: submit, delete with an explicit
//! confirmation step, search and sort changes, and view-state assembly.

mod projection;
mod session;

pub use projection::*;
pub use session::*;
