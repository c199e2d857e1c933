//! Persisted collection envelope.

use serde::{Deserialize, Serialize};

use crate::UserRecord;

/// Storage key the user collection is persisted under.
///
/// The key carries a version suffix so a future layout change can write to a
/// fresh key instead of colliding with data from an older build.
pub const USERS_STORAGE_KEY: &str = "uservault_users_v1";

/// Schema version written into the envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// The envelope serialized under [`USERS_STORAGE_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCollection {
    /// Schema version tag, for future migration.
    pub schema_version: u32,
    /// The user records, in insertion order.
    pub records: Vec<UserRecord>,
}

impl StoredCollection {
    /// Wraps records in a current-version envelope.
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            records,
        }
    }
}
