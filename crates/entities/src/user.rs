//! User record definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

/// A user entry in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier. Generated at creation, never changes.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// Email address. Case-insensitively unique across the collection.
    pub email: String,
    /// Access role.
    pub role: Role,
    /// Phone number, if one was provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Opaque password-like credential, stored as given.
    pub secret: String,
    /// When this record was created. Never changes after insertion.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When this record was last edited.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Creates a new record with a fresh id and creation timestamp.
    ///
    /// The id is a v7 UUID: a monotonically non-decreasing time component
    /// plus randomness, so collisions are negligible without any active
    /// detection.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            full_name: full_name.into(),
            email: email.into(),
            role,
            phone: None,
            secret: secret.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Returns true when this record's email equals `email`, ignoring case.
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}
