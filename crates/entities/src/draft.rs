//! Raw form-field values, as submitted by the form collaborator.

use crate::Role;

/// Field values from one form submission.
///
/// Values are carried as entered; trimming and interpretation happen during
/// validation in the record store.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    /// Full name field.
    pub full_name: String,
    /// Email field.
    pub email: String,
    /// Selected role, `None` when nothing was selected.
    pub role: Option<Role>,
    /// Phone field. Optional by the validation rules.
    pub phone: String,
    /// Password-like field. Blank on edit means "keep the current secret".
    pub secret: String,
    /// Confirmation entry for the secret.
    pub secret_confirmation: String,
}

impl UserDraft {
    /// Creates a draft with the required identity fields filled in.
    pub fn new(full_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            role: Some(role),
            ..Self::default()
        }
    }

    /// Sets the phone field.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the secret and its confirmation to the same value.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.secret_confirmation.clone_from(&secret);
        self.secret = secret;
        self
    }

    /// Sets the confirmation entry on its own.
    pub fn with_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.secret_confirmation = confirmation.into();
        self
    }
}
