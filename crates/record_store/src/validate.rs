//! Field validation for user drafts.
//!
//! Every field is checked independently and every violation is reported, so
//! the form can mark all invalid fields in one pass rather than stopping at
//! the first failure.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use entities::{Role, UserDraft};
use regex::Regex;

/// Simple address shape: local part, "@", domain, ".", TLD of at least two
/// characters. Matches what the form accepts, not full RFC 5322.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("regex pattern is valid"));

/// Minimum number of digit characters a phone entry must contain.
const PHONE_MIN_DIGITS: usize = 9;

/// Minimum secret length, in characters.
const SECRET_MIN_CHARS: usize = 8;

/// Whether a draft is creating a new record or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// All fields are required, including the secret.
    Create,
    /// A blank secret means "keep the current one" and skips secret checks.
    Edit,
}

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    /// The full name entry.
    FullName,
    /// The email entry.
    Email,
    /// The role selection.
    Role,
    /// The phone entry.
    Phone,
    /// The password-like entry.
    Secret,
    /// The confirmation entry for the secret.
    SecretConfirmation,
}

impl Field {
    /// Returns the form field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Role => "role",
            Self::Phone => "phone",
            Self::Secret => "password",
            Self::SecretConfirmation => "confirm_password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The field is empty but mandatory.
    Required,
    /// The value does not match the expected shape.
    InvalidFormat,
    /// The value is shorter than the rule allows.
    TooShort,
    /// The value must equal another field's value and does not.
    Mismatch,
}

impl Violation {
    /// Human-readable message for this violation on the given field.
    pub fn message(&self, field: Field) -> &'static str {
        match (field, self) {
            (Field::FullName, Self::Required) => "Full name is required.",
            (Field::Email, Self::Required) => "Email is required.",
            (Field::Email, Self::InvalidFormat) => "Enter a valid email address.",
            (Field::Role, Self::Required) => "Role is required.",
            (Field::Phone, Self::TooShort) => "Phone number looks too short.",
            (Field::Secret, Self::Required) => "Password is required.",
            (Field::Secret, Self::TooShort) => "Password must be at least 8 characters.",
            (Field::SecretConfirmation, Self::Required) => "Confirm your password.",
            (Field::SecretConfirmation, Self::Mismatch) => "Passwords do not match.",
            _ => "Invalid value.",
        }
    }
}

/// All violations for one submitted draft, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailed {
    errors: BTreeMap<Field, Violation>,
}

impl ValidationFailed {
    fn insert(&mut self, field: Field, violation: Violation) {
        self.errors.insert(field, violation);
    }

    /// Returns true when no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The violation recorded for `field`, if any.
    pub fn get(&self, field: Field) -> Option<Violation> {
        self.errors.get(&field).copied()
    }

    /// Iterates over failing fields in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Violation)> + '_ {
        self.errors.iter().map(|(field, violation)| (*field, *violation))
    }
}

impl fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.keys().map(Field::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationFailed {}

/// Validated, trimmed field values ready to be stored.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedDraft {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    /// `None` means "keep the current secret" (edit with a blank entry).
    pub secret: Option<String>,
}

/// Checks every field of `draft` independently and reports all violations.
pub fn validate(draft: &UserDraft, mode: ValidationMode) -> Result<(), ValidationFailed> {
    normalize(draft, mode).map(|_| ())
}

/// Runs the field checks and, when they all pass, produces the trimmed
/// values a record is written from.
pub(crate) fn normalize(
    draft: &UserDraft,
    mode: ValidationMode,
) -> Result<NormalizedDraft, ValidationFailed> {
    let mut failed = ValidationFailed::default();

    let full_name = draft.full_name.trim();
    if full_name.is_empty() {
        failed.insert(Field::FullName, Violation::Required);
    }

    let email = draft.email.trim();
    if email.is_empty() {
        failed.insert(Field::Email, Violation::Required);
    } else if !EMAIL_RE.is_match(email) {
        failed.insert(Field::Email, Violation::InvalidFormat);
    }

    if draft.role.is_none() {
        failed.insert(Field::Role, Violation::Required);
    }

    let phone = draft.phone.trim();
    if !phone.is_empty() && digit_count(phone) < PHONE_MIN_DIGITS {
        failed.insert(Field::Phone, Violation::TooShort);
    }

    let check_secret = match mode {
        ValidationMode::Create => true,
        ValidationMode::Edit => !draft.secret.is_empty(),
    };
    if check_secret {
        if draft.secret.is_empty() {
            failed.insert(Field::Secret, Violation::Required);
        } else if draft.secret.chars().count() < SECRET_MIN_CHARS {
            failed.insert(Field::Secret, Violation::TooShort);
        }
        if draft.secret_confirmation.is_empty() {
            failed.insert(Field::SecretConfirmation, Violation::Required);
        } else if draft.secret_confirmation != draft.secret {
            failed.insert(Field::SecretConfirmation, Violation::Mismatch);
        }
    }

    match (failed.is_empty(), draft.role) {
        (true, Some(role)) => Ok(NormalizedDraft {
            full_name: full_name.to_string(),
            email: email.to_string(),
            role,
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            secret: check_secret.then(|| draft.secret.clone()),
        }),
        _ => Err(failed),
    }
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> UserDraft {
        UserDraft::new("Ann Lee", "ann@x.com", Role::Admin).with_secret("password123")
    }

    #[test]
    fn test_valid_create_draft_passes() {
        assert!(validate(&valid_draft(), ValidationMode::Create).is_ok());
    }

    #[test]
    fn test_empty_draft_reports_every_failing_field() {
        let failed = validate(&UserDraft::default(), ValidationMode::Create).unwrap_err();

        assert_eq!(failed.len(), 5);
        assert_eq!(failed.get(Field::FullName), Some(Violation::Required));
        assert_eq!(failed.get(Field::Email), Some(Violation::Required));
        assert_eq!(failed.get(Field::Role), Some(Violation::Required));
        assert_eq!(failed.get(Field::Secret), Some(Violation::Required));
        assert_eq!(
            failed.get(Field::SecretConfirmation),
            Some(Violation::Required)
        );
    }

    #[test]
    fn test_whitespace_only_name_is_required() {
        let mut draft = valid_draft();
        draft.full_name = "   ".to_string();

        let failed = validate(&draft, ValidationMode::Create).unwrap_err();
        assert_eq!(failed.get(Field::FullName), Some(Violation::Required));
    }

    #[test]
    fn test_email_format() {
        for bad in ["ann", "ann@x", "ann@x.c", "ann @x.com", "@x.com"] {
            let mut draft = valid_draft();
            draft.email = bad.to_string();
            let failed = validate(&draft, ValidationMode::Create).unwrap_err();
            assert_eq!(
                failed.get(Field::Email),
                Some(Violation::InvalidFormat),
                "expected {bad:?} to be rejected"
            );
        }

        let mut draft = valid_draft();
        draft.email = "ann.lee+tag@mail.example.co".to_string();
        assert!(validate(&draft, ValidationMode::Create).is_ok());
    }

    #[test]
    fn test_phone_needs_nine_digits() {
        let draft = valid_draft().with_phone("+1 (234) 5678");
        let failed = validate(&draft, ValidationMode::Create).unwrap_err();
        assert_eq!(failed.get(Field::Phone), Some(Violation::TooShort));

        // Nine digits spread through punctuation is enough.
        let draft = valid_draft().with_phone("+1 (234) 567-89");
        assert!(validate(&draft, ValidationMode::Create).is_ok());

        // Blank phone is fine: the field is optional.
        let draft = valid_draft().with_phone("  ");
        assert!(validate(&draft, ValidationMode::Create).is_ok());
    }

    #[test]
    fn test_short_secret() {
        let draft = valid_draft().with_secret("seven77");
        let failed = validate(&draft, ValidationMode::Create).unwrap_err();
        assert_eq!(failed.get(Field::Secret), Some(Violation::TooShort));
    }

    #[test]
    fn test_confirmation_must_match() {
        let draft = valid_draft().with_confirmation("different123");
        let failed = validate(&draft, ValidationMode::Create).unwrap_err();
        assert_eq!(
            failed.get(Field::SecretConfirmation),
            Some(Violation::Mismatch)
        );

        let draft = valid_draft().with_confirmation("");
        let failed = validate(&draft, ValidationMode::Create).unwrap_err();
        assert_eq!(
            failed.get(Field::SecretConfirmation),
            Some(Violation::Required)
        );
    }

    #[test]
    fn test_edit_mode_skips_blank_secret() {
        let mut draft = valid_draft();
        draft.secret = String::new();
        draft.secret_confirmation = String::new();

        assert!(validate(&draft, ValidationMode::Edit).is_ok());
    }

    #[test]
    fn test_edit_mode_checks_supplied_secret() {
        let mut draft = valid_draft().with_secret("short");
        draft.secret_confirmation = "short".to_string();

        let failed = validate(&draft, ValidationMode::Edit).unwrap_err();
        assert_eq!(failed.get(Field::Secret), Some(Violation::TooShort));
    }

    #[test]
    fn test_normalize_trims_and_blanks_phone() {
        let mut draft = valid_draft().with_phone("  ");
        draft.full_name = "  Ann Lee  ".to_string();

        let fields = normalize(&draft, ValidationMode::Create).unwrap();
        assert_eq!(fields.full_name, "Ann Lee");
        assert_eq!(fields.phone, None);
        assert_eq!(fields.secret.as_deref(), Some("password123"));
    }
}
