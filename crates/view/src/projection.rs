//! Pure projection from the record collection to the display list.

use entities::UserRecord;

/// Display ordering for the user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Full name ascending.
    NameAsc,
    /// Full name descending.
    NameDesc,
}

impl SortKey {
    /// Converts the sort key to a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
        }
    }

    /// Parses a sort key from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "name_asc" => Some(Self::NameAsc),
            "name_desc" => Some(Self::NameDesc),
            _ => None,
        }
    }

    /// Returns all sort keys.
    pub fn all() -> &'static [SortKey] {
        &[Self::Newest, Self::Oldest, Self::NameAsc, Self::NameDesc]
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filters and orders `records` for display.
///
/// A non-empty query (after trimming and lowercasing) keeps only records
/// whose searchable text contains it. The sort is stable with no secondary
/// key, so ties keep their input order. The input is never mutated; equal
/// inputs produce equal output.
pub fn project(records: &[UserRecord], query: &str, sort: SortKey) -> Vec<UserRecord> {
    let query = query.trim().to_lowercase();

    let mut shown: Vec<UserRecord> = records
        .iter()
        .filter(|r| query.is_empty() || haystack(r).contains(&query))
        .cloned()
        .collect();

    match sort {
        SortKey::Newest => shown.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => shown.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::NameAsc => shown.sort_by(|a, b| name_key(a).cmp(&name_key(b))),
        SortKey::NameDesc => shown.sort_by(|a, b| name_key(b).cmp(&name_key(a))),
    }

    shown
}

/// Lowercased searchable text for one record: name, email, role, phone.
fn haystack(record: &UserRecord) -> String {
    format!(
        "{} {} {} {}",
        record.full_name,
        record.email,
        record.role.as_str(),
        record.phone.as_deref().unwrap_or("")
    )
    .to_lowercase()
}

/// Case-folded ordering key for name sorts.
fn name_key(record: &UserRecord) -> String {
    record.full_name.to_lowercase()
}
