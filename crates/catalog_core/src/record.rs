use std::fmt;

/// Stable identity of a catalog entry (the resource URL reported by the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterId(pub String);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
    NotApplicable,
    Other(String),
}

impl Gender {
    /// Maps the catalog's free-form gender string.
    pub fn from_catalog(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            "unknown" | "" => Gender::Unknown,
            "n/a" => Gender::NotApplicable,
            other => Gender::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
            Gender::NotApplicable => "n/a",
            Gender::Other(raw) => raw,
        }
    }
}

/// One catalog entry. The state machine only relies on `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub gender: Gender,
    pub birth_year: String,
    pub height: String,
    pub mass: String,
    pub homeworld: String,
}

impl Character {
    /// Minimal record, mostly useful for tests and fixtures.
    pub fn named(id: impl Into<String>, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: CharacterId(id.into()),
            name: name.into(),
            gender,
            birth_year: "unknown".to_string(),
            height: "unknown".to_string(),
            mass: "unknown".to_string(),
            homeworld: String::new(),
        }
    }
}

/// 1-based page index into the remote catalog.
pub type Page = u32;

/// Fetch key: one `(search term, page)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub term: String,
    pub page: Page,
}

impl PageKey {
    pub fn new(term: impl Into<String>, page: Page) -> Self {
        Self {
            term: term.into(),
            page,
        }
    }

    /// The search filter to send, `None` for the unfiltered listing.
    pub fn search(&self) -> Option<&str> {
        if self.term.is_empty() {
            None
        } else {
            Some(&self.term)
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(term={:?}, page={})", self.term, self.page)
    }
}

/// One page of results for a [`PageKey`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultPage {
    pub records: Vec<Character>,
    pub total_count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}
