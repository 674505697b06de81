use std::fmt;

use serde::Deserialize;

pub type PageNumber = u32;

/// One `(search term, page)` request against the people endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub term: String,
    pub page: PageNumber,
}

impl PageRequest {
    pub fn new(term: impl Into<String>, page: PageNumber) -> Self {
        Self {
            term: term.into(),
            page,
        }
    }

    /// `None` when the request is the unfiltered listing.
    pub fn search(&self) -> Option<&str> {
        if self.term.is_empty() {
            None
        } else {
            Some(&self.term)
        }
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.search() {
            Some(term) => write!(f, "people page {} search {:?}", self.page, term),
            None => write!(f, "people page {}", self.page),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    CacheFirst,
    Refresh,
}

/// A person as served by the catalog. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub birth_year: String,
    pub eye_color: String,
    pub gender: String,
    pub hair_color: String,
    pub height: String,
    pub mass: String,
    pub skin_color: String,
    pub homeworld: String,
    pub films: Vec<String>,
    pub species: Vec<String>,
    pub starships: Vec<String>,
    pub vehicles: Vec<String>,
    pub url: String,
    pub created: String,
    pub edited: String,
}

/// Paginated response body of the people endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PeoplePage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageFetched {
        request: PageRequest,
        page: PeoplePage,
        from_cache: bool,
    },
    PageFailed {
        request: PageRequest,
        error: FetchError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Transient failures are worth re-attempting on the next user command.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self.kind,
            FailureKind::InvalidUrl | FailureKind::EngineUnavailable
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Network,
    EngineUnavailable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::EngineUnavailable => write!(f, "engine unavailable"),
        }
    }
}
