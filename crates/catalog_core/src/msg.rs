use crate::{PageKey, ResultPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Session bootstrap; issues the initial unfiltered fetch.
    Started,
    /// User submitted a search term (may be empty).
    SearchSubmitted(String),
    /// User asked for the next page of the current search.
    LoadMoreClicked,
    /// Remote catalog answered the fetch for `key`.
    PageLoaded { key: PageKey, page: ResultPage },
    /// Remote catalog failed the fetch for `key`.
    PageFailed {
        key: PageKey,
        failure: FetchFailure,
    },
    /// UI/render tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Network or HTTP failure; the next command naturally retries.
    Transient,
    /// The fetch could not be issued at all (no engine available).
    Misuse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub class: FailureClass,
    pub message: String,
}

impl FetchFailure {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Transient,
            message: message.into(),
        }
    }

    pub fn misuse(message: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Misuse,
            message: message.into(),
        }
    }
}
