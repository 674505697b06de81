use crate::{Character, Page};

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    pub term: String,
    pub page: Page,
    pub characters: Vec<Character>,
    pub total_count: Option<u64>,
    pub is_loading: bool,
    pub is_initializing: bool,
    pub can_load_more: bool,
    pub last_failure: Option<String>,
}

impl SearchViewModel {
    /// "Showing N results of M"; an unknown total reads as 0.
    pub fn results_summary(&self) -> String {
        format!(
            "Showing {} results of {}",
            self.characters.len(),
            self.total_count.unwrap_or(0)
        )
    }
}
