use catalog_logging::{catalog_debug, catalog_error, catalog_warn};

use crate::view_model::SearchViewModel;
use crate::{Character, FailureClass, FetchFailure, Page, PageKey, ResultPage};

/// How a resolved page is merged into the accumulated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFetch {
    key: PageKey,
    mode: MergeMode,
}

/// The query aggregate. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    term: String,
    cursor: Page,
    accumulated: Vec<Character>,
    total_count: Option<u64>,
    in_flight: Option<PendingFetch>,
    replace_next: bool,
    started: bool,
    is_initial: bool,
    last_failure: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            term: String::new(),
            cursor: 1,
            accumulated: Vec::new(),
            total_count: None,
            in_flight: None,
            replace_next: true,
            started: false,
            is_initial: true,
            last_failure: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SearchViewModel {
        SearchViewModel {
            term: self.term.clone(),
            page: self.cursor,
            characters: self.accumulated.clone(),
            total_count: self.total_count,
            is_loading: self.in_flight.is_some(),
            is_initializing: self.is_initial,
            can_load_more: self
                .total_count
                .is_some_and(|total| (self.accumulated.len() as u64) < total),
            last_failure: self.last_failure.clone(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn cursor(&self) -> Page {
        self.cursor
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The key whose result would currently be applied, if any.
    pub fn in_flight_key(&self) -> Option<&PageKey> {
        self.in_flight.as_ref().map(|pending| &pending.key)
    }

    /// Returns whether the state changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Issues the initial unfiltered fetch, once per session.
    pub(crate) fn start(&mut self) -> Option<PageKey> {
        if self.started {
            return None;
        }
        let key = PageKey::new(self.term.clone(), self.cursor);
        self.begin_fetch(key.clone(), MergeMode::Replace);
        Some(key)
    }

    /// Replace whenever the term differs, or the old term was a non-empty filter.
    pub(crate) fn should_replace_for(&self, term: &str) -> bool {
        term != self.term || !self.term.is_empty()
    }

    pub(crate) fn reset_search(&mut self, term: String) -> PageKey {
        self.term = term;
        self.cursor = 1;
        self.replace_next = true;
        let key = PageKey::new(self.term.clone(), self.cursor);
        self.begin_fetch(key.clone(), MergeMode::Replace);
        key
    }

    /// Moves the cursor forward, or re-requests the current page if a reset is
    /// still outstanding. Returns `None` while a fetch is in flight.
    pub(crate) fn advance_page(&mut self) -> Option<PageKey> {
        if let Some(pending) = &self.in_flight {
            catalog_debug!("load more ignored; {} still in flight", pending.key);
            return None;
        }
        let mode = if self.replace_next {
            MergeMode::Replace
        } else {
            self.cursor = self.cursor.saturating_add(1);
            MergeMode::Append
        };
        let key = PageKey::new(self.term.clone(), self.cursor);
        self.begin_fetch(key.clone(), mode);
        Some(key)
    }

    fn begin_fetch(&mut self, key: PageKey, mode: MergeMode) {
        catalog_debug!("fetch {} mode={:?}", key, mode);
        self.started = true;
        self.in_flight = Some(PendingFetch { key, mode });
        self.mark_dirty();
    }

    /// Takes the pending fetch if `key` is the current one.
    fn settle(&mut self, key: &PageKey) -> Option<PendingFetch> {
        match &self.in_flight {
            Some(pending) if pending.key == *key => {
                self.is_initial = false;
                self.mark_dirty();
                self.in_flight.take()
            }
            _ => {
                catalog_debug!("discarding result for superseded key {}", key);
                None
            }
        }
    }

    pub(crate) fn apply_page(&mut self, key: &PageKey, page: ResultPage) -> bool {
        let Some(pending) = self.settle(key) else {
            return false;
        };

        match pending.mode {
            MergeMode::Replace => self.accumulated = page.records,
            MergeMode::Append => self.accumulated.extend(page.records),
        }
        self.replace_next = false;
        self.total_count = Some(page.total_count);
        self.last_failure = None;

        let total = usize::try_from(page.total_count).unwrap_or(usize::MAX);
        if self.accumulated.len() > total {
            catalog_warn!(
                "catalog delivered {} records for a total of {}; truncating",
                self.accumulated.len(),
                total
            );
            self.accumulated.truncate(total);
        }
        true
    }

    /// Keeps the last known-good records; settles the loading flags.
    pub(crate) fn apply_failure(&mut self, key: &PageKey, failure: FetchFailure) -> bool {
        let Some(pending) = self.settle(key) else {
            return false;
        };

        match failure.class {
            FailureClass::Transient => {
                catalog_warn!("fetch {} failed: {}", key, failure.message)
            }
            FailureClass::Misuse => {
                catalog_error!("fetch {} could not be issued: {}", key, failure.message)
            }
        }

        if pending.mode == MergeMode::Append {
            // Retry the same page on the next load-more.
            self.cursor = self.cursor.saturating_sub(1).max(1);
        }
        self.last_failure = Some(failure.message);
        true
    }
}
