use catalog_logging::catalog_debug;

use crate::{AppState, Effect, FetchPolicy, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => match state.start() {
            Some(key) => vec![Effect::FetchPage {
                key,
                policy: FetchPolicy::CacheFirst,
            }],
            None => Vec::new(),
        },
        Msg::SearchSubmitted(term) => {
            if !state.should_replace_for(&term) {
                catalog_debug!("search {:?} unchanged; nothing to do", term);
                return (state, Vec::new());
            }
            // Re-submitting an active filter really re-requests the page.
            let policy = if term == state.term() {
                FetchPolicy::Refresh
            } else {
                FetchPolicy::CacheFirst
            };
            let key = state.reset_search(term);
            vec![Effect::FetchPage { key, policy }]
        }
        Msg::LoadMoreClicked => match state.advance_page() {
            Some(key) => vec![Effect::FetchPage {
                key,
                policy: FetchPolicy::CacheFirst,
            }],
            None => Vec::new(),
        },
        Msg::PageLoaded { key, page } => {
            state.apply_page(&key, page);
            Vec::new()
        }
        Msg::PageFailed { key, failure } => {
            state.apply_failure(&key, failure);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
