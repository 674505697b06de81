use std::sync::Once;

use catalog_core::{
    update, AppState, Character, Effect, FetchPolicy, Gender, Msg, PageKey, ResultPage,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

fn page_of(prefix: &str, count: usize, total: u64) -> ResultPage {
    ResultPage {
        records: (1..=count)
            .map(|i| {
                Character::named(
                    format!("https://swapi.dev/api/people/{prefix}{i}/"),
                    format!("{prefix} {i}"),
                    Gender::Unknown,
                )
            })
            .collect(),
        total_count: total,
        next: None,
        previous: None,
    }
}

fn fetched_key(effects: &[Effect]) -> PageKey {
    match effects {
        [Effect::FetchPage { key, .. }] => key.clone(),
        other => panic!("expected a single fetch, got {other:?}"),
    }
}

fn search(state: AppState, term: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::SearchSubmitted(term.to_string()))
}

fn resolve(state: AppState, effects: &[Effect], page: ResultPage) -> AppState {
    let key = fetched_key(effects);
    let (state, effects) = update(state, Msg::PageLoaded { key, page });
    assert!(effects.is_empty());
    state
}

fn names(state: &AppState) -> Vec<String> {
    state
        .view()
        .characters
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn started_issues_unfiltered_first_page_once() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::Started);

    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            key: PageKey::new("", 1),
            policy: FetchPolicy::CacheFirst,
        }]
    );
    let view = state.view();
    assert!(view.is_loading);
    assert!(view.is_initializing);
    assert_eq!(view.total_count, None);
    assert!(state.consume_dirty());

    let (_state, effects) = update(state, Msg::Started);
    assert!(effects.is_empty());
}

#[test]
fn new_term_replaces_previous_results() {
    init_logging();
    let (state, effects) = search(AppState::new(), "luke");
    let state = resolve(state, &effects, page_of("luke", 3, 3));
    assert_eq!(names(&state).len(), 3);

    let (state, effects) = search(state, "leia");
    assert_eq!(fetched_key(&effects), PageKey::new("leia", 1));
    let state = resolve(state, &effects, page_of("leia", 2, 2));

    assert_eq!(names(&state), vec!["leia 1", "leia 2"]);
    assert_eq!(state.view().total_count, Some(2));
}

#[test]
fn changing_term_resets_cursor_to_first_page() {
    init_logging();
    let (state, effects) = search(AppState::new(), "a");
    let state = resolve(state, &effects, page_of("a", 10, 30));
    let (state, effects) = update(state, Msg::LoadMoreClicked);
    let state = resolve(state, &effects, page_of("a-2-", 10, 30));
    assert_eq!(state.cursor(), 2);

    let (state, effects) = search(state, "b");
    assert_eq!(state.cursor(), 1);
    assert_eq!(fetched_key(&effects), PageKey::new("b", 1));
}

#[test]
fn resubmitting_active_filter_refetches_and_replaces() {
    init_logging();
    let (state, effects) = search(AppState::new(), "sky");
    let state = resolve(state, &effects, page_of("sky", 3, 3));

    let (state, effects) = search(state, "sky");
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            key: PageKey::new("sky", 1),
            policy: FetchPolicy::Refresh,
        }]
    );
    let state = resolve(state, &effects, page_of("sky", 3, 3));

    assert_eq!(names(&state), vec!["sky 1", "sky 2", "sky 3"]);
}

#[test]
fn resubmitting_empty_term_is_noop() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);
    let mut state = resolve(state, &effects, page_of("all", 10, 82));
    assert!(state.consume_dirty());
    let before = state.clone();

    let (mut state, effects) = search(state, "");

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state, before);
}

#[test]
fn clearing_a_filter_returns_to_unfiltered_listing() {
    init_logging();
    let (state, effects) = search(AppState::new(), "r2");
    let state = resolve(state, &effects, page_of("r2", 1, 1));

    let (state, effects) = search(state, "");
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            key: PageKey::new("", 1),
            policy: FetchPolicy::CacheFirst,
        }]
    );
    let state = resolve(state, &effects, page_of("all", 10, 82));
    assert_eq!(state.view().characters.len(), 10);
    assert_eq!(state.view().term, "");
}

#[test]
fn initializing_stays_true_until_first_fetch_settles() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, _) = search(state, "a");
    let (state, effects) = search(state, "ab");
    assert!(state.view().is_initializing);

    let state = resolve(state, &effects, page_of("ab", 1, 1));
    let view = state.view();
    assert!(!view.is_initializing);
    assert!(!view.is_loading);

    let (state, _) = search(state, "abc");
    assert!(!state.view().is_initializing);
}
