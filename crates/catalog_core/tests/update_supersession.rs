use catalog_core::{
    update, AppState, Character, Effect, FetchFailure, Gender, Msg, PageKey, ResultPage,
};
use pretty_assertions::assert_eq;

fn page_named(names: &[&str], total: u64) -> ResultPage {
    ResultPage {
        records: names
            .iter()
            .map(|name| Character::named(format!("id:{name}"), *name, Gender::Unknown))
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

fn names(state: &AppState) -> Vec<String> {
    state.view().characters.into_iter().map(|c| c.name).collect()
}

#[test]
fn superseded_result_is_never_applied() {
    catalog_logging::initialize_for_tests();
    let (state, effects) = update(AppState::new(), Msg::SearchSubmitted("han".into()));
    let stale = fetched_key(&effects);
    let (state, effects) = update(state, Msg::SearchSubmitted("chewie".into()));
    let current = fetched_key(&effects);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            key: current,
            page: page_named(&["Chewbacca"], 1),
        },
    );
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            key: stale,
            page: page_named(&["Han Solo"], 1),
        },
    );

    assert_eq!(names(&state), vec!["Chewbacca"]);
    assert_eq!(state.view().total_count, Some(1));
}

#[test]
fn stale_result_arriving_first_leaves_new_fetch_pending() {
    catalog_logging::initialize_for_tests();
    let (state, effects) = update(AppState::new(), Msg::Started);
    let stale = fetched_key(&effects);
    let (mut state, effects) = update(state, Msg::SearchSubmitted("yoda".into()));
    let current = fetched_key(&effects);
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::PageLoaded {
            key: stale,
            page: page_named(&["Luke", "C-3PO"], 82),
        },
    );
    assert!(state.view().characters.is_empty());
    assert!(state.view().is_loading);
    assert!(state.view().is_initializing);
    assert_eq!(state.in_flight_key(), Some(&current));
    assert!(!state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            key: current,
            page: page_named(&["Yoda"], 1),
        },
    );
    assert_eq!(names(&state), vec!["Yoda"]);
}

#[test]
fn stale_failure_does_not_settle_current_fetch() {
    catalog_logging::initialize_for_tests();
    let (state, effects) = update(AppState::new(), Msg::SearchSubmitted("owen".into()));
    let stale = fetched_key(&effects);
    let (state, _) = update(state, Msg::SearchSubmitted("beru".into()));

    let (state, _) = update(
        state,
        Msg::PageFailed {
            key: stale,
            failure: FetchFailure::transient("connection reset"),
        },
    );

    let view = state.view();
    assert!(view.is_loading);
    assert_eq!(view.last_failure, None);
}

#[test]
fn stale_search_pages_never_append_to_new_search() {
    catalog_logging::initialize_for_tests();
    let (state, effects) = update(AppState::new(), Msg::SearchSubmitted("a".into()));
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            key: fetched_key(&effects),
            page: page_named(&["a1", "a2"], 4),
        },
    );
    let (state, effects) = update(state, Msg::LoadMoreClicked);
    let stale_page_two = fetched_key(&effects);

    let (state, effects) = update(state, Msg::SearchSubmitted("b".into()));
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            key: stale_page_two,
            page: page_named(&["a3", "a4"], 4),
        },
    );
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            key: fetched_key(&effects),
            page: page_named(&["b1"], 1),
        },
    );

    assert_eq!(names(&state), vec!["b1"]);
}
