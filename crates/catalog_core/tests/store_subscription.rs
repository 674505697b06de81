use std::sync::{Arc, Mutex};

use catalog_core::{
    Character, Effect, Gender, Msg, PageKey, QueryStore, ResultPage, SearchViewModel,
};

fn recorder(store: &mut QueryStore) -> (Arc<Mutex<Vec<SearchViewModel>>>, u64) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = store.subscribe(move |view| sink.lock().unwrap().push(view.clone()));
    (seen, id)
}

fn one_page(total: u64) -> ResultPage {
    ResultPage {
        records: vec![Character::named("id:1", "Luke Skywalker", Gender::Male)],
        total_count: total,
        next: None,
        previous: None,
    }
}

#[test]
fn subscribers_see_each_state_change() {
    catalog_logging::initialize_for_tests();
    let mut store = QueryStore::new();
    let (seen, _) = recorder(&mut store);

    let effects = store.dispatch(Msg::Started);
    assert_eq!(effects.len(), 1);
    store.dispatch(Msg::PageLoaded {
        key: PageKey::new("", 1),
        page: one_page(82),
    });

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_loading && seen[0].is_initializing);
    assert!(!seen[1].is_loading && !seen[1].is_initializing);
    assert_eq!(seen[1].results_summary(), "Showing 1 results of 82");
}

#[test]
fn unchanged_state_is_not_broadcast() {
    let mut store = QueryStore::new();
    let (seen, _) = recorder(&mut store);

    store.dispatch(Msg::Tick);
    store.dispatch(Msg::SearchSubmitted(String::new()));
    store.dispatch(Msg::PageLoaded {
        key: PageKey::new("nobody", 3),
        page: one_page(1),
    });

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let mut store = QueryStore::new();
    let (seen, id) = recorder(&mut store);

    store.dispatch(Msg::SearchSubmitted("leia".into()));
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.dispatch(Msg::SearchSubmitted("han".into()));

    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn dispatch_returns_effects_and_snapshot_matches_state() {
    let mut store = QueryStore::new();
    let effects = store.dispatch(Msg::SearchSubmitted("r2".into()));

    assert!(matches!(
        effects.as_slice(),
        [Effect::FetchPage { key, .. }] if *key == PageKey::new("r2", 1)
    ));
    assert_eq!(store.snapshot(), store.state().view());
    assert_eq!(store.snapshot().term, "r2");
}
