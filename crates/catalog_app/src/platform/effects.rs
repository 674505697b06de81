use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use catalog_core::{
    Character, CharacterId, Effect, FetchFailure, FetchPolicy, Gender, Msg, PageKey, ResultPage,
};
use catalog_engine::{
    CachePolicy, EngineEvent, EngineEvents, EngineHandle, FetchError, PageRequest, PeoplePage,
    Person,
};
use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use super::app::AppEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Executes core effects on the engine and feeds engine events back as messages.
///
/// The forwarding thread only holds the engine's event side, so it ends as
/// soon as the engine stops.
pub struct EffectRunner {
    engine: EngineHandle,
    events: mpsc::Sender<AppEvent>,
    forwarder: JoinHandle<()>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, events: mpsc::Sender<AppEvent>) -> Self {
        let forwarder = spawn_event_loop(engine.events(), events.clone());
        Self {
            engine,
            events,
            forwarder,
        }
    }

    /// Stops the engine and waits for event forwarding to end.
    pub fn shutdown(self) {
        self.engine.shutdown();
        drop(self.engine);
        if self.forwarder.join().is_err() {
            catalog_warn!("engine event forwarding panicked");
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage { key, policy } => {
                    catalog_info!("FetchPage {} policy={:?}", key, policy);
                    let request = PageRequest::new(key.term.clone(), key.page);
                    if let Err(err) = self.engine.fetch(request, map_policy(policy)) {
                        // Settle the fetch so the UI does not wait forever.
                        let _ = self.events.send(AppEvent::Core(Msg::PageFailed {
                            key,
                            failure: map_failure(&err),
                        }));
                    }
                }
            }
        }
    }
}

fn spawn_event_loop(engine: EngineEvents, events: mpsc::Sender<AppEvent>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match engine.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                if events.send(AppEvent::Core(map_event(event))).is_err() {
                    catalog_debug!("event loop closed; engine forwarding stops");
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                catalog_debug!("engine stopped; engine forwarding stops");
                break;
            }
        }
    })
}

fn map_policy(policy: FetchPolicy) -> CachePolicy {
    match policy {
        FetchPolicy::CacheFirst => CachePolicy::CacheFirst,
        FetchPolicy::Refresh => CachePolicy::Refresh,
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PageFetched { request, page, .. } => Msg::PageLoaded {
            key: map_key(request),
            page: map_page(page),
        },
        EngineEvent::PageFailed { request, error } => Msg::PageFailed {
            key: map_key(request),
            failure: map_failure(&error),
        },
    }
}

fn map_key(request: PageRequest) -> PageKey {
    PageKey::new(request.term, request.page)
}

fn map_page(page: PeoplePage) -> ResultPage {
    ResultPage {
        records: page.results.into_iter().map(map_person).collect(),
        total_count: page.count,
        next: page.next,
        previous: page.previous,
    }
}

fn map_person(person: Person) -> Character {
    Character {
        id: CharacterId(person.url),
        gender: Gender::from_catalog(&person.gender),
        name: person.name,
        birth_year: person.birth_year,
        height: person.height,
        mass: person.mass,
        homeworld: person.homeworld,
    }
}

pub(crate) fn map_failure(error: &FetchError) -> FetchFailure {
    if error.is_transient() {
        FetchFailure::transient(error.to_string())
    } else {
        FetchFailure::misuse(error.to_string())
    }
}
