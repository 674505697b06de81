use std::fmt;

use crate::{update, AppState, Effect, Msg, SearchViewModel};

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&SearchViewModel) + Send>;

/// Owns the query state and notifies subscribers with a fresh snapshot
/// whenever a dispatched message changed it.
pub struct QueryStore {
    state: AppState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl QueryStore {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> SearchViewModel {
        self.state.view()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SearchViewModel) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty && !self.listeners.is_empty() {
            let view = self.state.view();
            for (_, listener) in &mut self.listeners {
                listener(&view);
            }
        }
        effects
    }
}
