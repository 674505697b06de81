//! Request de-duplication keyed by `(term, page)`.
//!
//! Only one logical slot is active at a time: admitting a request cancels
//! every other request still in flight, and results for cancelled or replaced
//! requests are refused by [`RequestRegistry::complete`].

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::{CachePolicy, FetchError, PageRequest, PeoplePage};

#[derive(Debug)]
enum Slot {
    InFlight {
        generation: u64,
        token: CancellationToken,
    },
    Ready(PeoplePage),
}

#[derive(Debug, Clone)]
pub enum Admission {
    /// Answer immediately from memory.
    Cached(PeoplePage),
    /// The same request is already in flight; its result will be delivered.
    Joined,
    /// Issue a new remote call.
    Issue {
        generation: u64,
        token: CancellationToken,
    },
}

#[derive(Debug, Default)]
pub struct RequestRegistry {
    slots: HashMap<PageRequest, Slot>,
    next_generation: u64,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, request: &PageRequest, policy: CachePolicy) -> Admission {
        self.supersede_all_but(request);

        match (self.slots.get(request), policy) {
            (Some(Slot::Ready(page)), CachePolicy::CacheFirst) => Admission::Cached(page.clone()),
            (Some(Slot::InFlight { .. }), _) => Admission::Joined,
            _ => {
                self.next_generation += 1;
                let generation = self.next_generation;
                let token = CancellationToken::new();
                self.slots.insert(
                    request.clone(),
                    Slot::InFlight {
                        generation,
                        token: token.clone(),
                    },
                );
                Admission::Issue { generation, token }
            }
        }
    }

    /// Records a finished remote call. Returns false when the call was
    /// superseded, in which case its result must be discarded.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        generation: u64,
        result: &Result<PeoplePage, FetchError>,
    ) -> bool {
        let current = matches!(
            self.slots.get(request),
            Some(Slot::InFlight { generation: g, token }) if *g == generation && !token.is_cancelled()
        );
        if !current {
            return false;
        }
        match result {
            Ok(page) => {
                self.slots.insert(request.clone(), Slot::Ready(page.clone()));
            }
            Err(_) => {
                self.slots.remove(request);
            }
        }
        true
    }

    pub fn in_flight(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::InFlight { .. }))
            .count()
    }

    pub fn cached(&self) -> usize {
        self.slots.len() - self.in_flight()
    }

    fn supersede_all_but(&mut self, keep: &PageRequest) {
        self.slots.retain(|key, slot| match slot {
            Slot::InFlight { token, .. } if key != keep => {
                token.cancel();
                false
            }
            _ => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;

    fn page(count: u64) -> PeoplePage {
        PeoplePage {
            count,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    fn issue(registry: &mut RequestRegistry, request: &PageRequest) -> (u64, CancellationToken) {
        match registry.admit(request, CachePolicy::CacheFirst) {
            Admission::Issue { generation, token } => (generation, token),
            other => panic!("expected a new call, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_in_flight_request_is_joined() {
        let mut registry = RequestRegistry::new();
        let request = PageRequest::new("luke", 1);
        issue(&mut registry, &request);

        assert!(matches!(
            registry.admit(&request, CachePolicy::CacheFirst),
            Admission::Joined
        ));
        assert_eq!(registry.in_flight(), 1);
    }

    #[test]
    fn completed_page_is_served_from_cache_unless_refreshed() {
        let mut registry = RequestRegistry::new();
        let request = PageRequest::new("", 1);
        let (generation, _) = issue(&mut registry, &request);
        assert!(registry.complete(&request, generation, &Ok(page(82))));

        assert!(matches!(
            registry.admit(&request, CachePolicy::CacheFirst),
            Admission::Cached(cached) if cached == page(82)
        ));
        assert!(matches!(
            registry.admit(&request, CachePolicy::Refresh),
            Admission::Issue { .. }
        ));
        assert_eq!(registry.cached(), 0);
    }

    #[test]
    fn new_key_cancels_other_in_flight_keys() {
        let mut registry = RequestRegistry::new();
        let old = PageRequest::new("han", 1);
        let new = PageRequest::new("chewie", 1);
        let (old_generation, old_token) = issue(&mut registry, &old);
        issue(&mut registry, &new);

        assert!(old_token.is_cancelled());
        assert!(!registry.complete(&old, old_generation, &Ok(page(1))));
        assert_eq!(registry.in_flight(), 1);
    }

    #[test]
    fn reissued_key_refuses_the_older_generation() {
        let mut registry = RequestRegistry::new();
        let a = PageRequest::new("a", 1);
        let b = PageRequest::new("b", 1);
        let (first, _) = issue(&mut registry, &a);
        issue(&mut registry, &b);
        let (second, _) = issue(&mut registry, &a);

        assert!(!registry.complete(&a, first, &Ok(page(1))));
        assert!(registry.complete(&a, second, &Ok(page(1))));
    }

    #[test]
    fn failures_are_not_cached() {
        let mut registry = RequestRegistry::new();
        let request = PageRequest::new("", 9);
        let (generation, _) = issue(&mut registry, &request);
        let failure = Err(FetchError::new(FailureKind::HttpStatus(404), "Not found"));

        assert!(registry.complete(&request, generation, &failure));
        assert_eq!(registry.cached(), 0);
        assert!(matches!(
            registry.admit(&request, CachePolicy::CacheFirst),
            Admission::Issue { .. }
        ));
    }
}
