#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request one page; supersedes any other fetch still in flight.
    FetchPage {
        key: crate::PageKey,
        policy: FetchPolicy,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Answer from the in-memory page cache when possible.
    CacheFirst,
    /// Always re-request from the remote catalog.
    Refresh,
}
