//! Catalog core: pure query state machine, snapshot and sort projection.
mod effect;
mod msg;
mod record;
pub mod sort;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::{Effect, FetchPolicy};
pub use msg::{FailureClass, FetchFailure, Msg};
pub use record::{Character, CharacterId, Gender, Page, PageKey, ResultPage};
pub use sort::{sort_projection, SortOption, UnknownSortOption};
pub use state::{AppState, MergeMode};
pub use store::{QueryStore, SubscriptionId};
pub use update::update;
pub use view_model::SearchViewModel;
