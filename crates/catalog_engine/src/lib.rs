//! Catalog engine: remote catalog client and request execution.
mod decode;
mod engine;
mod fetch;
mod registry;
mod types;

pub use decode::decode_people_page;
pub use engine::{EngineEvents, EngineHandle};
pub use fetch::{CatalogClient, ClientSettings, ReqwestCatalogClient, DEFAULT_BASE_URL};
pub use registry::{Admission, RequestRegistry};
pub use types::{
    CachePolicy, EngineEvent, FailureKind, FetchError, PageNumber, PageRequest, PeoplePage,
    Person,
};
