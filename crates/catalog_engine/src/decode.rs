use crate::{FailureKind, FetchError, PeoplePage};

/// Decode a people endpoint body.
pub fn decode_people_page(bytes: &[u8]) -> Result<PeoplePage, FetchError> {
    serde_json::from_slice(bytes).map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
}
