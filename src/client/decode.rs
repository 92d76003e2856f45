//! Decoders handed to the executor.
//!
//! A decoder turns a raw 2xx body into a value. Any error it returns, and
//! any panic it raises, becomes a decode `ApiError` at the executor boundary.

use super::error::{ApiError, ApiResult};
use crate::models::{Listing, ListingData, RedditEnvelope, Thing};
use serde::de::DeserializeOwned;

pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    Ok(serde_json::from_slice(body)?)
}

/// `{ "kind": "Listing" | "UserList", "data": { "children": [...], ... } }`
pub fn decode_listing<T: DeserializeOwned>(body: &[u8]) -> ApiResult<Listing<T>> {
    let envelope: RedditEnvelope<ListingData<T>> = serde_json::from_slice(body)?;
    Ok(envelope.data.into())
}

/// A single thing whose kind must match `T`'s, e.g. `/about` returning `t5`.
pub fn decode_thing<T: DeserializeOwned>(expected_kind: &str, body: &[u8]) -> ApiResult<T> {
    let envelope: RedditEnvelope<serde_json::Value> = serde_json::from_slice(body)?;
    if envelope.kind != expected_kind {
        return Err(ApiError::decode(format!(
            "expected kind {}, got {}",
            expected_kind, envelope.kind
        )));
    }
    Ok(serde_json::from_value(envelope.data)?)
}

pub fn decode_thing_listing(body: &[u8]) -> ApiResult<Listing<Thing>> {
    decode_listing::<Thing>(body)
}

/// Write endpoints answer with `{}` or `{"json": {"errors": [...]}}`.
pub fn decode_empty(body: &[u8]) -> ApiResult<()> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    let json: serde_json::Value = serde_json::from_slice(body)?;
    if let Some(errors) = json["json"]["errors"].as_array() {
        if !errors.is_empty() {
            return Err(ApiError::decode(format!(
                "server reported errors: {:?}",
                errors
            )));
        }
    }
    Ok(())
}
