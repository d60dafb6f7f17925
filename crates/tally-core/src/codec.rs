//! # Persistence Codec
//!
//! Converts counters to and from the text stored under
//! [`STORAGE_KEY`](crate::STORAGE_KEY).
//!
//! ## Format
//! ```text
//! [{"id":1,"name":"Default","count":1},{"id":2,"name":"Counter 2","count":0}]
//! ```
//! - Compact JSON, one object per counter, collection order preserved
//! - No version field, no active pointer
//! - Decoding is permissive: unknown fields are ignored and duplicate ids
//!   are kept; only a structurally wrong payload is rejected

use crate::collection::CounterCollection;
use crate::error::CoreResult;
use crate::types::Counter;

/// Encodes counters into the persisted text form.
pub fn encode(counters: &[Counter]) -> CoreResult<String> {
    Ok(serde_json::to_string(counters)?)
}

/// Encodes a whole collection (its counters, in order).
pub fn encode_collection(collection: &CounterCollection) -> CoreResult<String> {
    encode(collection.counters())
}

/// Decodes the persisted text form.
///
/// ## Errors
/// [`CoreError::Codec`](crate::CoreError::Codec) when the text is not a JSON
/// array of `{id, name, count}` objects.
pub fn decode(raw: &str) -> CoreResult<Vec<Counter>> {
    Ok(serde_json::from_str(raw)?)
}

/// Decodes the persisted text form straight into a collection.
pub fn decode_collection(raw: &str) -> CoreResult<CounterCollection> {
    decode(raw).map(CounterCollection::from_persisted)
}
