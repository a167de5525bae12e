//! Structured-text codec (indented JSON)

use serde::{de::DeserializeOwned, Serialize};

use super::Codec;
use crate::{Error, Result};

/// Human-readable JSON with 2-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(value)
            .map_err(|e| Error::SerializationError(format!("JSON encoding failed: {e}")))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::DeserializationError(format!("JSON decoding failed: {e}")))
    }
}
