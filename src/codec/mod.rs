//! Serialization strategies for persisted experiment files
//!
//! Two encoders share one capability interface but keep their own failure
//! modes and stability guarantees:
//!
//! - [`JsonCodec`]: human-readable, 2-space indented JSON for `config.json`
//!   and `results.json`
//! - [`BinaryCodec`]: opaque, versioned binary envelope for model artifacts
//!
//! # Example
//!
//! ```rust
//! use trueno_experiment::codec::{BinaryCodec, Codec, JsonCodec};
//!
//! let weights = vec![0.25_f64, -1.5, 3.0];
//!
//! let text = JsonCodec.encode(&weights)?;
//! assert!(std::str::from_utf8(&text).is_ok());
//!
//! let blob = BinaryCodec.encode(&weights)?;
//! let restored: Vec<f64> = BinaryCodec.decode(&blob)?;
//! assert_eq!(restored, weights);
//! # Ok::<(), trueno_experiment::Error>(())
//! ```

mod binary;
mod json;

pub use binary::{BinaryCodec, ARTIFACT_FORMAT_VERSION, ARTIFACT_MAGIC};
pub use json::JsonCodec;

use serde::{de::DeserializeOwned, Serialize};

use crate::Result;

/// Encoder/decoder pair for one on-disk file kind.
pub trait Codec {
    /// Short format name used in log events.
    fn name(&self) -> &'static str;

    /// Encode a value to bytes.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the value is not representable.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode bytes produced by [`Codec::encode`].
    ///
    /// # Errors
    ///
    /// Returns `DeserializationError` if the bytes are corrupt or were
    /// produced by an incompatible encoder.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}
