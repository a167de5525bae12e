//! Opaque binary codec for model artifacts
//!
//! ## Envelope Format
//!
//! ```text
//! offset  size  field
//! 0       4     magic "TXAF"
//! 4       2     format version (u16, little-endian)
//! 6       8     FNV-1a checksum of payload (u64, little-endian)
//! 14      ..    bincode payload
//! ```
//!
//! The envelope lets `load` distinguish a corrupt or foreign file from an
//! artifact written by an incompatible release.

use serde::{de::DeserializeOwned, Serialize};

use super::Codec;
use crate::{Error, Result};

/// Magic bytes at the start of every artifact file.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"TXAF";

/// Envelope format version written by this release.
pub const ARTIFACT_FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = 4 + 2 + 8;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Binary object encoding (bincode) wrapped in a checksummed envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    fn checksum(data: &[u8]) -> u64 {
        let mut hash = FNV_OFFSET;
        for byte in data {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    fn open_envelope(bytes: &[u8]) -> Result<&[u8]> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::DeserializationError(format!(
                "artifact truncated: {} bytes, header needs {HEADER_LEN}",
                bytes.len()
            )));
        }
        let (header, payload) = bytes.split_at(HEADER_LEN);

        if header[..4] != ARTIFACT_MAGIC {
            return Err(Error::DeserializationError(
                "not an artifact file (bad magic)".to_string(),
            ));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != ARTIFACT_FORMAT_VERSION {
            return Err(Error::DeserializationError(format!(
                "incompatible artifact format version {version} \
                 (supported: {ARTIFACT_FORMAT_VERSION})"
            )));
        }

        let mut stored = [0u8; 8];
        stored.copy_from_slice(&header[6..HEADER_LEN]);
        if u64::from_le_bytes(stored) != Self::checksum(payload) {
            return Err(Error::DeserializationError(
                "checksum verification failed - artifact may be corrupted".to_string(),
            ));
        }

        Ok(payload)
    }
}

impl Codec for BinaryCodec {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let payload = bincode::serialize(value)
            .map_err(|e| Error::SerializationError(format!("binary encoding failed: {e}")))?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&ARTIFACT_MAGIC);
        bytes.extend_from_slice(&ARTIFACT_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&Self::checksum(&payload).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let payload = Self::open_envelope(bytes)?;
        bincode::deserialize(payload)
            .map_err(|e| Error::DeserializationError(format!("binary decoding failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stump {
        feature: usize,
        threshold: f64,
        leaves: BTreeMap<String, Vec<f32>>,
    }

    struct FileHandle;

    impl Serialize for FileHandle {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize an open file handle"))
        }
    }

    fn stump() -> Stump {
        let mut leaves = BTreeMap::new();
        leaves.insert("left".to_string(), vec![0.1, 0.9]);
        leaves.insert("right".to_string(), vec![0.7, 0.3]);
        Stump {
            feature: 3,
            threshold: 0.42,
            leaves,
        }
    }

    #[test]
    fn test_nested_struct_roundtrip() {
        let bytes = BinaryCodec.encode(&stump()).unwrap();
        assert_eq!(&bytes[..4], b"TXAF");
        let restored: Stump = BinaryCodec.decode(&bytes).unwrap();
        assert_eq!(restored, stump());
    }

    #[test]
    fn test_unserializable_value() {
        let err = BinaryCodec.encode(&FileHandle).unwrap_err();
        assert!(matches!(err, Error::SerializationError(_)));
        assert!(err.to_string().contains("open file handle"));
    }

    #[test]
    fn test_truncated_header() {
        let err = BinaryCodec.decode::<Stump>(b"TXAF\x01").unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = BinaryCodec.encode(&stump()).unwrap();
        bytes[0] = b'X';
        let err = BinaryCodec.decode::<Stump>(&bytes).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_incompatible_version() {
        let mut bytes = BinaryCodec.encode(&stump()).unwrap();
        bytes[4..6].copy_from_slice(&2u16.to_le_bytes());
        let err = BinaryCodec.decode::<Stump>(&bytes).unwrap_err();
        assert!(err.to_string().contains("incompatible artifact format version 2"));
    }

    #[test]
    fn test_corrupted_payload() {
        let mut bytes = BinaryCodec.encode(&stump()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = BinaryCodec.decode::<Stump>(&bytes).unwrap_err();
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_wrong_target_type() {
        let bytes = BinaryCodec.encode("abc").unwrap();
        let err = BinaryCodec.decode::<Vec<f64>>(&bytes).unwrap_err();
        assert!(matches!(err, Error::DeserializationError(_)));
    }
}
