//! Opaque value codec
//!
//! Structured values (records, vectors of records, tagged booleans) cross
//! the boundary as an opaque serialized payload whose schema is known to
//! both sides by convention of the operation that produced it. The concrete
//! encoding is a pluggable collaborator: the protocol only requires that
//! encode/decode round-trip every shape the boundary exercises and that the
//! payload text contains no interior NUL, so it can travel as a C string.
//!
//! [`JsonCodec`] is the default. A decode failure is a recoverable
//! [`Error::Decode`] returned to the immediate caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// A pluggable payload encoding.
///
/// Implementations pivot through `serde_json::Value` so the trait stays
/// object-safe while callers keep typed `encode`/`decode` entry points.
pub trait PayloadCodec: Send + Sync {
    /// Render a structured value into payload text
    fn encode_value(&self, value: &Value) -> Result<String>;

    /// Parse payload text back into a structured value
    fn decode_value(&self, payload: &str) -> Result<Value>;
}

/// JSON payload encoding, the default collaborator
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn encode_value(&self, value: &Value) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::encode("value to JSON text", e))
    }

    fn decode_value(&self, payload: &str) -> Result<Value> {
        serde_json::from_str(payload).map_err(|e| Error::decode("JSON text to value", e))
    }
}

/// Encode a typed value into payload text with the given codec
pub fn encode<T, C>(codec: &C, value: &T) -> Result<String>
where
    T: Serialize,
    C: PayloadCodec + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|e| Error::encode("value to tree", e))?;
    codec.encode_value(&value)
}

/// Decode payload text into the shape the operation expects
pub fn decode<T, C>(codec: &C, payload: &str) -> Result<T>
where
    T: DeserializeOwned,
    C: PayloadCodec + ?Sized,
{
    let value = codec.decode_value(payload)?;
    serde_json::from_value(value).map_err(|e| Error::decode("tree to expected shape", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
    struct Sample {
        id: i32,
        name: String,
        active: bool,
        weight: f64,
    }

    fn sample() -> Sample {
        Sample {
            id: 7,
            name: "probe".to_string(),
            active: true,
            weight: 2.5,
        }
    }

    #[test]
    fn test_struct_round_trip() {
        let codec = JsonCodec;
        let payload = encode(&codec, &sample()).unwrap();
        let back: Sample = decode(&codec, &payload).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_struct_vec_round_trip() {
        let codec = JsonCodec;
        let records = vec![sample(), sample()];
        let payload = encode(&codec, &records).unwrap();
        let back: Vec<Sample> = decode(&codec, &payload).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_bool_as_int_round_trip() {
        // Tagged booleans cross as 0/1 integers by convention.
        let codec = JsonCodec;
        let payload = encode(&codec, &[0i32, 1i32]).unwrap();
        let back: Vec<i32> = decode(&codec, &payload).unwrap();
        assert_eq!(back, vec![0, 1]);
    }

    #[test]
    fn test_malformed_payload_is_recoverable() {
        let codec = JsonCodec;
        let err = decode::<Sample, _>(&codec, "{not json").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_shape_mismatch_is_recoverable() {
        let codec = JsonCodec;
        let payload = encode(&codec, &vec![1, 2, 3]).unwrap();
        let err = decode::<Sample, _>(&codec, &payload).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_payload_has_no_interior_nul() {
        let codec = JsonCodec;
        let payload = encode(&codec, &sample()).unwrap();
        assert!(!payload.as_bytes().contains(&0));
    }
}
