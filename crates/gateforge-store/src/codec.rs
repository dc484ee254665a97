//! Codec trait and implementations for the on-disk table format.
//!
//! A [`FileStore`](crate::FileStore) doesn't care HOW its tables become
//! bytes: it just needs something that implements [`Codec`]. The default
//! is [`JsonCodec`], which writes pretty-printed JSON so a store file can
//! be inspected (and, carefully, repaired) by hand.

use serde::{Serialize, de::DeserializeOwned};

use crate::StoreError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because the codec lives inside a store that is
/// shared across tasks for the lifetime of the process.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`StoreError::Decode`] if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, StoreError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that writes pretty-printed JSON via `serde_json`.
///
/// ## Example
///
/// ```rust
/// use gateforge_store::{Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&vec![1u64, 2, 3]).unwrap();
/// let back: Vec<u64> = codec.decode(&bytes).unwrap();
/// assert_eq!(back, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec_pretty(value).map_err(StoreError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(data).map_err(StoreError::Decode)
    }
}
