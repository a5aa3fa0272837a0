//! Payload Codec Module
//!
//! The single serialization pipeline for every cached value:
//! JSON, gzip above a size threshold, then data protection.

use std::io::{Read, Write};
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};
use crate::protect::DataProtector;

/// Envelope tag for plain JSON.
const TAG_JSON: &str = "j:";
/// Envelope tag for base64-encoded gzip of the JSON.
const TAG_GZIP: &str = "z:";

// == Payload Codec ==
/// Converts typed values to protected payload bytes and back.
#[derive(Clone)]
pub struct PayloadCodec {
    protector: Arc<dyn DataProtector>,
    compression_threshold: usize,
}

impl PayloadCodec {
    pub fn new(protector: Arc<dyn DataProtector>, compression_threshold: usize) -> Self {
        Self {
            protector,
            compression_threshold,
        }
    }

    // == Encode ==
    /// Serializes, optionally compresses, and protects `value`.
    ///
    /// Values serializing to JSON `null` are rejected as absent.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let json = serde_json::to_string(value)?;
        if json == "null" {
            return Err(CacheError::invalid("value must not be null"));
        }

        let envelope = if json.len() >= self.compression_threshold {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(json.as_bytes())?;
            format!("{}{}", TAG_GZIP, STANDARD.encode(encoder.finish()?))
        } else {
            format!("{}{}", TAG_JSON, json)
        };

        Ok(self.protector.protect(&envelope)?.into_bytes())
    }

    // == Decode ==
    /// Reverses [`PayloadCodec::encode`].
    pub fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        let sealed = std::str::from_utf8(payload)
            .map_err(|e| CacheError::Protection(format!("payload is not UTF-8: {}", e)))?;
        let envelope = self.protector.unprotect(sealed)?;

        if let Some(json) = envelope.strip_prefix(TAG_JSON) {
            return Ok(serde_json::from_str(json)?);
        }

        if let Some(encoded) = envelope.strip_prefix(TAG_GZIP) {
            let compressed = STANDARD
                .decode(encoded)
                .map_err(|e| CacheError::Protection(format!("malformed compressed payload: {}", e)))?;
            let mut json = String::new();
            GzDecoder::new(compressed.as_slice()).read_to_string(&mut json)?;
            return Ok(serde_json::from_str(&json)?);
        }

        Err(CacheError::Protection("unknown payload envelope".to_string()))
    }
}

impl std::fmt::Debug for PayloadCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadCodec")
            .field("compression_threshold", &self.compression_threshold)
            .finish_non_exhaustive()
    }
}
