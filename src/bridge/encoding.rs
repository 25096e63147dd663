/*!
 * Transport Encoding
 * Conversion between the host wire form (UTF-8 text or base64) and sandbox bytes
 */

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::core::{BridgeError, BridgeResult};

/// Encoding tag carried next to file content on the host wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "base64")]
    Base64,
}

/// File content in transport form
///
/// An absent encoding means plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<TransportEncoding>,
}

impl TransportContent {
    /// Plain text content with no encoding tag
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            encoding: None,
        }
    }

    /// Base64 transport string for binary content
    pub fn base64(transport: impl Into<String>) -> Self {
        Self {
            content: transport.into(),
            encoding: Some(TransportEncoding::Base64),
        }
    }

    /// Pick the transport form for raw bytes: text if valid UTF-8, base64 otherwise
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::text(text),
            Err(e) => Self::base64(encode_base64(e.as_bytes())),
        }
    }

    /// Whether the content travels as base64
    #[inline]
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.encoding == Some(TransportEncoding::Base64)
    }

    /// Decode into the raw bytes the sandbox stores
    ///
    /// `path` is only used for error context.
    pub fn to_bytes(&self, path: &str) -> BridgeResult<Vec<u8>> {
        if self.is_binary() {
            decode_base64(&self.content).map_err(|e| BridgeError::InvalidTransport {
                path: path.to_string(),
                reason: e.to_string(),
            })
        } else {
            Ok(self.content.as_bytes().to_vec())
        }
    }
}

/// Encode raw bytes into the canonical base64 transport string
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a base64 transport string
///
/// Only canonical, padded input is accepted, so re-encoding the result
/// reproduces the input exactly.
pub fn decode_base64(transport: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(transport)
}
