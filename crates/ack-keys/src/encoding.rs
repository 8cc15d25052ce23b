//! Byte encodings: hex, base58, base64url, and multibase.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::KeyError;

/// Multibase encodings understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultibaseEncoding {
    /// `z` prefix.
    #[default]
    Base58Btc,
    /// `u` prefix, unpadded.
    Base64Url,
    /// `f` prefix, lowercase.
    Base16,
}

impl MultibaseEncoding {
    pub fn prefix(&self) -> char {
        match self {
            Self::Base58Btc => 'z',
            Self::Base64Url => 'u',
            Self::Base16 => 'f',
        }
    }

    fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'z' => Some(Self::Base58Btc),
            'u' => Some(Self::Base64Url),
            'f' => Some(Self::Base16),
            _ => None,
        }
    }
}

/// Encode bytes as a multibase string.
pub fn bytes_to_multibase(bytes: &[u8], encoding: MultibaseEncoding) -> String {
    let body = match encoding {
        MultibaseEncoding::Base58Btc => bs58::encode(bytes).into_string(),
        MultibaseEncoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        MultibaseEncoding::Base16 => hex::encode(bytes),
    };
    format!("{}{}", encoding.prefix(), body)
}

/// Decode a multibase string, returning the bytes and the detected encoding.
pub fn multibase_to_bytes(value: &str) -> Result<(Vec<u8>, MultibaseEncoding), KeyError> {
    let mut chars = value.chars();
    let prefix = chars
        .next()
        .ok_or_else(|| KeyError::InvalidEncoding("Empty multibase string".into()))?;
    let encoding = MultibaseEncoding::from_prefix(prefix)
        .ok_or_else(|| KeyError::InvalidEncoding("Unsupported multibase prefix".into()))?;
    let body = chars.as_str();

    let bytes = match encoding {
        MultibaseEncoding::Base58Btc => bs58::decode(body)
            .into_vec()
            .map_err(|e| KeyError::InvalidEncoding(format!("invalid base58: {}", e)))?,
        MultibaseEncoding::Base64Url => base64url_to_bytes(body)?,
        MultibaseEncoding::Base16 => hex::decode(body)
            .map_err(|e| KeyError::InvalidEncoding(format!("invalid hex: {}", e)))?,
    };
    Ok((bytes, encoding))
}

/// Whether a string decodes as multibase.
pub fn is_multibase(value: &str) -> bool {
    multibase_to_bytes(value).is_ok()
}

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, with or without a `0x` prefix.
pub fn hex_string_to_bytes(value: &str) -> Result<Vec<u8>, KeyError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped).map_err(|e| KeyError::InvalidEncoding(format!("invalid hex: {}", e)))
}

pub fn bytes_to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn base58_to_bytes(value: &str) -> Result<Vec<u8>, KeyError> {
    bs58::decode(value)
        .into_vec()
        .map_err(|e| KeyError::InvalidEncoding(format!("invalid base58: {}", e)))
}

/// Unpadded base64url, as used by JWK and JWS.
pub fn bytes_to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url, tolerating trailing `=` padding.
pub fn base64url_to_bytes(value: &str) -> Result<Vec<u8>, KeyError> {
    URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| KeyError::InvalidEncoding(format!("invalid base64url: {}", e)))
}
