use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::curve::KeyCurve;
use crate::encoding::{
    base58_to_bytes, bytes_to_base58, bytes_to_hex_string, bytes_to_multibase,
    hex_string_to_bytes, multibase_to_bytes, MultibaseEncoding,
};
use crate::error::KeyError;
use crate::jwk::PublicKeyJwk;
use crate::keypair::{compress_public_key, decompress_public_key, Keypair};

/// Public key output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicKeyEncoding {
    Hex,
    Jwk,
    Multibase,
    Base58,
}

impl PublicKeyEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Jwk => "jwk",
            Self::Multibase => "multibase",
            Self::Base58 => "base58",
        }
    }
}

impl fmt::Display for PublicKeyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicKeyEncoding {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hex" => Ok(Self::Hex),
            "jwk" => Ok(Self::Jwk),
            "multibase" => Ok(Self::Multibase),
            "base58" => Ok(Self::Base58),
            other => Err(KeyError::InvalidEncoding(format!(
                "unsupported public key encoding: {}",
                other
            ))),
        }
    }
}

/// An encoded public key value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicKeyValue {
    Jwk(PublicKeyJwk),
    Text(String),
}

/// A public key together with its encoding and curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyWithEncoding {
    pub encoding: PublicKeyEncoding,
    pub curve: KeyCurve,
    pub value: PublicKeyValue,
}

/// Encode public key bytes in the requested format.
///
/// - `hex` / `base58`: the uncompressed key bytes
/// - `multibase`: base58btc over the multicodec prefix and the compressed key
/// - `jwk`: an EC or OKP JWK
pub fn encode_public_key(
    public_key: &[u8],
    curve: KeyCurve,
    encoding: PublicKeyEncoding,
) -> Result<PublicKeyWithEncoding, KeyError> {
    let uncompressed = decompress_public_key(public_key, curve)?;
    let value = match encoding {
        PublicKeyEncoding::Hex => PublicKeyValue::Text(bytes_to_hex_string(&uncompressed)),
        PublicKeyEncoding::Base58 => PublicKeyValue::Text(bytes_to_base58(&uncompressed)),
        PublicKeyEncoding::Multibase => {
            PublicKeyValue::Text(public_key_to_multibase(&uncompressed, curve)?)
        }
        PublicKeyEncoding::Jwk => {
            PublicKeyValue::Jwk(PublicKeyJwk::from_public_key(&uncompressed, curve)?)
        }
    };
    Ok(PublicKeyWithEncoding {
        encoding,
        curve,
        value,
    })
}

/// Encode a key pair's public key.
pub fn encode_public_key_from_keypair(
    keypair: &Keypair,
    encoding: PublicKeyEncoding,
) -> Result<PublicKeyWithEncoding, KeyError> {
    encode_public_key(keypair.public_key(), keypair.curve(), encoding)
}

/// Multicodec-prefixed multibase (base58btc) form of a public key.
pub fn public_key_to_multibase(public_key: &[u8], curve: KeyCurve) -> Result<String, KeyError> {
    let compressed = compress_public_key(public_key, curve)?;
    let mut bytes = curve.multicodec_prefix().to_vec();
    bytes.extend_from_slice(&compressed);
    Ok(bytes_to_multibase(&bytes, MultibaseEncoding::Base58Btc))
}

/// Decode a multibase public key. A known multicodec prefix determines the
/// curve; otherwise `fallback_curve` is used for the raw bytes.
pub fn multibase_to_public_key(
    value: &str,
    fallback_curve: Option<KeyCurve>,
) -> Result<(Vec<u8>, KeyCurve), KeyError> {
    let (bytes, _) = multibase_to_bytes(value)?;
    let (curve, raw) = match KeyCurve::from_multicodec(&bytes) {
        Some(curve) => (curve, &bytes[2..]),
        None => {
            let curve = fallback_curve.ok_or_else(|| {
                KeyError::InvalidEncoding("unknown multicodec prefix".into())
            })?;
            (curve, &bytes[..])
        }
    };
    Ok((decompress_public_key(raw, curve)?, curve))
}

/// Decode an encoded public key back to bytes (uncompressed for EC).
pub fn decode_public_key(public_key: &PublicKeyWithEncoding) -> Result<Vec<u8>, KeyError> {
    let curve = public_key.curve;
    match (&public_key.encoding, &public_key.value) {
        (PublicKeyEncoding::Jwk, PublicKeyValue::Jwk(jwk)) => {
            let (bytes, jwk_curve) = jwk.to_public_key()?;
            if jwk_curve != curve {
                return Err(KeyError::InvalidJwk(format!(
                    "JWK curve {} does not match {}",
                    jwk_curve, curve
                )));
            }
            Ok(bytes)
        }
        (PublicKeyEncoding::Hex, PublicKeyValue::Text(s)) => {
            decompress_public_key(&hex_string_to_bytes(s)?, curve)
        }
        (PublicKeyEncoding::Base58, PublicKeyValue::Text(s)) => {
            decompress_public_key(&base58_to_bytes(s)?, curve)
        }
        (PublicKeyEncoding::Multibase, PublicKeyValue::Text(s)) => {
            multibase_to_public_key(s, Some(curve)).map(|(bytes, _)| bytes)
        }
        (encoding, _) => Err(KeyError::InvalidEncoding(format!(
            "value does not match encoding {}",
            encoding
        ))),
    }
}

/// Validate public key bytes for a curve: length check plus point decompression.
pub fn is_valid_public_key(public_key: &[u8], curve: KeyCurve) -> bool {
    let length_ok = match curve {
        KeyCurve::Ed25519 => public_key.len() == 32,
        _ => public_key.len() == 33 || public_key.len() == 65,
    };
    length_ok && decompress_public_key(public_key, curve).is_ok()
}
