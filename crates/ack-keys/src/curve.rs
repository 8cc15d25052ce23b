use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

/// Elliptic curves supported for identity keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCurve {
    #[serde(rename = "secp256k1")]
    Secp256k1,
    #[serde(rename = "secp256r1")]
    Secp256r1,
    #[serde(rename = "Ed25519")]
    Ed25519,
}

impl KeyCurve {
    pub const ALL: [KeyCurve; 3] = [KeyCurve::Secp256k1, KeyCurve::Secp256r1, KeyCurve::Ed25519];

    /// Canonical curve name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Secp256r1 => "secp256r1",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// `crv` value used in JWKs.
    pub fn jwk_crv(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Secp256r1 => "P-256",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// Parse a JWK `crv` value.
    pub fn from_jwk_crv(crv: &str) -> Result<Self, KeyError> {
        match crv {
            "secp256k1" => Ok(Self::Secp256k1),
            "P-256" | "secp256r1" => Ok(Self::Secp256r1),
            "Ed25519" => Ok(Self::Ed25519),
            other => Err(KeyError::UnsupportedCurve(other.to_string())),
        }
    }

    /// Whether this is a short-Weierstrass (ECDSA) curve.
    pub fn is_ecdsa(&self) -> bool {
        !matches!(self, Self::Ed25519)
    }

    /// Multicodec varint prefix for public keys on this curve.
    pub fn multicodec_prefix(&self) -> [u8; 2] {
        match self {
            Self::Secp256k1 => [0xe7, 0x01],
            Self::Secp256r1 => [0x80, 0x24],
            Self::Ed25519 => [0xed, 0x01],
        }
    }

    /// Detect a curve from a multicodec-prefixed public key.
    pub fn from_multicodec(bytes: &[u8]) -> Option<Self> {
        let prefix = bytes.get(..2)?;
        Self::ALL
            .into_iter()
            .find(|c| c.multicodec_prefix() == prefix)
    }
}

impl fmt::Display for KeyCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyCurve {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(Self::Secp256k1),
            "secp256r1" | "P-256" => Ok(Self::Secp256r1),
            "Ed25519" | "ed25519" => Ok(Self::Ed25519),
            other => Err(KeyError::UnsupportedCurve(other.to_string())),
        }
    }
}
