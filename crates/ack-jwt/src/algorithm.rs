use std::fmt;
use std::str::FromStr;

use ack_keys::KeyCurve;
use serde::{Deserialize, Serialize};

use crate::error::JwtError;

/// JWS algorithms supported by the codec. Each maps to exactly one curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    ES256,
    ES256K,
    EdDSA,
}

impl JwtAlgorithm {
    pub const ALL: [JwtAlgorithm; 3] = [Self::ES256, Self::ES256K, Self::EdDSA];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ES256 => "ES256",
            Self::ES256K => "ES256K",
            Self::EdDSA => "EdDSA",
        }
    }

    pub fn curve(&self) -> KeyCurve {
        match self {
            Self::ES256 => KeyCurve::Secp256r1,
            Self::ES256K => KeyCurve::Secp256k1,
            Self::EdDSA => KeyCurve::Ed25519,
        }
    }

    pub fn from_curve(curve: KeyCurve) -> Self {
        match curve {
            KeyCurve::Secp256k1 => Self::ES256K,
            KeyCurve::Secp256r1 => Self::ES256,
            KeyCurve::Ed25519 => Self::EdDSA,
        }
    }
}

impl Default for JwtAlgorithm {
    fn default() -> Self {
        Self::ES256K
    }
}

impl fmt::Display for JwtAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the JWS names and the curve names as aliases
/// (`secp256k1`, `secp256r1`, `Ed25519`).
impl FromStr for JwtAlgorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ES256" | "secp256r1" => Ok(Self::ES256),
            "ES256K" | "secp256k1" => Ok(Self::ES256K),
            "EdDSA" | "Ed25519" => Ok(Self::EdDSA),
            other => Err(JwtError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

pub fn is_jwt_algorithm(value: &str) -> bool {
    JwtAlgorithm::ALL.iter().any(|alg| alg.as_str() == value)
}

/// Map a curve name to its JWS algorithm.
pub fn curve_to_jwt_algorithm(curve: &str) -> Result<JwtAlgorithm, JwtError> {
    let curve: KeyCurve = curve
        .parse()
        .map_err(|_| JwtError::UnsupportedCurve(curve.to_string()))?;
    Ok(JwtAlgorithm::from_curve(curve))
}
