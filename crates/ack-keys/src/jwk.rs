//! JSON Web Key encoding for public and private keys.
//!
//! EC keys use `{kty:"EC", crv, x, y}` with 32-byte big-endian coordinates;
//! Ed25519 keys use `{kty:"OKP", crv:"Ed25519", x}` with no `y`.

use serde::{Deserialize, Serialize};

use crate::curve::KeyCurve;
use crate::encoding::{base64url_to_bytes, bytes_to_base64url};
use crate::error::KeyError;
use crate::keypair::{decompress_public_key, Keypair};

/// A public JWK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyJwk {
    pub kty: String,
    pub crv: String,
    pub x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

/// A private JWK: the public members plus the private scalar `d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKeyJwk {
    #[serde(flatten)]
    pub public: PublicKeyJwk,
    pub d: String,
}

impl PublicKeyJwk {
    /// Build a JWK from public key bytes (compressed or uncompressed for EC).
    pub fn from_public_key(public_key: &[u8], curve: KeyCurve) -> Result<Self, KeyError> {
        let public_key = decompress_public_key(public_key, curve)?;
        let jwk = match curve {
            KeyCurve::Ed25519 => Self {
                kty: "OKP".into(),
                crv: curve.jwk_crv().into(),
                x: bytes_to_base64url(&public_key),
                y: None,
                kid: None,
                alg: None,
            },
            _ => Self {
                kty: "EC".into(),
                crv: curve.jwk_crv().into(),
                x: bytes_to_base64url(&public_key[1..33]),
                y: Some(bytes_to_base64url(&public_key[33..65])),
                kid: None,
                alg: None,
            },
        };
        Ok(jwk)
    }

    /// The curve named by `crv`, checked against `kty`.
    pub fn curve(&self) -> Result<KeyCurve, KeyError> {
        let curve = KeyCurve::from_jwk_crv(&self.crv)?;
        let expected_kty = if curve.is_ecdsa() { "EC" } else { "OKP" };
        if self.kty != expected_kty {
            return Err(KeyError::InvalidJwk(format!(
                "kty {} does not match crv {}",
                self.kty, self.crv
            )));
        }
        Ok(curve)
    }

    /// Decode to public key bytes (65-byte uncompressed for EC), validating the point.
    pub fn to_public_key(&self) -> Result<(Vec<u8>, KeyCurve), KeyError> {
        let curve = self.curve()?;
        let x = base64url_to_bytes(&self.x)?;
        let bytes = if curve.is_ecdsa() {
            let y = self
                .y
                .as_deref()
                .ok_or_else(|| KeyError::InvalidJwk("EC JWK is missing y".into()))?;
            let y = base64url_to_bytes(y)?;
            if x.len() != 32 || y.len() != 32 {
                return Err(KeyError::InvalidJwk("EC coordinates must be 32 bytes".into()));
            }
            let mut point = Vec::with_capacity(65);
            point.push(0x04);
            point.extend_from_slice(&x);
            point.extend_from_slice(&y);
            point
        } else {
            x
        };
        let bytes = decompress_public_key(&bytes, curve)?;
        Ok((bytes, curve))
    }

    /// Whether a JSON value looks like a public JWK this crate understands.
    pub fn is_public_key_jwk(value: &serde_json::Value) -> bool {
        serde_json::from_value::<Self>(value.clone())
            .map(|jwk| jwk.to_public_key().is_ok())
            .unwrap_or(false)
    }
}

/// Export a key pair as a private JWK.
pub fn keypair_to_jwk(keypair: &Keypair) -> Result<PrivateKeyJwk, KeyError> {
    Ok(PrivateKeyJwk {
        public: PublicKeyJwk::from_public_key(keypair.public_key(), keypair.curve())?,
        d: bytes_to_base64url(keypair.private_key()),
    })
}

/// Import a key pair from a private JWK.
///
/// The public key is regenerated from `d` and must match the JWK's `x`/`y`.
pub fn jwk_to_keypair(jwk: &PrivateKeyJwk) -> Result<Keypair, KeyError> {
    let curve = jwk.public.curve()?;
    let d = base64url_to_bytes(&jwk.d)?;
    let keypair = Keypair::from_private_key(&d, curve)?;
    let (declared, _) = jwk.public.to_public_key()?;
    if declared != keypair.public_key() {
        return Err(KeyError::InvalidJwk(
            "public coordinates do not match private key".into(),
        ));
    }
    Ok(keypair)
}
