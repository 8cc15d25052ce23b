use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

use crate::curve::KeyCurve;
use crate::error::KeyError;

/// A private/public key pair on one of the supported curves.
///
/// EC public keys are held as 65-byte uncompressed SEC1 points; Ed25519
/// public keys are the raw 32 bytes. Private key material is zeroized on drop.
#[derive(Clone)]
pub struct Keypair {
    public_key: Vec<u8>,
    private_key: Zeroizing<Vec<u8>>,
    curve: KeyCurve,
}

impl Keypair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate(curve: KeyCurve) -> Self {
        let (private_key, public_key) = match curve {
            KeyCurve::Secp256k1 => {
                let secret = k256::SecretKey::random(&mut OsRng);
                let public = secret.public_key().to_encoded_point(false);
                (secret.to_bytes().to_vec(), public.as_bytes().to_vec())
            }
            KeyCurve::Secp256r1 => {
                let secret = p256::SecretKey::random(&mut OsRng);
                let public = secret.public_key().to_encoded_point(false);
                (secret.to_bytes().to_vec(), public.as_bytes().to_vec())
            }
            KeyCurve::Ed25519 => {
                let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
                (
                    signing_key.to_bytes().to_vec(),
                    signing_key.verifying_key().to_bytes().to_vec(),
                )
            }
        };
        tracing::debug!(curve = %curve, "generated keypair");
        Self {
            public_key,
            private_key: Zeroizing::new(private_key),
            curve,
        }
    }

    /// Rebuild a key pair from raw private key bytes (32 bytes on every curve).
    pub fn from_private_key(private_key: &[u8], curve: KeyCurve) -> Result<Self, KeyError> {
        if private_key.len() != 32 {
            return Err(KeyError::InvalidKeyLength {
                expected: 32,
                actual: private_key.len(),
            });
        }
        let public_key = public_key_from_private(private_key, curve)?;
        Ok(Self {
            public_key,
            private_key: Zeroizing::new(private_key.to_vec()),
            curve,
        })
    }

    pub fn curve(&self) -> KeyCurve {
        self.curve
    }

    /// Public key bytes (uncompressed for EC curves).
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Public key bytes, compressed to 33 bytes for EC curves.
    pub fn public_key_compressed(&self) -> Vec<u8> {
        compress_public_key(&self.public_key, self.curve).unwrap_or_else(|_| self.public_key.clone())
    }

    /// Raw private key bytes. Prefer signing through [`crate::sign`].
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("curve", &self.curve)
            .field("public_key", &hex::encode(&self.public_key))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve
            && self.public_key == other.public_key
            && self.private_key[..] == other.private_key[..]
    }
}

impl Eq for Keypair {}

/// Derive the public key for a private scalar.
pub fn public_key_from_private(private_key: &[u8], curve: KeyCurve) -> Result<Vec<u8>, KeyError> {
    let invalid = || KeyError::InvalidPrivateKey {
        curve: curve.to_string(),
    };
    match curve {
        KeyCurve::Secp256k1 => {
            let secret = k256::SecretKey::from_slice(private_key).map_err(|_| invalid())?;
            Ok(secret.public_key().to_encoded_point(false).as_bytes().to_vec())
        }
        KeyCurve::Secp256r1 => {
            let secret = p256::SecretKey::from_slice(private_key).map_err(|_| invalid())?;
            Ok(secret.public_key().to_encoded_point(false).as_bytes().to_vec())
        }
        KeyCurve::Ed25519 => {
            let seed: [u8; 32] = private_key.try_into().map_err(|_| invalid())?;
            let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
            Ok(signing_key.verifying_key().to_bytes().to_vec())
        }
    }
}

/// Normalise an EC public key (compressed or uncompressed) to 65-byte uncompressed form.
pub fn decompress_public_key(public_key: &[u8], curve: KeyCurve) -> Result<Vec<u8>, KeyError> {
    let invalid = || KeyError::InvalidPublicKey {
        curve: curve.to_string(),
    };
    match curve {
        KeyCurve::Secp256k1 => k256::PublicKey::from_sec1_bytes(public_key)
            .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec())
            .map_err(|_| invalid()),
        KeyCurve::Secp256r1 => p256::PublicKey::from_sec1_bytes(public_key)
            .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec())
            .map_err(|_| invalid()),
        KeyCurve::Ed25519 => {
            let bytes: [u8; 32] = public_key.try_into().map_err(|_| invalid())?;
            ed25519_dalek::VerifyingKey::from_bytes(&bytes).map_err(|_| invalid())?;
            Ok(bytes.to_vec())
        }
    }
}

/// Compress an EC public key to 33 bytes. Ed25519 keys are returned unchanged.
pub fn compress_public_key(public_key: &[u8], curve: KeyCurve) -> Result<Vec<u8>, KeyError> {
    let invalid = || KeyError::InvalidPublicKey {
        curve: curve.to_string(),
    };
    match curve {
        KeyCurve::Secp256k1 => k256::PublicKey::from_sec1_bytes(public_key)
            .map(|pk| pk.to_encoded_point(true).as_bytes().to_vec())
            .map_err(|_| invalid()),
        KeyCurve::Secp256r1 => p256::PublicKey::from_sec1_bytes(public_key)
            .map(|pk| pk.to_encoded_point(true).as_bytes().to_vec())
            .map_err(|_| invalid()),
        KeyCurve::Ed25519 => decompress_public_key(public_key, curve),
    }
}
