use ed25519_dalek::Signer as _;
use ed25519_dalek::Verifier as _;
use k256::ecdsa::signature::{Signer, Verifier};

use crate::curve::KeyCurve;
use crate::error::KeyError;
use crate::keypair::Keypair;

/// Sign a message with the key pair's curve.
///
/// ECDSA curves hash with SHA-256 and return the 64-byte `r||s` form with a
/// low `s`; Ed25519 returns the standard 64-byte signature.
pub fn sign(message: &[u8], keypair: &Keypair) -> Result<Vec<u8>, KeyError> {
    let invalid = || KeyError::InvalidPrivateKey {
        curve: keypair.curve().to_string(),
    };
    let signature = match keypair.curve() {
        KeyCurve::Secp256k1 => {
            let key = k256::ecdsa::SigningKey::from_slice(keypair.private_key())
                .map_err(|_| invalid())?;
            let sig: k256::ecdsa::Signature = key.sign(message);
            let sig = sig.normalize_s().unwrap_or(sig);
            sig.to_bytes().to_vec()
        }
        KeyCurve::Secp256r1 => {
            let key = p256::ecdsa::SigningKey::from_slice(keypair.private_key())
                .map_err(|_| invalid())?;
            let sig: p256::ecdsa::Signature = key.sign(message);
            let sig = sig.normalize_s().unwrap_or(sig);
            sig.to_bytes().to_vec()
        }
        KeyCurve::Ed25519 => {
            let seed: [u8; 32] = keypair.private_key().try_into().map_err(|_| invalid())?;
            let key = ed25519_dalek::SigningKey::from_bytes(&seed);
            key.sign(message).to_bytes().to_vec()
        }
    };
    Ok(signature)
}

/// Verify a signature produced by [`sign`] against public key bytes.
pub fn verify(
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
    curve: KeyCurve,
) -> Result<(), KeyError> {
    let invalid_key = || KeyError::InvalidPublicKey {
        curve: curve.to_string(),
    };
    if signature.len() != 64 {
        return Err(KeyError::InvalidSignature(format!(
            "signature must be 64 bytes, got {}",
            signature.len()
        )));
    }
    match curve {
        KeyCurve::Secp256k1 => {
            let key =
                k256::ecdsa::VerifyingKey::from_sec1_bytes(public_key).map_err(|_| invalid_key())?;
            let sig = k256::ecdsa::Signature::from_slice(signature)
                .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
            key.verify(message, &sig)
                .map_err(|_| KeyError::SignatureVerificationFailed)
        }
        KeyCurve::Secp256r1 => {
            let key =
                p256::ecdsa::VerifyingKey::from_sec1_bytes(public_key).map_err(|_| invalid_key())?;
            let sig = p256::ecdsa::Signature::from_slice(signature)
                .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
            key.verify(message, &sig)
                .map_err(|_| KeyError::SignatureVerificationFailed)
        }
        KeyCurve::Ed25519 => {
            let bytes: [u8; 32] = public_key.try_into().map_err(|_| invalid_key())?;
            let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes).map_err(|_| invalid_key())?;
            let sig = ed25519_dalek::Signature::from_slice(signature)
                .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
            key.verify(message, &sig)
                .map_err(|_| KeyError::SignatureVerificationFailed)
        }
    }
}
