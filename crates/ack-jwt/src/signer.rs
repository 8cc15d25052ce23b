use ack_keys::Keypair;

use crate::algorithm::JwtAlgorithm;
use crate::error::JwtError;

/// Produces raw JWS signatures over a signing input.
///
/// Implementations may wrap a local key pair, an HSM, or a remote KMS.
pub trait JwtSigner: Send + Sync {
    /// The algorithm this signer produces signatures for.
    fn algorithm(&self) -> JwtAlgorithm;

    /// Sign `header.payload`, returning the raw signature bytes.
    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, JwtError>;
}

/// Signs with an in-memory key pair.
#[derive(Debug, Clone)]
pub struct KeypairSigner {
    keypair: Keypair,
}

impl KeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl JwtSigner for KeypairSigner {
    fn algorithm(&self) -> JwtAlgorithm {
        JwtAlgorithm::from_curve(self.keypair.curve())
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, JwtError> {
        ack_keys::sign(signing_input, &self.keypair)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }
}

/// Create a signer whose algorithm follows the key pair's curve.
pub fn create_jwt_signer(keypair: &Keypair) -> KeypairSigner {
    KeypairSigner::new(keypair.clone())
}
