/// Key management and signature errors.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Unsupported curve: '{0}'")]
    UnsupportedCurve(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid private key for {curve}")]
    InvalidPrivateKey { curve: String },

    #[error("invalid public key for {curve}")]
    InvalidPublicKey { curve: String },

    #[error("invalid JWK: {0}")]
    InvalidJwk(String),

    #[error("{0}")]
    InvalidEncoding(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}
