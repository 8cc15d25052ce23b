use ack_jwt::JwtError;
use ack_vc::CredentialError;

/// Handshake and signed-message errors.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    /// The message does not have the expected A2A shape.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// The JWT payload does not have the expected handshake shape.
    #[error("Invalid handshake payload: {0}")]
    InvalidPayload(String),

    #[error("Nonce mismatch: expected {expected}, got {actual}")]
    NonceMismatch { expected: String, actual: String },

    #[error("Message parts do not match")]
    MessageMismatch,

    #[error("Replayed token: {0}")]
    Replay(String),

    #[error("Invalid handshake state: {0}")]
    InvalidState(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
