use ack_did::DidResolutionError;
use ack_jwt::JwtError;

/// Credential creation, parsing and verification errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Not a credential, or the envelope does not match the expected shape.
    #[error("{0}")]
    InvalidCredential(String),

    /// The subject does not match the claim shape a verifier expects.
    #[error("{0}")]
    InvalidCredentialSubject(String),

    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    #[error("Unsupported proof type: {0}")]
    UnsupportedProofType(String),

    #[error("Credential has expired")]
    Expired,

    #[error("Credential has been revoked")]
    Revoked,

    #[error("Issuer is not trusted: {0}")]
    UntrustedIssuer(String),

    #[error("Invalid controller claim: expected {expected}, resolved {actual}")]
    InvalidControllerClaim { expected: String, actual: String },

    #[error("Invalid status list: {0}")]
    InvalidStatusList(String),

    #[error("Failed to sign: {0}")]
    SigningFailed(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("DID resolution failed: {0}")]
    Resolution(#[from] DidResolutionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CredentialError {
    /// Whether the credential was well formed but failed a trust check
    /// (expiry, revocation, proof, issuer trust or a claim verifier).
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            Self::Expired
                | Self::Revoked
                | Self::InvalidProof(_)
                | Self::UntrustedIssuer(_)
                | Self::InvalidControllerClaim { .. }
                | Self::InvalidCredentialSubject(_)
        )
    }
}
