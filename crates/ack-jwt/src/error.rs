use ack_did::DidResolutionError;
use ack_keys::KeyError;

/// JWT creation and verification errors.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Incorrect format JWT: {0}")]
    Malformed(String),

    #[error("Unsupported algorithm: '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported curve: '{0}'")]
    UnsupportedCurve(String),

    #[error("Failed to create JWT: {0}")]
    SigningFailed(String),

    #[error("JWT iss is required")]
    MissingIssuer,

    #[error("Expected issuer {expected}, got {actual}")]
    IssuerMismatch { expected: String, actual: String },

    #[error("no_suitable_keys: DID document for {did} has no keys suitable for {alg}")]
    NoSuitableKeys { did: String, alg: String },

    #[error("invalid_signature: {0}")]
    SignatureInvalid(String),

    #[error("JWT has expired: exp: {exp} < now: {now}")]
    Expired { exp: i64, now: i64 },

    #[error("JWT not valid yet: {0}")]
    NotYetValid(String),

    #[error("JWT audience is required but no expected audience was configured")]
    AudienceRequired,

    #[error("JWT audience does not match: expected {0}")]
    AudienceMismatch(String),

    #[error("DID resolution failed: {0}")]
    Resolution(#[from] DidResolutionError),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
