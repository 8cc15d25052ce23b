use ack_jwt::JwtError;
use ack_vc::CredentialError;

/// Payment request and receipt errors.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The payment request does not satisfy the PaymentRequest schema.
    #[error("Invalid payment request: {0}")]
    InvalidPaymentRequest(String),

    #[error("{0}")]
    InvalidPaymentRequestToken(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Failed to sign payment request: {0}")]
    Signing(#[from] JwtError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaymentError {
    pub(crate) fn invalid_token() -> Self {
        Self::InvalidPaymentRequestToken("Invalid payment request token".into())
    }
}
