/// DID construction and resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum DidResolutionError {
    #[error("invalidDid: {0}")]
    InvalidDid(String),

    #[error("notFound: {0}")]
    NotFound(String),

    #[error("networkError: {0}")]
    NetworkError(String),

    #[error("unsupportedDidMethod: {0}")]
    UnsupportedMethod(String),

    #[error("invalid DID document: {0}")]
    InvalidDocument(String),

    #[error("key error: {0}")]
    Key(#[from] ack_keys::KeyError),
}

impl From<ack_core::CoreError> for DidResolutionError {
    fn from(err: ack_core::CoreError) -> Self {
        Self::InvalidDid(err.to_string())
    }
}
