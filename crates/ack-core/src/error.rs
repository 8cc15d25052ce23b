/// Core identifier and configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid DID format: {0}")]
    InvalidDid(String),

    #[error("invalid CAIP-2 chain id: {0}")]
    InvalidChainId(String),

    #[error("invalid CAIP-10 account id: {0}")]
    InvalidAccountId(String),

    #[error("invalid CAIP-19 asset id: {0}")]
    InvalidAssetId(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
