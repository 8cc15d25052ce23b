//! ACK Core: shared identifier types, errors, and configuration for the
//! Agent Commerce Kit trust layer.

pub mod caip;
pub mod config;
pub mod error;
pub mod types;

pub use caip::{Caip10AccountId, Caip19AssetId, Caip19AssetType, Caip2ChainId};
pub use config::{AckConfig, HandshakeConfig, LoggingConfig, ResolverConfig};
pub use error::CoreError;
pub use types::DidUri;
