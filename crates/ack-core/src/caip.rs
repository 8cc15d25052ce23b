//! Chain-agnostic identifiers (CAIP-2 chains, CAIP-10 accounts, CAIP-19 assets).
//!
//! ```text
//! chain_id:      namespace ":" reference            [a-z0-9]{3,8} ":" [-_a-zA-Z0-9]{1,32}
//! account_id:    chain_id ":" address                address = [-.%a-zA-Z0-9]{1,128}
//! asset_type:    chain_id "/" asset_ns ":" asset_ref [-a-z0-9]{3,8} ":" [-.%a-zA-Z0-9]{1,128}
//! asset_id:      asset_type "/" token_id             token_id = [-.%a-zA-Z0-9]{1,78}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Well-known CAIP-2 chain ids.
pub mod chains {
    pub const ETHEREUM_MAINNET: &str = "eip155:1";
    pub const ETHEREUM_SEPOLIA: &str = "eip155:11155111";
    pub const BASE_MAINNET: &str = "eip155:8453";
    pub const BASE_SEPOLIA: &str = "eip155:84532";
    pub const ARBITRUM_MAINNET: &str = "eip155:42161";
    pub const ARBITRUM_SEPOLIA: &str = "eip155:421614";
    pub const SOLANA_MAINNET: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";
    pub const SOLANA_DEVNET: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";
}

fn in_range(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len())
}

fn is_chain_namespace(s: &str) -> bool {
    in_range(s, 3, 8) && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

fn is_chain_reference(s: &str) -> bool {
    in_range(s, 1, 32) && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn is_account_chars(s: &str, max: usize) -> bool {
    in_range(s, 1, max)
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'%'))
}

fn is_asset_namespace(s: &str) -> bool {
    in_range(s, 3, 8)
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// CAIP-2 blockchain id, e.g. `eip155:8453`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Caip2ChainId {
    namespace: String,
    reference: String,
}

impl Caip2ChainId {
    pub fn new(namespace: &str, reference: &str) -> Result<Self, CoreError> {
        if !is_chain_namespace(namespace) || !is_chain_reference(reference) {
            return Err(CoreError::InvalidChainId(format!("{}:{}", namespace, reference)));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            reference: reference.to_string(),
        })
    }

    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl FromStr for Caip2ChainId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, reference) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidChainId(s.to_string()))?;
        Self::new(namespace, reference).map_err(|_| CoreError::InvalidChainId(s.to_string()))
    }
}

impl fmt::Display for Caip2ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl TryFrom<String> for Caip2ChainId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Caip2ChainId> for String {
    fn from(id: Caip2ChainId) -> Self {
        id.to_string()
    }
}

/// CAIP-10 account id, e.g. `eip155:1:0xab16a96D359eC26a11e2C2b3d8f8B8942d5Bfcdb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Caip10AccountId {
    chain_id: Caip2ChainId,
    address: String,
}

impl Caip10AccountId {
    pub fn new(chain_id: Caip2ChainId, address: &str) -> Result<Self, CoreError> {
        if !is_account_chars(address, 128) {
            return Err(CoreError::InvalidAccountId(format!("{}:{}", chain_id, address)));
        }
        Ok(Self {
            chain_id,
            address: address.to_string(),
        })
    }

    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }

    pub fn chain_id(&self) -> &Caip2ChainId {
        &self.chain_id
    }

    pub fn namespace(&self) -> &str {
        self.chain_id.namespace()
    }

    pub fn reference(&self) -> &str {
        self.chain_id.reference()
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl FromStr for Caip10AccountId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidAccountId(s.to_string());
        let mut parts = s.splitn(3, ':');
        let namespace = parts.next().ok_or_else(invalid)?;
        let reference = parts.next().ok_or_else(invalid)?;
        let address = parts.next().ok_or_else(invalid)?;
        let chain_id = Caip2ChainId::new(namespace, reference).map_err(|_| invalid())?;
        Self::new(chain_id, address).map_err(|_| invalid())
    }
}

impl fmt::Display for Caip10AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

impl TryFrom<String> for Caip10AccountId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Caip10AccountId> for String {
    fn from(id: Caip10AccountId) -> Self {
        id.to_string()
    }
}

/// CAIP-19 asset type, e.g. `eip155:1/erc20:0xa0b8...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Caip19AssetType {
    chain_id: Caip2ChainId,
    asset_namespace: String,
    asset_reference: String,
}

impl Caip19AssetType {
    pub fn chain_id(&self) -> &Caip2ChainId {
        &self.chain_id
    }

    pub fn asset_namespace(&self) -> &str {
        &self.asset_namespace
    }

    pub fn asset_reference(&self) -> &str {
        &self.asset_reference
    }

    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }
}

impl FromStr for Caip19AssetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidAssetId(s.to_string());
        let (chain, asset_name) = s.split_once('/').ok_or_else(invalid)?;
        let chain_id: Caip2ChainId = chain.parse().map_err(|_| invalid())?;
        let (asset_namespace, asset_reference) = asset_name.split_once(':').ok_or_else(invalid)?;
        if !is_asset_namespace(asset_namespace) || !is_account_chars(asset_reference, 128) {
            return Err(invalid());
        }
        Ok(Self {
            chain_id,
            asset_namespace: asset_namespace.to_string(),
            asset_reference: asset_reference.to_string(),
        })
    }
}

impl fmt::Display for Caip19AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}",
            self.chain_id, self.asset_namespace, self.asset_reference
        )
    }
}

impl TryFrom<String> for Caip19AssetType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Caip19AssetType> for String {
    fn from(id: Caip19AssetType) -> Self {
        id.to_string()
    }
}

/// CAIP-19 asset id: an asset type plus a token id (NFTs and similar).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Caip19AssetId {
    asset_type: Caip19AssetType,
    token_id: String,
}

impl Caip19AssetId {
    pub fn asset_type(&self) -> &Caip19AssetType {
        &self.asset_type
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }
}

impl FromStr for Caip19AssetId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidAssetId(s.to_string());
        let (asset_type, token_id) = s.rsplit_once('/').ok_or_else(invalid)?;
        if !is_account_chars(token_id, 78) {
            return Err(invalid());
        }
        Ok(Self {
            asset_type: asset_type.parse().map_err(|_| invalid())?,
            token_id: token_id.to_string(),
        })
    }
}

impl fmt::Display for Caip19AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asset_type, self.token_id)
    }
}

impl TryFrom<String> for Caip19AssetId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Caip19AssetId> for String {
    fn from(id: Caip19AssetId) -> Self {
        id.to_string()
    }
}
