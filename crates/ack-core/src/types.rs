use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Decentralized Identifier URI.
/// Format: `did:<method>:<identifier>` with at least three colon-separated segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DidUri(String);

impl DidUri {
    /// Create a new DID URI, validating its shape.
    pub fn new(uri: impl Into<String>) -> Result<Self, CoreError> {
        let uri = uri.into();
        if !Self::is_valid(&uri) {
            return Err(CoreError::InvalidDid(format!(
                "DID must have format 'did:<method>:<identifier>', got: {}",
                uri
            )));
        }
        Ok(Self(uri))
    }

    /// Whether a string is a syntactically valid DID URI.
    pub fn is_valid(uri: &str) -> bool {
        uri.starts_with("did:") && uri.split(':').count() >= 3
    }

    /// Build a DID URI from method and method-specific identifier.
    pub fn from_parts(method: &str, identifier: &str) -> Self {
        Self(format!("did:{}:{}", method, identifier))
    }

    /// Get the full DID URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the method name (`key`, `web`, `pkh`, ...).
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Extract the method-specific identifier (everything after `did:<method>:`).
    pub fn identifier(&self) -> &str {
        self.0.splitn(3, ':').nth(2).unwrap_or_default()
    }

    /// The DID without any fragment (`#...`) or query (`?...`) component.
    pub fn without_fragment(&self) -> &str {
        self.0
            .split(['#', '?'])
            .next()
            .unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for DidUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DidUri {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DidUri {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DidUri> for String {
    fn from(did: DidUri) -> Self {
        did.0
    }
}

impl AsRef<str> for DidUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DidUri {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DidUri {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
