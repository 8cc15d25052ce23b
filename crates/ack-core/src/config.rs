//! Configuration for resolvers, handshakes, and logging.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreError;

/// Full configuration for an ACK-enabled agent or service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AckConfig {
    /// DID resolution settings.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Agent handshake settings.
    #[serde(default)]
    pub handshake: HandshakeConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Hosts that did:web may reach over plain HTTP.
    #[serde(default = "default_allowed_http_hosts")]
    pub allowed_http_hosts: Vec<String>,
    /// Lifetime of cached DID documents in seconds (0 = never expire).
    #[serde(default)]
    pub cache_ttl_secs: u64,
    /// Timeout for did:web and JWKS fetches.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Fall back to `/.well-known/jwks.json` when a did:web host has no DID document.
    #[serde(default = "default_true")]
    pub jwks_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfig {
    /// Lifetime of handshake and signed-message JWTs, in seconds.
    #[serde(default = "default_expires_in_secs")]
    pub expires_in_secs: u64,
    /// DIDs whose credentials are accepted during a handshake.
    #[serde(default)]
    pub trusted_issuers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_allowed_http_hosts() -> Vec<String> {
    vec!["localhost".into(), "127.0.0.1".into(), "0.0.0.0".into()]
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_expires_in_secs() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            allowed_http_hosts: default_allowed_http_hosts(),
            cache_ttl_secs: 0,
            request_timeout_secs: default_request_timeout_secs(),
            jwks_fallback: true,
        }
    }
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            expires_in_secs: default_expires_in_secs(),
            trusted_issuers: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AckConfig {
    /// Load config from a TOML file, falling back to defaults when the file
    /// is absent or fields are missing.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
