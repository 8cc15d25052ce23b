use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ack_core::{DidUri, ResolverConfig};
use async_trait::async_trait;
use dashmap::DashMap;

use crate::document::DidDocument;
use crate::error::DidResolutionError;
use crate::methods::jwks::{create_did_jwks_document, JwkSet};
use crate::methods::key::create_did_key_document;
use crate::methods::pkh::create_did_pkh_document;
use crate::methods::web::{did_web_jwks_url, did_web_to_url};

/// Trait for resolving DIDs to their documents.
#[async_trait]
pub trait DidResolver: Send + Sync {
    /// Resolve a DID URI to its DID Document.
    async fn resolve(&self, did: &str) -> Result<DidDocument, DidResolutionError>;

    /// Resolve a DID and, when its document names a `controller`, the
    /// controller's document as well.
    async fn resolve_with_controller(
        &self,
        did: &str,
    ) -> Result<ControlledDocument, DidResolutionError> {
        let document = self.resolve(did).await?;
        let controller = match &document.controller {
            Some(controller) => Some(self.resolve(controller).await?),
            None => None,
        };
        Ok(ControlledDocument {
            document,
            controller,
        })
    }
}

/// A resolved document together with its controller's document.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlledDocument {
    pub document: DidDocument,
    pub controller: Option<DidDocument>,
}

fn strip_fragment(did: &str) -> &str {
    did.split(['#', '?']).next().unwrap_or(did)
}

/// Resolves did:key by decoding the identifier. No network access.
#[derive(Debug, Default, Clone)]
pub struct KeyDidResolver;

#[async_trait]
impl DidResolver for KeyDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, DidResolutionError> {
        create_did_key_document(strip_fragment(did))
    }
}

/// Resolves did:pkh by synthesizing the document from the account id.
#[derive(Debug, Default, Clone)]
pub struct PkhDidResolver;

#[async_trait]
impl DidResolver for PkhDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, DidResolutionError> {
        create_did_pkh_document(strip_fragment(did), None)
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    did: &str,
    url: url::Url,
) -> Result<T, DidResolutionError> {
    tracing::debug!(did = did, url = %url, "fetching");
    let response = client
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| DidResolutionError::NetworkError(format!("{}: {}", url, e)))?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(DidResolutionError::NotFound(did.to_string()));
    }
    if !status.is_success() {
        return Err(DidResolutionError::NetworkError(format!("{}: HTTP {}", url, status)));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| DidResolutionError::InvalidDocument(format!("{}: {}", url, e)))
}

/// Resolves did:web by fetching the hosted `did.json`.
#[derive(Debug, Clone)]
pub struct WebDidResolver {
    client: reqwest::Client,
    allowed_http_hosts: Vec<String>,
}

impl WebDidResolver {
    /// Create a resolver with its own HTTP client and request timeout.
    pub fn new(allowed_http_hosts: Vec<String>, timeout: Duration) -> Result<Self, DidResolutionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DidResolutionError::NetworkError(e.to_string()))?;
        Ok(Self::with_client(client, allowed_http_hosts))
    }

    /// Create a resolver that shares an existing HTTP client.
    pub fn with_client(client: reqwest::Client, allowed_http_hosts: Vec<String>) -> Self {
        Self {
            client,
            allowed_http_hosts,
        }
    }
}

#[async_trait]
impl DidResolver for WebDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, DidResolutionError> {
        let did = strip_fragment(did);
        let url = did_web_to_url(did, &self.allowed_http_hosts)?;
        let document: DidDocument = fetch_json(&self.client, did, url).await?;
        if document.id != did {
            return Err(DidResolutionError::InvalidDocument(format!(
                "document id {} does not match {}",
                document.id, did
            )));
        }
        document.validate()?;
        Ok(document)
    }
}

/// Resolves did:web (and did:jwks) from the origin's `/.well-known/jwks.json`.
#[derive(Debug, Clone)]
pub struct JwksDidResolver {
    client: reqwest::Client,
    allowed_http_hosts: Vec<String>,
}

impl JwksDidResolver {
    pub fn new(allowed_http_hosts: Vec<String>, timeout: Duration) -> Result<Self, DidResolutionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DidResolutionError::NetworkError(e.to_string()))?;
        Ok(Self::with_client(client, allowed_http_hosts))
    }

    pub fn with_client(client: reqwest::Client, allowed_http_hosts: Vec<String>) -> Self {
        Self {
            client,
            allowed_http_hosts,
        }
    }
}

#[async_trait]
impl DidResolver for JwksDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, DidResolutionError> {
        let did = strip_fragment(did);
        let url = did_web_jwks_url(did, &self.allowed_http_hosts)?;
        let jwks: JwkSet = fetch_json(&self.client, did, url).await?;
        create_did_jwks_document(did, &jwks)
    }
}

/// Composite resolver that tries multiple resolvers in order.
///
/// Returns the first successful resolution, or the last error.
pub struct CompositeDidResolver {
    resolvers: Vec<Box<dyn DidResolver>>,
}

impl CompositeDidResolver {
    /// Create a new composite resolver with no backends.
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Add a resolver to the chain.
    pub fn add_resolver(&mut self, resolver: Box<dyn DidResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn with_resolver(mut self, resolver: Box<dyn DidResolver>) -> Self {
        self.add_resolver(resolver);
        self
    }

    /// Number of registered resolvers.
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

impl Default for CompositeDidResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DidResolver for CompositeDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, DidResolutionError> {
        let mut last_error = DidResolutionError::NotFound(format!("no resolvers configured: {}", did));

        for resolver in &self.resolvers {
            match resolver.resolve(did).await {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    tracing::debug!(did = did, error = %e, "resolver failed, trying next");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

struct CacheEntry {
    document: DidDocument,
    inserted_at: Instant,
    /// Pinned entries were added explicitly and never expire.
    pinned: bool,
}

/// Dispatches on the DID method and caches resolved documents.
///
/// The cache can be pre-seeded with [`UniversalDidResolver::add_to_cache`] for
/// counterparties whose documents are known ahead of time.
pub struct UniversalDidResolver {
    methods: HashMap<String, Arc<dyn DidResolver>>,
    cache: DashMap<String, CacheEntry>,
    cache_ttl: Option<Duration>,
}

impl UniversalDidResolver {
    /// A resolver with no methods registered and an unbounded cache.
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
            cache: DashMap::new(),
            cache_ttl: None,
        }
    }

    /// did:key, did:pkh, did:web and did:jwks with the given settings.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, DidResolutionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DidResolutionError::NetworkError(e.to_string()))?;
        let hosts = config.allowed_http_hosts.clone();

        let web: Arc<dyn DidResolver> = if config.jwks_fallback {
            Arc::new(
                CompositeDidResolver::new()
                    .with_resolver(Box::new(WebDidResolver::with_client(client.clone(), hosts.clone())))
                    .with_resolver(Box::new(JwksDidResolver::with_client(client.clone(), hosts.clone()))),
            )
        } else {
            Arc::new(WebDidResolver::with_client(client.clone(), hosts.clone()))
        };

        let ttl = (config.cache_ttl_secs > 0).then(|| Duration::from_secs(config.cache_ttl_secs));
        Ok(Self::new()
            .with_method("key", Arc::new(KeyDidResolver))
            .with_method("pkh", Arc::new(PkhDidResolver))
            .with_method("web", web)
            .with_method("jwks", Arc::new(JwksDidResolver::with_client(client, hosts)))
            .with_cache_ttl(ttl))
    }

    /// Register (or replace) the resolver for a DID method.
    pub fn with_method(mut self, method: &str, resolver: Arc<dyn DidResolver>) -> Self {
        self.methods.insert(method.to_string(), resolver);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self.methods.keys().cloned().collect();
        methods.sort();
        methods
    }

    /// Pre-seed the cache with a trusted document. Seeded entries never expire.
    pub fn add_to_cache(&self, did: &str, document: DidDocument) {
        self.cache.insert(
            strip_fragment(did).to_string(),
            CacheEntry {
                document,
                inserted_at: Instant::now(),
                pinned: true,
            },
        );
    }

    pub fn remove_from_cache(&self, did: &str) -> Option<DidDocument> {
        self.cache
            .remove(strip_fragment(did))
            .map(|(_, entry)| entry.document)
    }

    /// Drop expired entries, returning how many were removed.
    pub fn evict_expired(&self) -> usize {
        let before = self.cache.len();
        self.cache.retain(|_, entry| !self.is_expired(entry));
        before - self.cache.len()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        match self.cache_ttl {
            Some(ttl) if !entry.pinned => entry.inserted_at.elapsed() >= ttl,
            _ => false,
        }
    }

    fn cached(&self, did: &str) -> Option<DidDocument> {
        let entry = self.cache.get(did)?;
        if self.is_expired(&entry) {
            drop(entry);
            self.cache.remove(did);
            return None;
        }
        Some(entry.document.clone())
    }
}

impl Default for UniversalDidResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DidResolver for UniversalDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, DidResolutionError> {
        let did = strip_fragment(did);
        if let Some(document) = self.cached(did) {
            tracing::debug!(did = did, "DID document cache hit");
            return Ok(document);
        }

        let parsed = DidUri::new(did)?;
        let resolver = self
            .methods
            .get(parsed.method())
            .ok_or_else(|| DidResolutionError::UnsupportedMethod(parsed.method().to_string()))?;
        let document = resolver.resolve(did).await?;

        self.cache.insert(
            did.to_string(),
            CacheEntry {
                document: document.clone(),
                inserted_at: Instant::now(),
                pinned: false,
            },
        );
        tracing::debug!(did = did, method = parsed.method(), "DID resolved");
        Ok(document)
    }
}
