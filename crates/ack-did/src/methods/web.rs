//! did:web: the identifier is a colon-encoded host and path; the document is
//! hosted by that origin.
//!
//! ```text
//! did:web:example.com                    -> https://example.com/.well-known/did.json
//! did:web:example.com%3A8080:agents:bob  -> https://example.com:8080/agents/bob/did.json
//! ```

use ack_core::DidUri;
use ack_keys::{Keypair, PublicKeyEncoding, PublicKeyWithEncoding};
use url::Url;

use crate::create::{create_did_document, CreateDidDocumentOptions};
use crate::document::DidDocument;
use crate::error::DidResolutionError;

/// Build a did:web from an origin URL. Path segments become `:`-separated
/// components and a port is written as `%3A<port>`.
pub fn create_did_web_uri(url: &Url) -> Result<DidUri, DidResolutionError> {
    let host = url
        .host_str()
        .ok_or_else(|| DidResolutionError::InvalidDid(format!("URL has no host: {}", url)))?;
    let mut identifier = match url.port() {
        Some(port) => format!("{}%3A{}", host, port),
        None => host.to_string(),
    };
    if let Some(segments) = url.path_segments() {
        for segment in segments.filter(|s| !s.is_empty()) {
            identifier.push(':');
            identifier.push_str(segment);
        }
    }
    Ok(DidUri::from_parts("web", &identifier))
}

fn did_web_origin(
    did: &str,
    allowed_http_hosts: &[String],
) -> Result<(String, Vec<String>), DidResolutionError> {
    let parsed = DidUri::new(did)?;
    if parsed.method() != "web" && parsed.method() != "jwks" {
        return Err(DidResolutionError::InvalidDid(did.to_string()));
    }
    let identifier = parsed
        .without_fragment()
        .splitn(3, ':')
        .nth(2)
        .unwrap_or_default()
        .to_string();
    let mut parts = identifier.split(':');
    let host = parts
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| DidResolutionError::InvalidDid(did.to_string()))?
        .replace("%3A", ":")
        .replace("%3a", ":");
    let path: Vec<String> = parts.map(str::to_string).collect();
    if path.iter().any(|p| p.is_empty() || p == "..") {
        return Err(DidResolutionError::InvalidDid(did.to_string()));
    }

    let hostname = host.split(':').next().unwrap_or_default();
    let scheme = if allowed_http_hosts.iter().any(|h| h == hostname) {
        "http"
    } else {
        "https"
    };
    Ok((format!("{}://{}", scheme, host), path))
}

/// The URL a did:web document is fetched from. Plain `http` is only used for
/// hosts in `allowed_http_hosts`.
pub fn did_web_to_url(did: &str, allowed_http_hosts: &[String]) -> Result<Url, DidResolutionError> {
    let (origin, path) = did_web_origin(did, allowed_http_hosts)?;
    let url = if path.is_empty() {
        format!("{}/.well-known/did.json", origin)
    } else {
        format!("{}/{}/did.json", origin, path.join("/"))
    };
    Url::parse(&url).map_err(|e| DidResolutionError::InvalidDid(format!("{}: {}", did, e)))
}

/// The JWKS URL for a did:web (or did:jwks) origin.
pub fn did_web_jwks_url(did: &str, allowed_http_hosts: &[String]) -> Result<Url, DidResolutionError> {
    let (origin, path) = did_web_origin(did, allowed_http_hosts)?;
    let url = if path.is_empty() {
        format!("{}/.well-known/jwks.json", origin)
    } else {
        format!("{}/{}/.well-known/jwks.json", origin, path.join("/"))
    };
    Url::parse(&url).map_err(|e| DidResolutionError::InvalidDid(format!("{}: {}", did, e)))
}

/// Build the did:web and its document for a base URL and public key.
pub fn create_did_web_document(
    base_url: &str,
    public_key: PublicKeyWithEncoding,
    controller: Option<DidUri>,
) -> Result<(DidUri, DidDocument), DidResolutionError> {
    let url = Url::parse(base_url)
        .map_err(|e| DidResolutionError::InvalidDid(format!("{}: {}", base_url, e)))?;
    let did = create_did_web_uri(&url)?;
    let mut options = CreateDidDocumentOptions::new(did.clone(), public_key);
    if let Some(controller) = controller {
        options = options.controller(controller);
    }
    Ok((did, create_did_document(options)?))
}

/// Build the did:web and its document for a key pair (JWK encoding unless specified).
pub fn create_did_web_document_from_keypair(
    base_url: &str,
    keypair: &Keypair,
    encoding: Option<PublicKeyEncoding>,
    controller: Option<DidUri>,
) -> Result<(DidUri, DidDocument), DidResolutionError> {
    let public_key =
        ack_keys::encode_public_key_from_keypair(keypair, encoding.unwrap_or(PublicKeyEncoding::Jwk))?;
    create_did_web_document(base_url, public_key, controller)
}
