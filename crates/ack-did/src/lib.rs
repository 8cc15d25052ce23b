//! ACK DID Layer
//!
//! Provides decentralized identifier primitives for agents and services:
//! - DID URI helpers and W3C DID Documents
//! - Document construction from keys and blockchain accounts
//! - did:key, did:web, did:pkh and JWKS-backed did:web methods
//! - A caching resolver that dispatches on DID method

pub mod create;
pub mod document;
pub mod error;
pub mod methods;
pub mod resolver;

pub use ack_core::DidUri;
pub use create::{
    create_did_document, create_did_document_from_keypair, create_verification_method,
    CreateDidDocumentOptions,
};
pub use document::{DidDocument, Service, VerificationMethod, VerificationReference};
pub use error::DidResolutionError;
pub use methods::jwks::{create_did_jwks_document, JwkSet};
pub use methods::key::{
    create_did_key_document, create_did_key_uri, create_did_key_uri_from_public_key, did_key_to_public_key,
};
pub use methods::pkh::{
    address_from_did_pkh_uri, caip10_parts, create_did_pkh_document, create_did_pkh_uri,
    did_pkh_parts, is_did_pkh_uri,
};
pub use methods::web::{
    create_did_web_document, create_did_web_document_from_keypair, create_did_web_uri, did_web_jwks_url,
    did_web_to_url,
};
pub use resolver::{
    CompositeDidResolver, ControlledDocument, DidResolver, JwksDidResolver, KeyDidResolver, PkhDidResolver,
    UniversalDidResolver, WebDidResolver,
};

/// Whether a string is a DID URI: starts with `did:` and has at least three
/// colon-separated segments.
pub fn is_did_uri(value: &str) -> bool {
    DidUri::is_valid(value)
}
