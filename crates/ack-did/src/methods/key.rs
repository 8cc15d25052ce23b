//! did:key: the public key is encoded directly in the identifier as a
//! multicodec-prefixed base58btc multibase value.

use ack_core::DidUri;
use ack_keys::public_key::{multibase_to_public_key, public_key_to_multibase};
use ack_keys::{KeyCurve, Keypair};

use crate::create::{create_did_document, CreateDidDocumentOptions};
use crate::document::{DidDocument, VerificationMethod};
use crate::error::DidResolutionError;

/// Derive the did:key for a public key.
pub fn create_did_key_uri_from_public_key(
    public_key: &[u8],
    curve: KeyCurve,
) -> Result<DidUri, DidResolutionError> {
    let fingerprint = public_key_to_multibase(public_key, curve)?;
    Ok(DidUri::from_parts("key", &fingerprint))
}

/// Derive the did:key for a key pair.
pub fn create_did_key_uri(keypair: &Keypair) -> Result<DidUri, DidResolutionError> {
    create_did_key_uri_from_public_key(keypair.public_key(), keypair.curve())
}

/// Extract the public key (uncompressed for EC curves) and curve from a did:key.
pub fn did_key_to_public_key(did: &str) -> Result<(Vec<u8>, KeyCurve), DidResolutionError> {
    let did = DidUri::new(did)?;
    if did.method() != "key" {
        return Err(DidResolutionError::InvalidDid(did.to_string()));
    }
    let fingerprint = did.without_fragment().trim_start_matches("did:key:");
    if !fingerprint.starts_with('z') {
        return Err(DidResolutionError::InvalidDid(format!(
            "did:key identifier must be base58btc multibase: {}",
            did
        )));
    }
    multibase_to_public_key(fingerprint, None)
        .map_err(|e| DidResolutionError::InvalidDid(format!("{}: {}", did, e)))
}

/// Synthesize the DID document for a did:key. No network access.
pub fn create_did_key_document(did: &str) -> Result<DidDocument, DidResolutionError> {
    let (public_key, curve) = did_key_to_public_key(did)?;
    let did = DidUri::new(did.split('#').next().unwrap_or(did))?;
    let fingerprint = did.identifier().to_string();

    let vm = VerificationMethod {
        id: format!("{}#{}", did, fingerprint),
        method_type: "Multikey".into(),
        controller: did.to_string(),
        public_key_jwk: None,
        public_key_multibase: Some(public_key_to_multibase(&public_key, curve)?),
        blockchain_account_id: None,
    };
    create_did_document(CreateDidDocumentOptions::with_verification_method(did, vm))
}
