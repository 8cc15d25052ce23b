//! did:pkh: the identifier is a CAIP-10 blockchain account id. Documents are
//! synthesized from the account alone.

use ack_core::{Caip10AccountId, Caip2ChainId, DidUri};
use ack_keys::{KeyCurve, PublicKeyJwk};

use crate::create::{create_did_document, CreateDidDocumentOptions};
use crate::document::{DidDocument, VerificationMethod};
use crate::error::DidResolutionError;

const ED25519_CONTEXTS: [&str; 3] = [
    "https://w3id.org/security#blockchainAccountId",
    "https://w3id.org/security#publicKeyJwk",
    "https://w3id.org/security/suites/ed25519-2020/v1",
];

const SECP256K1_RECOVERY_CONTEXTS: [&str; 2] = [
    "https://w3id.org/security#blockchainAccountId",
    "https://identity.foundation/EcdsaSecp256k1RecoverySignature2020#EcdsaSecp256k1RecoveryMethod2020",
];

/// Split a CAIP-10 account id into `(namespace, reference, address)`.
pub fn caip10_parts(account_id: &str) -> Result<(String, String, String), DidResolutionError> {
    let account: Caip10AccountId = account_id.parse()?;
    Ok((
        account.namespace().to_string(),
        account.reference().to_string(),
        account.address().to_string(),
    ))
}

/// Split a did:pkh into `["did", "pkh", namespace, reference, address]`.
pub fn did_pkh_parts(did: &str) -> Result<[String; 5], DidResolutionError> {
    let account = did
        .strip_prefix("did:pkh:")
        .ok_or_else(|| DidResolutionError::InvalidDid(format!("Invalid did:pkh URI: {}", did)))?;
    let (namespace, reference, address) = caip10_parts(account)
        .map_err(|_| DidResolutionError::InvalidDid(format!("Invalid did:pkh URI: {}", did)))?;
    Ok(["did".into(), "pkh".into(), namespace, reference, address])
}

pub fn is_did_pkh_uri(did: &str) -> bool {
    did_pkh_parts(did).is_ok()
}

/// The account address of a did:pkh.
pub fn address_from_did_pkh_uri(did: &str) -> Result<String, DidResolutionError> {
    let [_, _, _, _, address] = did_pkh_parts(did)?;
    Ok(address)
}

/// Build `did:pkh:{chain_id}:{address}`.
pub fn create_did_pkh_uri(chain_id: &Caip2ChainId, address: &str) -> Result<DidUri, DidResolutionError> {
    let account = Caip10AccountId::new(chain_id.clone(), address)?;
    Ok(DidUri::from_parts("pkh", &account.to_string()))
}

fn solana_public_key(namespace: &str, address: &str) -> Option<Vec<u8>> {
    if !namespace.starts_with("solana") {
        return None;
    }
    bs58::decode(address)
        .into_vec()
        .ok()
        .filter(|bytes| bytes.len() == 32)
}

fn create_pkh_verification_method(
    did: &DidUri,
    account: &Caip10AccountId,
) -> Result<(VerificationMethod, &'static [&'static str]), DidResolutionError> {
    if let Some(public_key) = solana_public_key(account.namespace(), account.address()) {
        let vm = VerificationMethod {
            id: format!("{}#controller", did),
            method_type: "Ed25519VerificationKey2020".into(),
            controller: did.to_string(),
            public_key_jwk: Some(PublicKeyJwk::from_public_key(&public_key, KeyCurve::Ed25519)?),
            public_key_multibase: None,
            blockchain_account_id: Some(account.to_string()),
        };
        return Ok((vm, &ED25519_CONTEXTS));
    }

    let vm = VerificationMethod {
        id: format!("{}#blockchainAccountId", did),
        method_type: "EcdsaSecp256k1RecoveryMethod2020".into(),
        controller: did.to_string(),
        public_key_jwk: None,
        public_key_multibase: None,
        blockchain_account_id: Some(account.to_string()),
    };
    Ok((vm, &SECP256K1_RECOVERY_CONTEXTS))
}

/// Synthesize the DID document for a did:pkh. No network access.
pub fn create_did_pkh_document(
    did: &str,
    controller: Option<DidUri>,
) -> Result<DidDocument, DidResolutionError> {
    did_pkh_parts(did)?;
    let did = DidUri::new(did)?;
    let account: Caip10AccountId = did.identifier().parse()?;
    let (vm, contexts) = create_pkh_verification_method(&did, &account)?;
    let vm_id = vm.id.clone();

    let mut options = CreateDidDocumentOptions::with_verification_method(did, vm)
        .additional_contexts(contexts.iter().map(|c| c.to_string()).collect())
        .capability_delegation(vec![vm_id.clone()])
        .capability_invocation(vec![vm_id]);
    if let Some(controller) = controller {
        options = options.controller(controller);
    }
    create_did_document(options)
}
