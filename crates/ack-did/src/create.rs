//! Building DID Documents from public keys.

use ack_core::DidUri;
use ack_keys::encoding::{base58_to_bytes, hex_string_to_bytes};
use ack_keys::public_key::public_key_to_multibase;
use ack_keys::{
    encode_public_key_from_keypair, Keypair, PublicKeyEncoding, PublicKeyValue,
    PublicKeyWithEncoding,
};

use crate::document::{DidDocument, Service, VerificationMethod, VerificationReference};
use crate::error::DidResolutionError;

pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";
pub const MULTIKEY_CONTEXT: &str = "https://w3id.org/security/multikey/v1";
pub const JWK_CONTEXT: &str = "https://w3id.org/security/jwk/v1";

/// Options for [`create_did_document`].
#[derive(Debug, Clone)]
pub struct CreateDidDocumentOptions {
    pub did: DidUri,
    pub public_key: Option<PublicKeyWithEncoding>,
    /// Use this method instead of building one from `public_key`.
    pub verification_method: Option<VerificationMethod>,
    pub controller: Option<DidUri>,
    pub also_known_as: Option<Vec<String>>,
    pub service: Option<Vec<Service>>,
    pub additional_contexts: Vec<String>,
    pub capability_delegation: Option<Vec<String>>,
    pub capability_invocation: Option<Vec<String>>,
}

impl CreateDidDocumentOptions {
    pub fn new(did: DidUri, public_key: PublicKeyWithEncoding) -> Self {
        Self {
            public_key: Some(public_key),
            ..Self::bare(did)
        }
    }

    pub fn with_verification_method(did: DidUri, verification_method: VerificationMethod) -> Self {
        Self {
            verification_method: Some(verification_method),
            ..Self::bare(did)
        }
    }

    /// Options for a key pair's public key (JWK encoding unless specified).
    pub fn from_keypair(
        did: DidUri,
        keypair: &Keypair,
        encoding: Option<PublicKeyEncoding>,
    ) -> Result<Self, DidResolutionError> {
        let public_key =
            encode_public_key_from_keypair(keypair, encoding.unwrap_or(PublicKeyEncoding::Jwk))?;
        Ok(Self::new(did, public_key))
    }

    fn bare(did: DidUri) -> Self {
        Self {
            did,
            public_key: None,
            verification_method: None,
            controller: None,
            also_known_as: None,
            service: None,
            additional_contexts: Vec::new(),
            capability_delegation: None,
            capability_invocation: None,
        }
    }

    pub fn controller(mut self, controller: DidUri) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn also_known_as(mut self, aliases: Vec<String>) -> Self {
        self.also_known_as = Some(aliases);
        self
    }

    pub fn service(mut self, service: Vec<Service>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn additional_contexts(mut self, contexts: Vec<String>) -> Self {
        self.additional_contexts = contexts;
        self
    }

    pub fn capability_delegation(mut self, ids: Vec<String>) -> Self {
        self.capability_delegation = Some(ids);
        self
    }

    pub fn capability_invocation(mut self, ids: Vec<String>) -> Self {
        self.capability_invocation = Some(ids);
        self
    }
}

/// Build a verification method `{did}#{encoding}-1`.
///
/// Legacy `hex` and `base58` keys are re-encoded as multicodec multibase; `jwk` keys
/// become `JsonWebKey2020`, multibase keys become `Multikey`.
pub fn create_verification_method(
    did: &DidUri,
    public_key: &PublicKeyWithEncoding,
) -> Result<VerificationMethod, DidResolutionError> {
    let legacy_bytes = match (&public_key.encoding, &public_key.value) {
        (PublicKeyEncoding::Hex, PublicKeyValue::Text(s)) => Some(hex_string_to_bytes(s)?),
        (PublicKeyEncoding::Base58, PublicKeyValue::Text(s)) => Some(base58_to_bytes(s)?),
        _ => None,
    };

    let mut vm = VerificationMethod {
        id: String::new(),
        method_type: "Multikey".into(),
        controller: did.to_string(),
        public_key_jwk: None,
        public_key_multibase: None,
        blockchain_account_id: None,
    };

    let encoding = match (legacy_bytes, &public_key.value) {
        (Some(bytes), _) => {
            vm.public_key_multibase = Some(public_key_to_multibase(&bytes, public_key.curve)?);
            PublicKeyEncoding::Multibase
        }
        (None, PublicKeyValue::Jwk(jwk)) => {
            vm.method_type = "JsonWebKey2020".into();
            vm.public_key_jwk = Some(jwk.clone());
            PublicKeyEncoding::Jwk
        }
        (None, PublicKeyValue::Text(multibase)) => {
            vm.public_key_multibase = Some(multibase.clone());
            PublicKeyEncoding::Multibase
        }
    };
    vm.id = format!("{}#{}-1", did, encoding);
    Ok(vm)
}

/// Create a DID document around a single verification method.
///
/// The JSON-LD contexts are chosen from the verification method type.
pub fn create_did_document(
    options: CreateDidDocumentOptions,
) -> Result<DidDocument, DidResolutionError> {
    let vm = match (options.verification_method, &options.public_key) {
        (Some(vm), _) => vm,
        (None, Some(public_key)) => create_verification_method(&options.did, public_key)?,
        (None, None) => {
            return Err(DidResolutionError::InvalidDocument(
                "a public key or verification method is required".into(),
            ))
        }
    };

    let vm_context = if vm.method_type == "Multikey" {
        MULTIKEY_CONTEXT
    } else {
        JWK_CONTEXT
    };
    let mut context = vec![DID_CONTEXT.to_string(), vm_context.to_string()];
    context.extend(options.additional_contexts);

    let reference = || vec![VerificationReference::Reference(vm.id.clone())];
    let to_refs = |ids: Option<Vec<String>>| -> Vec<VerificationReference> {
        ids.unwrap_or_default()
            .into_iter()
            .map(VerificationReference::Reference)
            .collect()
    };

    let document = DidDocument {
        context,
        id: options.did.to_string(),
        controller: options.controller.map(String::from),
        also_known_as: options.also_known_as,
        authentication: reference(),
        assertion_method: reference(),
        capability_delegation: to_refs(options.capability_delegation),
        capability_invocation: to_refs(options.capability_invocation),
        service: options.service,
        verification_method: vec![vm],
    };
    document.validate()?;
    Ok(document)
}

/// Create a DID document for a key pair (JWK encoding unless specified).
pub fn create_did_document_from_keypair(
    did: DidUri,
    keypair: &Keypair,
    encoding: Option<PublicKeyEncoding>,
) -> Result<DidDocument, DidResolutionError> {
    create_did_document(CreateDidDocumentOptions::from_keypair(did, keypair, encoding)?)
}
