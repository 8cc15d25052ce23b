//! JWKS-backed did:web. Origins that only publish `/.well-known/jwks.json`
//! get a DID document synthesized from their key set.

use ack_core::DidUri;
use ack_keys::PublicKeyJwk;
use serde::{Deserialize, Serialize};

use crate::create::{DID_CONTEXT, JWK_CONTEXT};
use crate::document::{DidDocument, VerificationMethod, VerificationReference};
use crate::error::DidResolutionError;

/// A JSON Web Key Set. Keys are kept as raw JSON so unsupported key types
/// (RSA, symmetric) can be skipped instead of failing the whole set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<serde_json::Value>,
}

impl JwkSet {
    /// The EC/OKP keys of the set that this toolkit can verify with.
    pub fn supported_keys(&self) -> Vec<PublicKeyJwk> {
        self.keys
            .iter()
            .filter_map(|value| serde_json::from_value::<PublicKeyJwk>(value.clone()).ok())
            .filter(|jwk| jwk.to_public_key().is_ok())
            .collect()
    }
}

/// Build a DID document whose verification methods are the keys of a JWKS.
///
/// Each key becomes a `JsonWebKey2020` method `{did}#{kid}` (or `{did}#{index}`
/// when the key has no `kid`) referenced from `authentication` and `assertionMethod`.
pub fn create_did_jwks_document(did: &str, jwks: &JwkSet) -> Result<DidDocument, DidResolutionError> {
    let did = DidUri::new(did)?;
    let keys = jwks.supported_keys();
    if keys.is_empty() {
        return Err(DidResolutionError::InvalidDocument(format!(
            "JWKS for {} has no supported keys",
            did
        )));
    }

    let verification_method: Vec<VerificationMethod> = keys
        .into_iter()
        .enumerate()
        .map(|(index, jwk)| {
            let fragment = jwk.kid.clone().unwrap_or_else(|| index.to_string());
            VerificationMethod {
                id: format!("{}#{}", did, fragment),
                method_type: "JsonWebKey2020".into(),
                controller: did.to_string(),
                public_key_jwk: Some(jwk),
                public_key_multibase: None,
                blockchain_account_id: None,
            }
        })
        .collect();

    let references: Vec<VerificationReference> = verification_method
        .iter()
        .map(|vm| VerificationReference::Reference(vm.id.clone()))
        .collect();

    let document = DidDocument {
        context: vec![DID_CONTEXT.to_string(), JWK_CONTEXT.to_string()],
        id: did.to_string(),
        controller: None,
        also_known_as: None,
        verification_method,
        authentication: references.clone(),
        assertion_method: references,
        capability_delegation: Vec::new(),
        capability_invocation: Vec::new(),
        service: None,
    };
    document.validate()?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ack_keys::{keypair_to_jwk, KeyCurve, Keypair};

    fn jwks_for(keypairs: &[&Keypair]) -> JwkSet {
        JwkSet {
            keys: keypairs
                .iter()
                .map(|kp| {
                    let jwk = PublicKeyJwk::from_public_key(kp.public_key(), kp.curve()).unwrap();
                    serde_json::to_value(jwk).unwrap()
                })
                .collect(),
        }
    }

    #[test]
    fn test_document_from_jwks() {
        let kp1 = Keypair::generate(KeyCurve::Secp256r1);
        let kp2 = Keypair::generate(KeyCurve::Ed25519);
        let doc = create_did_jwks_document("did:web:auth.example.com", &jwks_for(&[&kp1, &kp2]))
            .unwrap();

        assert_eq!(doc.verification_method.len(), 2);
        assert_eq!(doc.verification_method[0].id, "did:web:auth.example.com#0");
        assert_eq!(doc.authentication.len(), 2);
        let (bytes, curve) = doc.verification_method[1].public_key().unwrap().unwrap();
        assert_eq!(curve, KeyCurve::Ed25519);
        assert_eq!(bytes, kp2.public_key());
    }

    #[test]
    fn test_kid_becomes_fragment() {
        let kp = Keypair::generate(KeyCurve::Secp256k1);
        let mut jwk = PublicKeyJwk::from_public_key(kp.public_key(), kp.curve()).unwrap();
        jwk.kid = Some("signing-2024".into());
        let jwks = JwkSet {
            keys: vec![serde_json::to_value(jwk).unwrap()],
        };
        let doc = create_did_jwks_document("did:jwks:auth.example.com", &jwks).unwrap();
        assert_eq!(doc.verification_method[0].id, "did:jwks:auth.example.com#signing-2024");
    }

    #[test]
    fn test_unsupported_keys_skipped() {
        let kp = Keypair::generate(KeyCurve::Ed25519);
        let mut jwks = jwks_for(&[&kp]);
        jwks.keys.insert(0, serde_json::json!({"kty": "RSA", "n": "abc", "e": "AQAB"}));
        let doc = create_did_jwks_document("did:web:auth.example.com", &jwks).unwrap();
        assert_eq!(doc.verification_method.len(), 1);
    }

    #[test]
    fn test_private_material_is_not_required() {
        let kp = Keypair::generate(KeyCurve::Secp256r1);
        let private = keypair_to_jwk(&kp).unwrap();
        let jwks = JwkSet {
            keys: vec![serde_json::to_value(private.public).unwrap()],
        };
        assert!(create_did_jwks_document("did:web:auth.example.com", &jwks).is_ok());
    }

    #[test]
    fn test_empty_jwks_rejected() {
        let result = create_did_jwks_document("did:web:auth.example.com", &JwkSet::default());
        assert!(matches!(result, Err(DidResolutionError::InvalidDocument(_))));
    }
}
