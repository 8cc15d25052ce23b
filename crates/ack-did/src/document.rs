use ack_keys::public_key::multibase_to_public_key;
use ack_keys::{KeyCurve, PublicKeyJwk};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DidResolutionError;

/// A verification method within a DID Document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Verification method identifier (e.g. "did:web:example.com#jwk-1").
    pub id: String,
    /// Method type (e.g. "JsonWebKey2020", "Multikey").
    #[serde(rename = "type")]
    pub method_type: String,
    /// The DID that controls this verification method.
    pub controller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,
    /// CAIP-10 account id, for did:pkh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_account_id: Option<String>,
}

impl VerificationMethod {
    /// Decode the embedded public key, if the method carries one.
    ///
    /// Returns `Ok(None)` for account-only methods (`blockchainAccountId`).
    pub fn public_key(&self) -> Result<Option<(Vec<u8>, KeyCurve)>, DidResolutionError> {
        if let Some(jwk) = &self.public_key_jwk {
            return Ok(Some(jwk.to_public_key()?));
        }
        if let Some(multibase) = &self.public_key_multibase {
            let fallback = match self.method_type.as_str() {
                "Ed25519VerificationKey2020" | "Ed25519VerificationKey2018" => {
                    Some(KeyCurve::Ed25519)
                }
                "EcdsaSecp256k1VerificationKey2019" => Some(KeyCurve::Secp256k1),
                "EcdsaSecp256r1VerificationKey2019" => Some(KeyCurve::Secp256r1),
                _ => None,
            };
            return Ok(Some(multibase_to_public_key(multibase, fallback)?));
        }
        Ok(None)
    }
}

/// A service endpoint in a DID Document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service identifier (e.g. "did:web:agent.example.com#agent-card").
    pub id: String,
    /// Service type (e.g. "AgentCard").
    #[serde(rename = "type")]
    pub service_type: String,
    /// Endpoint URL or structured endpoint.
    pub service_endpoint: serde_json::Value,
}

impl Service {
    pub fn new(id: impl Into<String>, service_type: impl Into<String>, endpoint: &str) -> Self {
        Self {
            id: id.into(),
            service_type: service_type.into(),
            service_endpoint: serde_json::Value::String(endpoint.to_string()),
        }
    }
}

/// Entry of a verification relationship: either an id reference or an
/// embedded verification method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerificationReference {
    Reference(String),
    Embedded(VerificationMethod),
}

impl VerificationReference {
    pub fn id(&self) -> &str {
        match self {
            Self::Reference(id) => id,
            Self::Embedded(vm) => &vm.id,
        }
    }
}

impl From<String> for VerificationReference {
    fn from(id: String) -> Self {
        Self::Reference(id)
    }
}

/// W3C DID Document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context", deserialize_with = "one_or_many", default)]
    pub context: Vec<String>,
    /// The DID subject.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<Vec<String>>,
    #[serde(default)]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<VerificationReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<VerificationReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_delegation: Vec<VerificationReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_invocation: Vec<VerificationReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<Service>>,
}

impl DidDocument {
    /// Look up a verification method by id, accepting relative (`#key-1`) ids.
    pub fn find_verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        let absolute = if id.starts_with('#') {
            format!("{}{}", self.id, id)
        } else {
            id.to_string()
        };
        self.verification_method
            .iter()
            .chain(self.embedded_methods())
            .find(|vm| vm.id == absolute)
    }

    fn embedded_methods(&self) -> impl Iterator<Item = &VerificationMethod> {
        self.authentication
            .iter()
            .chain(self.assertion_method.iter())
            .filter_map(|r| match r {
                VerificationReference::Embedded(vm) => Some(vm),
                VerificationReference::Reference(_) => None,
            })
    }

    /// Methods usable for signing JWTs and credentials: those referenced by
    /// `authentication` or `assertionMethod`, or every method when neither is set.
    pub fn signing_methods(&self) -> Vec<&VerificationMethod> {
        let mut methods: Vec<&VerificationMethod> = Vec::new();
        for reference in self.authentication.iter().chain(self.assertion_method.iter()) {
            let vm = match reference {
                VerificationReference::Embedded(vm) => Some(vm),
                VerificationReference::Reference(id) => self.find_verification_method(id),
            };
            if let Some(vm) = vm {
                if !methods.iter().any(|m| m.id == vm.id) {
                    methods.push(vm);
                }
            }
        }
        if methods.is_empty() {
            methods.extend(self.verification_method.iter());
        }
        methods
    }

    /// Verification method ids must be unique within a document.
    pub fn validate(&self) -> Result<(), DidResolutionError> {
        if !ack_core::DidUri::is_valid(&self.id) {
            return Err(DidResolutionError::InvalidDocument(format!(
                "document id is not a DID: {}",
                self.id
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for vm in &self.verification_method {
            if !seen.insert(vm.id.as_str()) {
                return Err(DidResolutionError::InvalidDocument(format!(
                    "duplicate verification method id: {}",
                    vm.id
                )));
            }
        }
        Ok(())
    }

    /// Find a service by type.
    pub fn find_service(&self, service_type: &str) -> Option<&Service> {
        self.service
            .as_ref()?
            .iter()
            .find(|s| s.service_type == service_type)
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<serde_json::Value>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        // Embedded context objects are not processed.
        OneOrMany::Many(values) => values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    })
}
