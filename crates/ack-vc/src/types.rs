use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";
pub const JWT_PROOF_TYPE: &str = "JwtProof2020";

/// Credential issuer. Accepts the bare-string form on input and always
/// serializes as an object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issuer {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Issuer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }
}

impl<'de> Deserialize<'de> for Issuer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct IssuerObject {
            id: String,
            #[serde(flatten)]
            extra: Map<String, Value>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IssuerRepr {
            Id(String),
            Object(IssuerObject),
        }

        Ok(match IssuerRepr::deserialize(deserializer)? {
            IssuerRepr::Id(id) => Issuer::new(id),
            IssuerRepr::Object(o) => Issuer {
                id: o.id,
                extra: o.extra,
            },
        })
    }
}

/// `credentialSubject`: an optional subject id plus the attested claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl CredentialSubject {
    /// The subject as one JSON object, `id` included.
    pub fn to_value(&self) -> Value {
        let mut object = self.claims.clone();
        if let Some(id) = &self.id {
            object.insert("id".into(), Value::String(id.clone()));
        }
        Value::Object(object)
    }
}

/// `credentialStatus`. Bitstring status list entries fill the optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub id: String,
    #[serde(rename = "type")]
    pub status_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_list_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_list_credential: Option<String>,
}

/// A proof attached to a credential or presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Proof {
    pub fn jwt(jwt: impl Into<String>) -> Self {
        Self {
            proof_type: JWT_PROOF_TYPE.into(),
            jwt: Some(jwt.into()),
            extra: Map::new(),
        }
    }
}

/// W3C Verifiable Credential (data model 1.1), unsigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct W3CCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    pub issuer: Issuer,
    pub issuance_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    pub credential_subject: CredentialSubject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_use: Option<Value>,
}

impl W3CCredential {
    pub fn has_type(&self, credential_type: &str) -> bool {
        self.credential_type.iter().any(|t| t == credential_type)
    }
}

/// A credential or presentation together with its proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verifiable<T> {
    #[serde(flatten)]
    pub inner: T,
    pub proof: Proof,
}

impl<T> std::ops::Deref for Verifiable<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

/// W3C Verifiable Presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct W3CPresentation {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub presentation_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub holder: String,
    #[serde(default)]
    pub verifiable_credential: Vec<Verifiable<W3CCredential>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}
