use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::types::{
    CredentialSubject, Issuer, Verifiable, W3CCredential, W3CPresentation, CREDENTIALS_V1_CONTEXT,
    VERIFIABLE_CREDENTIAL_TYPE, VERIFIABLE_PRESENTATION_TYPE,
};

/// Current time as an RFC 3339 timestamp with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parameters for [`create_credential`].
#[derive(Debug, Clone, Default)]
pub struct CreateCredentialParams {
    pub id: Option<String>,
    /// Credential type appended after `VerifiableCredential`.
    pub credential_type: Option<String>,
    pub issuer: String,
    pub subject: String,
    /// Claims merged into `credentialSubject` next to the subject id.
    pub attestation: Map<String, Value>,
    pub expiration_date: Option<String>,
}

impl CreateCredentialParams {
    pub fn new(issuer: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn credential_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = Some(credential_type.into());
        self
    }

    /// Replace the attestation claims.
    pub fn attestation(mut self, attestation: Map<String, Value>) -> Self {
        self.attestation = attestation;
        self
    }

    /// Add one attestation claim.
    pub fn claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attestation.insert(key.into(), value.into());
        self
    }

    pub fn expiration_date(mut self, expiration_date: impl Into<String>) -> Self {
        self.expiration_date = Some(expiration_date.into());
        self
    }
}

/// Build an unsigned credential issued now.
pub fn create_credential(params: CreateCredentialParams) -> W3CCredential {
    let mut credential_type = vec![VERIFIABLE_CREDENTIAL_TYPE.to_string()];
    if let Some(t) = params.credential_type {
        if t != VERIFIABLE_CREDENTIAL_TYPE {
            credential_type.push(t);
        }
    }

    W3CCredential {
        context: vec![CREDENTIALS_V1_CONTEXT.to_string()],
        id: params.id,
        credential_type,
        issuer: Issuer::new(params.issuer),
        issuance_date: now_iso(),
        expiration_date: params.expiration_date,
        credential_subject: CredentialSubject {
            id: Some(params.subject),
            claims: params.attestation,
        },
        credential_status: None,
        evidence: None,
        terms_of_use: None,
    }
}

/// Parameters for [`create_presentation`].
#[derive(Debug, Clone, Default)]
pub struct CreatePresentationParams {
    pub id: Option<String>,
    pub holder: String,
    pub credentials: Vec<Verifiable<W3CCredential>>,
    /// Extra presentation types after `VerifiablePresentation`.
    pub presentation_type: Vec<String>,
    pub issuance_date: Option<String>,
    pub expiration_date: Option<String>,
}

/// Build an unsigned presentation of already-signed credentials.
pub fn create_presentation(params: CreatePresentationParams) -> W3CPresentation {
    let mut presentation_type = vec![VERIFIABLE_PRESENTATION_TYPE.to_string()];
    presentation_type.extend(
        params
            .presentation_type
            .into_iter()
            .filter(|t| t != VERIFIABLE_PRESENTATION_TYPE),
    );

    W3CPresentation {
        context: vec![CREDENTIALS_V1_CONTEXT.to_string()],
        presentation_type,
        id: params.id,
        holder: params.holder,
        verifiable_credential: params.credentials,
        issuance_date: params.issuance_date,
        expiration_date: params.expiration_date,
    }
}
