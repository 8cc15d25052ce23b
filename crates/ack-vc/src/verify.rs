use async_trait::async_trait;

use ack_did::DidResolver;
use ack_jwt::{verify_jwt, VerifyJwtOptions};

use crate::error::CredentialError;
use crate::parse::credential_from_payload;
use crate::revocation::is_revoked;
use crate::signing::parse_date;
use crate::types::{CredentialSubject, Verifiable, W3CCredential, JWT_PROOF_TYPE};

/// A check applied to the subject of credentials of certain types.
#[async_trait]
pub trait ClaimVerifier: Send + Sync {
    /// Whether this verifier applies to a credential with these types.
    fn accepts(&self, credential_type: &[String]) -> bool;

    async fn verify(
        &self,
        subject: &CredentialSubject,
        resolver: &dyn DidResolver,
    ) -> Result<(), CredentialError>;
}

/// Whether `expirationDate` has passed. Credentials without one, or with an
/// unparseable one, never expire.
pub fn is_expired(credential: &W3CCredential) -> bool {
    is_expired_at(credential, chrono::Utc::now().timestamp_millis())
}

fn is_expired_at(credential: &W3CCredential, now_millis: i64) -> bool {
    credential
        .expiration_date
        .as_deref()
        .and_then(|date| chrono::DateTime::parse_from_rfc3339(date).ok())
        .map(|date| date.timestamp_millis() < now_millis)
        .unwrap_or(false)
}

/// Check a credential's proof.
///
/// Only `JwtProof2020` is supported. The token is verified against the
/// issuer's DID document and must carry this same credential.
pub async fn verify_proof(
    credential: &Verifiable<W3CCredential>,
    resolver: &dyn DidResolver,
) -> Result<(), CredentialError> {
    let proof = &credential.proof;
    if proof.proof_type != JWT_PROOF_TYPE {
        return Err(CredentialError::UnsupportedProofType(proof.proof_type.clone()));
    }
    let jwt = proof
        .jwt
        .as_deref()
        .ok_or_else(|| CredentialError::InvalidProof("JwtProof2020 has no jwt".into()))?;

    let options = VerifyJwtOptions::new(resolver)
        .issuer(credential.issuer.id.clone())
        .skip_audience()
        .skip_expiry();
    let verified = verify_jwt(jwt, &options)
        .await
        .map_err(|e| CredentialError::InvalidProof(e.to_string()))?;

    let signed = credential_from_payload(&verified.payload)
        .map_err(|e| CredentialError::InvalidProof(e.to_string()))?;
    if !same_credential(&signed, &credential.inner) {
        tracing::warn!(issuer = %credential.issuer.id, "Credential differs from its signed JWT");
        return Err(CredentialError::InvalidProof(
            "JWT does not match the credential".into(),
        ));
    }
    Ok(())
}

/// Dates compare by instant; they may be written with different precision.
fn same_date(a: Option<&str>, b: Option<&str>) -> bool {
    match (a.and_then(parse_date), b.and_then(parse_date)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// Every field of the presented credential must be the signed one.
fn same_credential(signed: &W3CCredential, presented: &W3CCredential) -> bool {
    let without_dates = |credential: &W3CCredential| W3CCredential {
        issuance_date: String::new(),
        expiration_date: None,
        ..credential.clone()
    };
    same_date(Some(&signed.issuance_date), Some(&presented.issuance_date))
        && same_date(
            signed.expiration_date.as_deref(),
            presented.expiration_date.as_deref(),
        )
        && without_dates(signed) == without_dates(presented)
}

/// Options for [`verify_parsed_credential`].
pub struct VerifyCredentialOptions<'a> {
    pub resolver: &'a dyn DidResolver,
    /// When set, the issuer must be one of these DIDs.
    pub trusted_issuers: Option<Vec<String>>,
    /// Applied in order to credentials whose types they accept.
    pub verifiers: Vec<&'a dyn ClaimVerifier>,
    /// The status list the credential's `credentialStatus` references, if
    /// revocation should be checked. Its own proof is the caller's concern.
    pub status_list: Option<&'a W3CCredential>,
}

impl<'a> VerifyCredentialOptions<'a> {
    pub fn new(resolver: &'a dyn DidResolver) -> Self {
        Self {
            resolver,
            trusted_issuers: None,
            verifiers: Vec::new(),
            status_list: None,
        }
    }

    pub fn trusted_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trusted_issuers = Some(issuers.into_iter().map(Into::into).collect());
        self
    }

    pub fn verifier(mut self, verifier: &'a dyn ClaimVerifier) -> Self {
        self.verifiers.push(verifier);
        self
    }

    pub fn status_list(mut self, status_list: &'a W3CCredential) -> Self {
        self.status_list = Some(status_list);
        self
    }
}

/// Verify an already-parsed credential.
///
/// Checks, in order: the proof, expiry, revocation (when a status list is
/// given), issuer trust, then every claim verifier that accepts the
/// credential's types. The first failure is returned.
pub async fn verify_parsed_credential(
    credential: &Verifiable<W3CCredential>,
    options: &VerifyCredentialOptions<'_>,
) -> Result<(), CredentialError> {
    verify_proof(credential, options.resolver).await?;

    if is_expired(credential) {
        return Err(CredentialError::Expired);
    }

    if let Some(status_list) = options.status_list {
        if is_revoked(credential, status_list)? {
            return Err(CredentialError::Revoked);
        }
    }

    let issuer = &credential.issuer.id;
    if let Some(trusted) = &options.trusted_issuers {
        if !trusted.iter().any(|t| t == issuer) {
            tracing::debug!(issuer = %issuer, "Credential issuer not trusted");
            return Err(CredentialError::UntrustedIssuer(issuer.clone()));
        }
    }

    for verifier in options
        .verifiers
        .iter()
        .filter(|v| v.accepts(&credential.credential_type))
    {
        tracing::debug!(types = ?credential.credential_type, "Running claim verifier");
        verifier
            .verify(&credential.credential_subject, options.resolver)
            .await?;
    }

    Ok(())
}
