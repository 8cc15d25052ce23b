use serde_json::Value;

use ack_jwt::{create_jwt, JwtAlgorithm, JwtOptions, JwtPayload, JwtSigner};

use crate::error::CredentialError;
use crate::types::{Proof, Verifiable, W3CCredential, W3CPresentation};

/// Who signs, and with what.
pub struct SignOptions<'a> {
    /// Issuer (or holder) DID; becomes the JWT `iss`.
    pub did: String,
    pub signer: &'a dyn JwtSigner,
    pub alg: Option<JwtAlgorithm>,
}

impl<'a> SignOptions<'a> {
    pub fn new(did: impl Into<String>, signer: &'a dyn JwtSigner) -> Self {
        Self {
            did: did.into(),
            signer,
            alg: None,
        }
    }

    pub fn alg(mut self, alg: JwtAlgorithm) -> Self {
        self.alg = Some(alg);
        self
    }

    fn jwt_options(&self) -> JwtOptions<'a> {
        let options = JwtOptions::new(self.did.clone(), self.signer);
        match self.alg {
            Some(alg) => options.alg(alg),
            None => options,
        }
    }
}

/// A signed credential in both of its forms.
#[derive(Debug, Clone)]
pub struct SignedCredential {
    pub jwt: String,
    pub verifiable_credential: Verifiable<W3CCredential>,
}

/// Seconds since the epoch for an RFC 3339 date, if it parses.
pub(crate) fn parse_date(date: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|d| d.timestamp())
}

/// Sign a credential as a JWT-VC.
///
/// The credential is embedded under `vc`. `iss`, `sub`, `nbf`, `exp` and `jti`
/// mirror the issuer, subject id, issuance and expiration dates, and id.
pub fn sign_credential(
    credential: &W3CCredential,
    options: &SignOptions<'_>,
) -> Result<SignedCredential, CredentialError> {
    if credential.issuer.id != options.did {
        return Err(CredentialError::InvalidCredential(format!(
            "Credential issuer {} does not match signer {}",
            credential.issuer.id, options.did
        )));
    }

    let mut payload = JwtPayload::new().claim("vc", serde_json::to_value(credential)?);
    if let Some(sub) = &credential.credential_subject.id {
        payload = payload.subject(sub.clone());
    }
    if let Some(nbf) = parse_date(&credential.issuance_date) {
        payload = payload.not_before(nbf);
    }
    if let Some(exp) = credential.expiration_date.as_deref().and_then(parse_date) {
        payload = payload.expires_at(exp);
    }
    if let Some(id) = &credential.id {
        payload = payload.jti(id.clone());
    }

    let jwt = create_jwt(payload, &options.jwt_options())
        .map_err(|e| CredentialError::SigningFailed(e.to_string()))?;

    tracing::info!(
        issuer = %options.did,
        types = ?credential.credential_type,
        "Signed credential"
    );

    Ok(SignedCredential {
        verifiable_credential: Verifiable {
            inner: credential.clone(),
            proof: Proof::jwt(jwt.clone()),
        },
        jwt,
    })
}

/// Options for [`sign_presentation`].
#[derive(Debug, Clone, Default)]
pub struct SignPresentationOptions {
    /// Verifier-chosen challenge, carried as `nonce`.
    pub challenge: Option<String>,
    /// Intended verifier, carried as `aud`.
    pub domain: Option<String>,
}

/// Sign a presentation as a JWT-VP, embedded under `vp`.
pub fn sign_presentation(
    presentation: &W3CPresentation,
    options: &SignOptions<'_>,
    presentation_options: &SignPresentationOptions,
) -> Result<String, CredentialError> {
    if presentation.holder != options.did {
        return Err(CredentialError::InvalidCredential(format!(
            "Presentation holder {} does not match signer {}",
            presentation.holder, options.did
        )));
    }

    let mut payload = JwtPayload::new().claim("vp", serde_json::to_value(presentation)?);
    if let Some(challenge) = &presentation_options.challenge {
        payload = payload.claim("nonce", Value::String(challenge.clone()));
    }
    if let Some(domain) = &presentation_options.domain {
        payload = payload.audience(domain.clone());
    }
    if let Some(id) = &presentation.id {
        payload = payload.jti(id.clone());
    }
    if let Some(nbf) = presentation.issuance_date.as_deref().and_then(parse_date) {
        payload = payload.not_before(nbf);
    }
    if let Some(exp) = presentation.expiration_date.as_deref().and_then(parse_date) {
        payload = payload.expires_at(exp);
    }

    create_jwt(payload, &options.jwt_options())
        .map_err(|e| CredentialError::SigningFailed(e.to_string()))
}
