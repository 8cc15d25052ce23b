use serde::Deserialize;
use serde_json::Value;

use ack_did::{is_did_uri, DidResolver};
use ack_jwt::{verify_jwt, JwtVerified, VerifyJwtOptions};
use ack_vc::{Verifiable, W3CCredential};

use crate::error::HandshakeError;
use crate::message::{canonical_json, Message, Part};

/// Who is verifying, and whom they expect.
pub struct VerifyA2AOptions<'a> {
    /// The verifier's DID, matched against `aud`.
    pub did: String,
    /// Required token issuer, when the peer is already known.
    pub counterparty: Option<String>,
    pub resolver: &'a dyn DidResolver,
}

impl<'a> VerifyA2AOptions<'a> {
    pub fn new(did: impl Into<String>, resolver: &'a dyn DidResolver) -> Self {
        Self {
            did: did.into(),
            counterparty: None,
            resolver,
        }
    }

    pub fn counterparty(mut self, counterparty: impl Into<String>) -> Self {
        self.counterparty = Some(counterparty.into());
        self
    }

    fn jwt_options(&self) -> VerifyJwtOptions<'a> {
        let options = VerifyJwtOptions::new(self.resolver).audience(self.did.clone());
        match &self.counterparty {
            Some(counterparty) => options.issuer(counterparty.clone()),
            None => options,
        }
    }
}

/// The verified content of a handshake message.
#[derive(Debug, Clone)]
pub struct VerifiedHandshake {
    /// The peer's DID.
    pub iss: String,
    pub nonce: String,
    pub reply_nonce: Option<String>,
    /// The credential the peer presented. Not yet checked for trust.
    pub vc: Verifiable<W3CCredential>,
    pub jti: Option<String>,
    pub exp: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HandshakeClaims {
    iss: String,
    nonce: String,
    #[serde(default)]
    reply_nonce: Option<String>,
    vc: Verifiable<W3CCredential>,
}

/// The JWT carried by a handshake message: exactly one data part `{jwt}`.
fn handshake_jwt(message: &Message) -> Result<&str, HandshakeError> {
    match message.parts.as_slice() {
        [Part::Data {
            data: Value::Object(data),
            ..
        }] => data
            .get("jwt")
            .and_then(Value::as_str)
            .ok_or_else(|| HandshakeError::MalformedMessage("data part has no jwt".into())),
        _ => Err(HandshakeError::MalformedMessage(
            "expected a single data part".into(),
        )),
    }
}

/// Verify a handshake message addressed to `options.did`.
pub async fn verify_a2a_handshake_message(
    message: &Message,
    options: &VerifyA2AOptions<'_>,
) -> Result<VerifiedHandshake, HandshakeError> {
    let jwt = handshake_jwt(message)?;
    let verified = verify_jwt(jwt, &options.jwt_options()).await?;

    let claims: HandshakeClaims = verified
        .payload
        .deserialize_into()
        .map_err(|e| HandshakeError::InvalidPayload(e.to_string()))?;
    if !is_did_uri(&claims.iss) {
        return Err(HandshakeError::InvalidPayload(format!(
            "issuer is not a DID: {}",
            claims.iss
        )));
    }

    Ok(VerifiedHandshake {
        iss: claims.iss,
        nonce: claims.nonce,
        reply_nonce: claims.reply_nonce,
        vc: claims.vc,
        jti: verified.payload.jti.clone(),
        exp: verified.payload.exp,
    })
}

/// Verify a message signed with `metadata.sig`.
///
/// The signature must verify and its embedded body must match the received
/// message, ignoring `metadata` and `contextId`.
pub async fn verify_a2a_signed_message(
    message: &Message,
    options: &VerifyA2AOptions<'_>,
) -> Result<JwtVerified, HandshakeError> {
    let sig = message
        .signature()
        .ok_or_else(|| HandshakeError::MalformedMessage("metadata.sig is missing".into()))?;
    let verified = verify_jwt(sig, &options.jwt_options()).await?;

    let received = canonical_json(&message.signed_body()?);
    let signed = verified
        .payload
        .get_claim("message")
        .map(canonical_json)
        .unwrap_or_default();
    if received != signed {
        tracing::warn!(issuer = %verified.issuer, "Signed message body does not match signature");
        return Err(HandshakeError::MessageMismatch);
    }
    Ok(verified)
}
