use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use ack_jwt::{create_jwt, JwtAlgorithm, JwtOptions, JwtPayload, JwtSigner};
use ack_vc::{Verifiable, W3CCredential};

use crate::error::HandshakeError;
use crate::message::{Message, Part, Role};
use crate::random::{generate_random_jti, generate_random_nonce};

/// Default lifetime of handshake and message JWTs, in seconds.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 300;

/// Signing identity for handshake and signed messages.
pub struct SignMessageOptions<'a> {
    pub did: String,
    pub signer: &'a dyn JwtSigner,
    pub alg: Option<JwtAlgorithm>,
    pub expires_in: i64,
}

impl<'a> SignMessageOptions<'a> {
    pub fn new(did: impl Into<String>, signer: &'a dyn JwtSigner) -> Self {
        Self {
            did: did.into(),
            signer,
            alg: None,
            expires_in: DEFAULT_EXPIRES_IN_SECS,
        }
    }

    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = seconds;
        self
    }

    pub fn alg(mut self, alg: JwtAlgorithm) -> Self {
        self.alg = Some(alg);
        self
    }
}

/// Sign `payload` as a short-lived JWT with a fresh `jti`.
fn create_message_signature(
    payload: JwtPayload,
    options: &SignMessageOptions<'_>,
) -> Result<(String, String), HandshakeError> {
    let jti = generate_random_jti();
    let mut jwt_options =
        JwtOptions::new(options.did.clone(), options.signer).expires_in(options.expires_in);
    if let Some(alg) = options.alg {
        jwt_options = jwt_options.alg(alg);
    }
    let jwt = create_jwt(payload.jti(jti.clone()), &jwt_options)?;
    Ok((jwt, jti))
}

/// Handshake claims: the recipient, the challenge nonce and, in a reply, the
/// responder's own nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakePayload {
    pub aud: String,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_nonce: Option<String>,
}

/// Build handshake claims for `recipient`. Without a `request_nonce` this is
/// a challenge with a fresh nonce; with one it is a reply that echoes it and
/// adds a fresh `replyNonce`.
pub fn create_a2a_handshake_payload(recipient: &str, request_nonce: Option<&str>) -> HandshakePayload {
    let fresh = generate_random_nonce();
    match request_nonce {
        Some(request_nonce) => HandshakePayload {
            aud: recipient.to_string(),
            nonce: request_nonce.to_string(),
            reply_nonce: Some(fresh),
        },
        None => HandshakePayload {
            aud: recipient.to_string(),
            nonce: fresh,
            reply_nonce: None,
        },
    }
}

/// Wrap a handshake JWT in a message with a single `{jwt}` data part.
pub fn create_a2a_handshake_message_from_jwt(role: Role, jwt: &str) -> Message {
    Message::new(role, vec![Part::data(json!({ "jwt": jwt }))])
}

/// A signed handshake message.
#[derive(Debug, Clone)]
pub struct A2AHandshakeMessage {
    pub sig: String,
    pub jti: String,
    /// The challenge nonce carried in the token (echoed, for a reply).
    pub nonce: String,
    pub reply_nonce: Option<String>,
    pub message: Message,
}

/// Sign a handshake challenge (no `request_nonce`) or reply, presenting `vc`.
pub fn create_a2a_handshake_message(
    role: Role,
    recipient: &str,
    vc: &Verifiable<W3CCredential>,
    request_nonce: Option<&str>,
    options: &SignMessageOptions<'_>,
) -> Result<A2AHandshakeMessage, HandshakeError> {
    let payload = create_a2a_handshake_payload(recipient, request_nonce);
    let jwt_payload = JwtPayload::from_serializable(&payload)?.claim("vc", serde_json::to_value(vc)?);
    let (sig, jti) = create_message_signature(jwt_payload, options)?;

    tracing::debug!(
        did = %options.did,
        recipient = recipient,
        reply = request_nonce.is_some(),
        "Created handshake message"
    );

    Ok(A2AHandshakeMessage {
        message: create_a2a_handshake_message_from_jwt(role, &sig),
        sig,
        jti,
        nonce: payload.nonce,
        reply_nonce: payload.reply_nonce,
    })
}

/// A message signed into `metadata.sig`.
#[derive(Debug, Clone)]
pub struct SignedA2AMessage {
    pub sig: String,
    pub jti: String,
    pub message: Message,
}

/// Sign a message body (everything but `metadata` and `contextId`) and attach
/// the JWT as `metadata.sig`. Existing metadata entries are kept.
pub fn create_signed_a2a_message(
    message: Message,
    options: &SignMessageOptions<'_>,
) -> Result<SignedA2AMessage, HandshakeError> {
    let body = message.signed_body()?;
    let (sig, jti) = create_message_signature(JwtPayload::new().claim("message", body), options)?;

    let mut message = message;
    message
        .metadata
        .get_or_insert_with(Map::new)
        .insert("sig".into(), Value::String(sig.clone()));

    Ok(SignedA2AMessage { sig, jti, message })
}
