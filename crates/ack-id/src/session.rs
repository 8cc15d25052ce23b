use ack_core::HandshakeConfig;
use ack_did::DidResolver;
use ack_jwt::JwtSigner;
use ack_vc::{verify_parsed_credential, Verifiable, VerifyCredentialOptions, W3CCredential};

use crate::error::HandshakeError;
use crate::message::{Message, Role};
use crate::peers::{AuthenticatedPeer, ReplayGuard};
use crate::sign::{create_a2a_handshake_message, SignMessageOptions, DEFAULT_EXPIRES_IN_SECS};
use crate::verify::{verify_a2a_handshake_message, VerifiedHandshake, VerifyA2AOptions};

/// Where one side of a handshake stands.
#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeState {
    Init,
    /// A challenge was sent to `counterparty`; its reply must echo `nonce`.
    ChallengeSent { counterparty: String, nonce: String },
    Verified(AuthenticatedPeer),
    Failed(String),
}

/// One side of a nonce-based mutual authentication.
///
/// The initiator calls [`initiate`](Self::initiate) then
/// [`complete`](Self::complete) with the reply; the responder calls
/// [`respond`](Self::respond). Any failure moves the session to `Failed`.
pub struct HandshakeSession<'a> {
    did: String,
    signer: &'a dyn JwtSigner,
    vc: Verifiable<W3CCredential>,
    resolver: &'a dyn DidResolver,
    trusted_issuers: Vec<String>,
    expires_in: i64,
    replay_guard: Option<&'a ReplayGuard>,
    state: HandshakeState,
}

impl<'a> HandshakeSession<'a> {
    pub fn new(
        did: impl Into<String>,
        signer: &'a dyn JwtSigner,
        vc: Verifiable<W3CCredential>,
        resolver: &'a dyn DidResolver,
    ) -> Self {
        Self {
            did: did.into(),
            signer,
            vc,
            resolver,
            trusted_issuers: Vec::new(),
            expires_in: DEFAULT_EXPIRES_IN_SECS,
            replay_guard: None,
            state: HandshakeState::Init,
        }
    }

    /// Apply token lifetime and trusted issuers from configuration.
    pub fn with_config(mut self, config: &HandshakeConfig) -> Self {
        self.expires_in = i64::try_from(config.expires_in_secs).unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        self.trusted_issuers = config.trusted_issuers.clone();
        self
    }

    /// Issuers whose credentials the peer may present. Empty accepts any
    /// issuer whose proof verifies.
    pub fn trusted_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trusted_issuers = issuers.into_iter().map(Into::into).collect();
        self
    }

    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = seconds;
        self
    }

    pub fn replay_guard(mut self, guard: &'a ReplayGuard) -> Self {
        self.replay_guard = Some(guard);
        self
    }

    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    /// The authenticated peer, once verified.
    pub fn peer(&self) -> Option<&AuthenticatedPeer> {
        match &self.state {
            HandshakeState::Verified(peer) => Some(peer),
            _ => None,
        }
    }

    fn sign_options(&self) -> SignMessageOptions<'a> {
        SignMessageOptions::new(self.did.clone(), self.signer).expires_in(self.expires_in)
    }

    fn fail(&mut self, error: HandshakeError) -> HandshakeError {
        tracing::warn!(did = %self.did, error = %error, "Handshake failed");
        self.state = HandshakeState::Failed(error.to_string());
        error
    }

    /// Send a challenge to `recipient`.
    pub fn initiate(&mut self, recipient: &str) -> Result<Message, HandshakeError> {
        if self.state != HandshakeState::Init {
            return Err(HandshakeError::InvalidState("initiate requires Init".into()));
        }
        let signed = create_a2a_handshake_message(Role::User, recipient, &self.vc, None, &self.sign_options());
        let handshake = match signed {
            Ok(handshake) => handshake,
            Err(e) => return Err(self.fail(e)),
        };

        self.state = HandshakeState::ChallengeSent {
            counterparty: recipient.to_string(),
            nonce: handshake.nonce,
        };
        Ok(handshake.message)
    }

    /// Verify an inbound challenge and answer it. The initiator is
    /// authenticated once its credential checks out.
    pub async fn respond(&mut self, challenge: &Message) -> Result<Message, HandshakeError> {
        if self.state != HandshakeState::Init {
            return Err(HandshakeError::InvalidState("respond requires Init".into()));
        }
        let options = VerifyA2AOptions::new(self.did.clone(), self.resolver);
        let inbound = match self.verify_peer(challenge, &options).await {
            Ok(inbound) => inbound,
            Err(e) => return Err(self.fail(e)),
        };

        let signed = create_a2a_handshake_message(
            Role::Agent,
            &inbound.iss,
            &self.vc,
            Some(&inbound.nonce),
            &self.sign_options(),
        );
        let reply = match signed {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(e)),
        };

        self.state = HandshakeState::Verified(AuthenticatedPeer::new(inbound.iss, inbound.vc));
        Ok(reply.message)
    }

    /// Verify the responder's reply to our challenge.
    pub async fn complete(&mut self, reply: &Message) -> Result<AuthenticatedPeer, HandshakeError> {
        let (counterparty, nonce) = match &self.state {
            HandshakeState::ChallengeSent { counterparty, nonce } => (counterparty.clone(), nonce.clone()),
            _ => {
                return Err(HandshakeError::InvalidState(
                    "complete requires ChallengeSent".into(),
                ))
            }
        };

        let options = VerifyA2AOptions::new(self.did.clone(), self.resolver).counterparty(counterparty);
        let inbound = match self.verify_peer(reply, &options).await {
            Ok(inbound) => inbound,
            Err(e) => return Err(self.fail(e)),
        };
        if inbound.nonce != nonce {
            return Err(self.fail(HandshakeError::NonceMismatch {
                expected: nonce,
                actual: inbound.nonce,
            }));
        }

        let peer = AuthenticatedPeer::new(inbound.iss, inbound.vc);
        self.state = HandshakeState::Verified(peer.clone());
        Ok(peer)
    }

    /// Verify the token, guard against replay, then check the presented
    /// credential against the trusted issuers.
    async fn verify_peer(
        &self,
        message: &Message,
        options: &VerifyA2AOptions<'_>,
    ) -> Result<VerifiedHandshake, HandshakeError> {
        let inbound = verify_a2a_handshake_message(message, options).await?;

        if let (Some(guard), Some(jti)) = (self.replay_guard, &inbound.jti) {
            guard.check(jti, inbound.exp.unwrap_or(i64::MAX))?;
        }

        let mut credential_options = VerifyCredentialOptions::new(self.resolver);
        if !self.trusted_issuers.is_empty() {
            credential_options = credential_options.trusted_issuers(self.trusted_issuers.clone());
        }
        verify_parsed_credential(&inbound.vc, &credential_options).await?;
        Ok(inbound)
    }
}
