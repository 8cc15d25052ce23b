//! Integration test: two agents authenticate each other over A2A, then
//! exchange signed messages.

use ack_core::HandshakeConfig;
use ack_id::{
    create_signed_a2a_message, verify_a2a_signed_message, AuthenticatedPeers, HandshakeError,
    HandshakeSession, HandshakeState, Message, Part, ReplayGuard, Role, SignMessageOptions,
    VerifyA2AOptions,
};
use ack_integration_tests::{offline_resolver, TestIdentity};
use ack_keys::KeyCurve;
use ack_vc::{
    create_credential, sign_credential, CreateCredentialParams, CredentialError, SignOptions, Verifiable,
    W3CCredential,
};

/// An identity credential for `subject`, signed by `issuer`.
fn identity_credential(issuer: &TestIdentity, subject: &TestIdentity) -> Verifiable<W3CCredential> {
    let credential = create_credential(
        CreateCredentialParams::new(issuer.did.clone(), subject.did.clone())
            .credential_type("AgentIdentityCredential"),
    );
    sign_credential(&credential, &SignOptions::new(issuer.did.clone(), &issuer.signer))
        .expect("sign identity credential")
        .verifiable_credential
}

// =========================================================================
// Mutual authentication
// =========================================================================

#[tokio::test]
async fn test_handshake_then_signed_messages() {
    let issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let client = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let bank = TestIdentity::did_key(KeyCurve::Secp256r1).unwrap();
    let resolver = offline_resolver();

    let config = HandshakeConfig {
        trusted_issuers: vec![issuer.did.clone()],
        ..Default::default()
    };

    let mut client_session = HandshakeSession::new(
        client.did.clone(),
        &client.signer,
        identity_credential(&issuer, &client),
        &resolver,
    )
    .with_config(&config);
    let mut bank_session = HandshakeSession::new(
        bank.did.clone(),
        &bank.signer,
        identity_credential(&issuer, &bank),
        &resolver,
    )
    .with_config(&config);

    // Messages travel as JSON.
    let challenge = client_session.initiate(&bank.did).unwrap();
    let challenge: Message = serde_json::from_str(&serde_json::to_string(&challenge).unwrap()).unwrap();
    let reply = bank_session.respond(&challenge).await.expect("bank verifies client");
    let reply: Message = serde_json::from_str(&serde_json::to_string(&reply).unwrap()).unwrap();
    let bank_peer = client_session.complete(&reply).await.expect("client verifies bank");

    assert_eq!(bank_peer.did, bank.did);
    assert!(matches!(bank_session.state(), HandshakeState::Verified(peer) if peer.did == client.did));

    let peers = AuthenticatedPeers::new();
    peers.insert(bank_peer);
    assert!(peers.contains(&bank.did));

    // Bank answers with a signed message; the client pins the sender.
    let signed = create_signed_a2a_message(
        Message::new(Role::Agent, vec![Part::text("Your balance is $100")]).context_id("ctx-1"),
        &SignMessageOptions::new(bank.did.clone(), &bank.signer),
    )
    .unwrap();
    let verified = verify_a2a_signed_message(
        &signed.message,
        &VerifyA2AOptions::new(client.did.clone(), &resolver).counterparty(bank.did.clone()),
    )
    .await
    .expect("signed message");
    assert_eq!(verified.issuer, bank.did);

    // A message signed by someone else fails the pin.
    let impostor = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let forged = create_signed_a2a_message(
        Message::new(Role::Agent, vec![Part::text("Your balance is $0")]),
        &SignMessageOptions::new(impostor.did.clone(), &impostor.signer),
    )
    .unwrap();
    assert!(matches!(
        verify_a2a_signed_message(
            &forged.message,
            &VerifyA2AOptions::new(client.did.clone(), &resolver).counterparty(bank.did.clone()),
        )
        .await,
        Err(HandshakeError::Jwt(_))
    ));
}

#[tokio::test]
async fn test_credential_from_unknown_issuer_rejected() {
    let issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let rogue_issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let client = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let bank = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let resolver = offline_resolver();

    let mut client_session = HandshakeSession::new(
        client.did.clone(),
        &client.signer,
        identity_credential(&rogue_issuer, &client),
        &resolver,
    );
    let mut bank_session = HandshakeSession::new(
        bank.did.clone(),
        &bank.signer,
        identity_credential(&issuer, &bank),
        &resolver,
    )
    .trusted_issuers([issuer.did.clone()]);

    let challenge = client_session.initiate(&bank.did).unwrap();
    let result = bank_session.respond(&challenge).await;
    assert!(matches!(
        result,
        Err(HandshakeError::Credential(CredentialError::UntrustedIssuer(_)))
    ));
    assert!(bank_session.peer().is_none());
}

#[tokio::test]
async fn test_challenge_for_another_agent_rejected() {
    let issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let client = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let bank = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let other = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let resolver = offline_resolver();

    let mut client_session = HandshakeSession::new(
        client.did.clone(),
        &client.signer,
        identity_credential(&issuer, &client),
        &resolver,
    );
    let challenge = client_session.initiate(&bank.did).unwrap();

    // Forwarded to an agent it was not addressed to.
    let mut other_session = HandshakeSession::new(
        other.did.clone(),
        &other.signer,
        identity_credential(&issuer, &other),
        &resolver,
    );
    assert!(matches!(
        other_session.respond(&challenge).await,
        Err(HandshakeError::Jwt(_))
    ));
}

#[tokio::test]
async fn test_replayed_challenge_rejected() {
    let issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let client = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let bank = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let resolver = offline_resolver();
    let guard = ReplayGuard::new();

    let mut client_session = HandshakeSession::new(
        client.did.clone(),
        &client.signer,
        identity_credential(&issuer, &client),
        &resolver,
    );
    let challenge = client_session.initiate(&bank.did).unwrap();

    let bank_vc = identity_credential(&issuer, &bank);
    let mut first = HandshakeSession::new(bank.did.clone(), &bank.signer, bank_vc.clone(), &resolver)
        .replay_guard(&guard);
    first.respond(&challenge).await.expect("first delivery");

    let mut second = HandshakeSession::new(bank.did.clone(), &bank.signer, bank_vc, &resolver)
        .replay_guard(&guard);
    assert!(matches!(
        second.respond(&challenge).await,
        Err(HandshakeError::Replay(_))
    ));
}
