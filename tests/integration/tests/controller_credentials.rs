//! Integration test: proving agent ownership with a controller credential.
//!
//! The agent is a did:web hosted on a local server whose document names its
//! controller; an issuer vouches for that relationship.

use ack_did::{create_did_web_document_from_keypair, DidUri};
use ack_id::{create_agent_card_service_endpoint, create_controller_credential, CreateControllerCredentialParams};
use ack_integration_tests::{network_resolver, DocumentHost, TestIdentity};
use ack_keys::{KeyCurve, Keypair};
use ack_vc::{
    parse_jwt_credential, sign_credential, verify_parsed_credential, ControllerClaimVerifier,
    CredentialError, SignOptions, VerifyCredentialOptions,
};

/// Host an agent did:web controlled by `controller`.
async fn hosted_agent(controller: &str) -> TestIdentity {
    let host = DocumentHost::bind().await.expect("bind");
    let keypair = Keypair::generate(KeyCurve::Secp256k1);
    let controller = DidUri::new(controller).expect("controller DID");
    let (did, mut document) =
        create_did_web_document_from_keypair(&host.base_url(), &keypair, None, Some(controller))
            .expect("document");

    document.service = Some(vec![create_agent_card_service_endpoint(
        did.as_str(),
        &format!("{}/.well-known/agent.json", host.base_url()),
    )]);
    host.serve(vec![(
        "/.well-known/did.json".to_string(),
        serde_json::to_value(&document).expect("serialize"),
    )]);

    TestIdentity::with_did(did.to_string(), keypair)
}

#[tokio::test]
async fn test_controller_claim_verified() {
    let issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let owner = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let agent = hosted_agent(&owner.did).await;
    let resolver = network_resolver().unwrap();

    let credential = create_controller_credential(CreateControllerCredentialParams::new(
        agent.did.clone(),
        owner.did.clone(),
        issuer.did.clone(),
    ));
    let jwt = sign_credential(&credential, &SignOptions::new(issuer.did.clone(), &issuer.signer))
        .unwrap()
        .jwt;

    let parsed = parse_jwt_credential(&jwt, &resolver).await.expect("parse");
    let verifier = ControllerClaimVerifier;
    let options = VerifyCredentialOptions::new(&resolver)
        .trusted_issuers([issuer.did.clone()])
        .verifier(&verifier);
    verify_parsed_credential(&parsed, &options).await.expect("controller claim");
}

#[tokio::test]
async fn test_controller_claim_mismatch() {
    let issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let owner = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let impostor = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let agent = hosted_agent(&owner.did).await;
    let resolver = network_resolver().unwrap();

    // The issuer vouches for the wrong controller.
    let credential = create_controller_credential(CreateControllerCredentialParams::new(
        agent.did.clone(),
        impostor.did.clone(),
        issuer.did.clone(),
    ));
    let vc = sign_credential(&credential, &SignOptions::new(issuer.did.clone(), &issuer.signer))
        .unwrap()
        .verifiable_credential;

    let verifier = ControllerClaimVerifier;
    let options = VerifyCredentialOptions::new(&resolver)
        .trusted_issuers([issuer.did.clone()])
        .verifier(&verifier);
    let result = verify_parsed_credential(&vc, &options).await;
    assert!(matches!(
        result,
        Err(CredentialError::InvalidControllerClaim { ref expected, ref actual })
            if *expected == impostor.did && *actual == owner.did
    ));
}

#[tokio::test]
async fn test_agent_signs_as_did_web() {
    let owner = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let agent = hosted_agent(&owner.did).await;
    let resolver = network_resolver().unwrap();

    // A self-issued credential proves the hosted key signs for the did:web.
    let credential = create_controller_credential(CreateControllerCredentialParams::new(
        agent.did.clone(),
        owner.did.clone(),
        agent.did.clone(),
    ));
    let jwt = sign_credential(&credential, &SignOptions::new(agent.did.clone(), &agent.signer))
        .unwrap()
        .jwt;

    let parsed = parse_jwt_credential(&jwt, &resolver).await.expect("did:web signature");
    assert_eq!(parsed.issuer.id, agent.did);
}
