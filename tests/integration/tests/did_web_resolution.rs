//! Integration test: did:web and JWKS-backed did:web resolution against a
//! local document host.

use ack_did::{create_did_web_document_from_keypair, DidResolver, DidResolutionError};
use ack_id::create_agent_card_service_endpoint;
use ack_integration_tests::{network_resolver, DocumentHost, TestIdentity};
use ack_jwt::{create_jwt, verify_jwt, JwtOptions, JwtPayload, VerifyJwtOptions};
use ack_keys::{keypair_to_jwk, KeyCurve, Keypair};
use serde_json::json;

#[tokio::test]
async fn test_resolve_hosted_document() {
    let host = DocumentHost::bind().await.unwrap();
    let keypair = Keypair::generate(KeyCurve::Ed25519);
    let (did, mut document) = create_did_web_document_from_keypair(&host.base_url(), &keypair, None, None).unwrap();
    document.service = Some(vec![create_agent_card_service_endpoint(
        did.as_str(),
        &format!("{}/.well-known/agent.json", host.base_url()),
    )]);
    host.serve(vec![(
        "/.well-known/did.json".into(),
        serde_json::to_value(&document).unwrap(),
    )]);

    let resolver = network_resolver().unwrap();
    let resolved = resolver.resolve(did.as_str()).await.expect("resolve");
    assert_eq!(resolved, document);
    assert_eq!(resolved.service.unwrap()[0].service_type, "AgentCard");

    // Fragments resolve to the same document.
    let with_fragment = format!("{}#agent-card", did);
    assert_eq!(resolver.resolve(&with_fragment).await.unwrap().id, did.as_str());
}

#[tokio::test]
async fn test_resolve_path_document() {
    let host = DocumentHost::bind().await.unwrap();
    let keypair = Keypair::generate(KeyCurve::Secp256k1);
    let base = format!("{}/agents/bob", host.base_url());
    let (did, document) = create_did_web_document_from_keypair(&base, &keypair, None, None).unwrap();
    assert!(did.as_str().ends_with(":agents:bob"));
    host.serve(vec![(
        "/agents/bob/did.json".into(),
        serde_json::to_value(&document).unwrap(),
    )]);

    let resolver = network_resolver().unwrap();
    assert_eq!(resolver.resolve(did.as_str()).await.unwrap().id, did.as_str());
}

#[tokio::test]
async fn test_jwks_fallback_verifies_jwt() {
    let host = DocumentHost::bind().await.unwrap();
    let did = format!("did:web:127.0.0.1%3A{}", host.addr().port());
    let keypair = Keypair::generate(KeyCurve::Secp256r1);

    let mut jwk = serde_json::to_value(keypair_to_jwk(&keypair).unwrap().public).unwrap();
    jwk["kid"] = json!("key-1");
    host.serve(vec![(
        "/.well-known/jwks.json".into(),
        json!({ "keys": [jwk, { "kty": "RSA", "n": "AQAB", "e": "AQAB" }] }),
    )]);

    let resolver = network_resolver().unwrap();
    let document = resolver.resolve(&did).await.expect("jwks fallback");
    assert_eq!(document.verification_method.len(), 1);
    assert_eq!(document.verification_method[0].id, format!("{}#key-1", did));

    let service = TestIdentity::with_did(did.clone(), keypair);
    let jwt = create_jwt(
        JwtPayload::new().claim("scope", json!("payments")),
        &JwtOptions::new(did.clone(), &service.signer),
    )
    .unwrap();
    let verified = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver).issuer(did.clone()))
        .await
        .expect("verify against jwks");
    assert_eq!(verified.signer.id, format!("{}#key-1", did));
}

#[tokio::test]
async fn test_missing_document_fails() {
    let host = DocumentHost::bind().await.unwrap();
    let did = format!("did:web:127.0.0.1%3A{}:nobody", host.addr().port());
    host.serve(Vec::new());

    let resolver = network_resolver().unwrap();
    assert!(matches!(
        resolver.resolve(&did).await,
        Err(DidResolutionError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_preseeded_document_skips_network() {
    let keypair = Keypair::generate(KeyCurve::Ed25519);
    let (did, document) =
        create_did_web_document_from_keypair("https://agent.invalid", &keypair, None, None).unwrap();

    let resolver = network_resolver().unwrap();
    resolver.add_to_cache(did.as_str(), document.clone());
    assert_eq!(resolver.resolve(did.as_str()).await.unwrap(), document);
}
