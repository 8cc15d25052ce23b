//! Integration test: did:key identities issuing and verifying credentials.
//!
//! Covers key generation, offline did:key resolution, JWT-VC signing and
//! parsing, issuer trust, presentations and status-list revocation.

use ack_did::DidResolver;
use ack_integration_tests::{offline_resolver, TestIdentity};
use ack_keys::KeyCurve;
use ack_vc::{
    create_credential, create_presentation, create_status_list_credential, make_revocable,
    parse_jwt_credential, parse_jwt_presentation, sign_credential, sign_presentation,
    verify_parsed_credential, CreateCredentialParams, CreatePresentationParams, CredentialError,
    RevocationOptions, SignOptions, SignPresentationOptions, StatusBitstring, StatusListParams,
    VerifyCredentialOptions, DEFAULT_STATUS_LIST_LENGTH,
};

// =========================================================================
// Identity bootstrap
// =========================================================================

#[tokio::test]
async fn test_did_key_resolves_offline() {
    let resolver = offline_resolver();

    for curve in KeyCurve::ALL {
        let identity = TestIdentity::did_key(curve).expect("identity");
        let document = resolver.resolve(&identity.did).await.expect("resolve");

        assert_eq!(document.id, identity.did);
        assert_eq!(document.verification_method.len(), 1);
        assert!(document.verification_method[0].id.starts_with(&identity.did));
    }
}

// =========================================================================
// Issue -> parse -> verify
// =========================================================================

fn employment_credential(issuer: &TestIdentity, subject: &TestIdentity) -> ack_vc::W3CCredential {
    create_credential(
        CreateCredentialParams::new(issuer.did.clone(), subject.did.clone())
            .id("urn:uuid:employment-1")
            .credential_type("EmploymentCredential")
            .claim("employer", "Acme")
            .claim("role", "agent"),
    )
}

#[tokio::test]
async fn test_trusted_issuer_flow() {
    let issuer = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let subject = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let resolver = offline_resolver();

    let signed = sign_credential(
        &employment_credential(&issuer, &subject),
        &SignOptions::new(issuer.did.clone(), &issuer.signer),
    )
    .expect("sign");

    let parsed = parse_jwt_credential(&signed.jwt, &resolver).await.expect("parse");
    assert_eq!(parsed.issuer.id, issuer.did);
    assert_eq!(parsed.credential_subject.id.as_deref(), Some(subject.did.as_str()));
    assert_eq!(parsed.credential_subject.claims["employer"], "Acme");

    let options = VerifyCredentialOptions::new(&resolver).trusted_issuers([issuer.did.clone()]);
    verify_parsed_credential(&parsed, &options).await.expect("verify");
}

#[tokio::test]
async fn test_untrusted_issuer_rejected() {
    let issuer = TestIdentity::did_key(KeyCurve::Secp256r1).unwrap();
    let subject = TestIdentity::did_key(KeyCurve::Secp256r1).unwrap();
    let other = TestIdentity::did_key(KeyCurve::Secp256r1).unwrap();
    let resolver = offline_resolver();

    let signed = sign_credential(
        &employment_credential(&issuer, &subject),
        &SignOptions::new(issuer.did.clone(), &issuer.signer),
    )
    .unwrap();
    let parsed = parse_jwt_credential(&signed.jwt, &resolver).await.unwrap();

    let options = VerifyCredentialOptions::new(&resolver).trusted_issuers([other.did.clone()]);
    let result = verify_parsed_credential(&parsed, &options).await;
    assert!(matches!(result, Err(CredentialError::UntrustedIssuer(_))));
    assert!(result.unwrap_err().is_verification_error());
}

#[tokio::test]
async fn test_forged_issuer_rejected() {
    let issuer = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let forger = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let subject = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let resolver = offline_resolver();

    // Signed by the forger's key but claiming the real issuer's DID.
    let credential = employment_credential(&issuer, &subject);
    let jwt = sign_credential(&credential, &SignOptions::new(issuer.did.clone(), &forger.signer))
        .unwrap()
        .jwt;

    assert!(parse_jwt_credential(&jwt, &resolver).await.is_err());
}

#[tokio::test]
async fn test_expired_credential_rejected() {
    let issuer = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let subject = TestIdentity::did_key(KeyCurve::Ed25519).unwrap();
    let resolver = offline_resolver();

    let credential = create_credential(
        CreateCredentialParams::new(issuer.did.clone(), subject.did.clone())
            .expiration_date("2020-01-01T00:00:00.000Z"),
    );
    let signed = sign_credential(&credential, &SignOptions::new(issuer.did.clone(), &issuer.signer)).unwrap();

    let result = verify_parsed_credential(
        &signed.verifiable_credential,
        &VerifyCredentialOptions::new(&resolver),
    )
    .await;
    assert!(matches!(result, Err(CredentialError::Expired)));
}

// =========================================================================
// Presentations
// =========================================================================

#[tokio::test]
async fn test_presentation_bound_to_domain() {
    let issuer = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let holder = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let resolver = offline_resolver();

    let vc = sign_credential(
        &employment_credential(&issuer, &holder),
        &SignOptions::new(issuer.did.clone(), &issuer.signer),
    )
    .unwrap()
    .verifiable_credential;

    let presentation = create_presentation(CreatePresentationParams {
        holder: holder.did.clone(),
        credentials: vec![vc.clone()],
        ..Default::default()
    });
    let jwt = sign_presentation(
        &presentation,
        &SignOptions::new(holder.did.clone(), &holder.signer),
        &SignPresentationOptions {
            challenge: Some("challenge-1".into()),
            domain: Some("did:web:verifier.example.com".into()),
        },
    )
    .unwrap();

    let parsed = parse_jwt_presentation(&jwt, &resolver, Some("did:web:verifier.example.com"))
        .await
        .expect("presentation");
    assert_eq!(parsed.holder, holder.did);
    assert_eq!(parsed.verifiable_credential.len(), 1);
    assert_eq!(parsed.verifiable_credential[0].proof, vc.proof);

    assert!(parse_jwt_presentation(&jwt, &resolver, Some("did:web:other.example.com"))
        .await
        .is_err());
}

// =========================================================================
// Revocation
// =========================================================================

#[tokio::test]
async fn test_status_list_revocation() {
    let issuer = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let subject = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let resolver = offline_resolver();
    let list_url = "https://issuer.example.com/status/1";

    let credential = make_revocable(
        employment_credential(&issuer, &subject),
        &RevocationOptions {
            id: format!("{}#42", list_url),
            status_list_index: 42,
            status_list_url: list_url.into(),
        },
    );
    let vc = sign_credential(&credential, &SignOptions::new(issuer.did.clone(), &issuer.signer))
        .unwrap()
        .verifiable_credential;

    let mut bits = StatusBitstring::new(DEFAULT_STATUS_LIST_LENGTH);
    let status_list = |bits: &StatusBitstring| {
        create_status_list_credential(StatusListParams {
            url: list_url.into(),
            encoded_list: bits.encode().unwrap(),
            issuer: issuer.did.clone(),
        })
    };

    let active = status_list(&bits);
    let options = VerifyCredentialOptions::new(&resolver).status_list(&active);
    verify_parsed_credential(&vc, &options).await.expect("not revoked");

    bits.set(42, true).unwrap();
    let revoked = status_list(&bits);
    let options = VerifyCredentialOptions::new(&resolver).status_list(&revoked);
    assert!(matches!(
        verify_parsed_credential(&vc, &options).await,
        Err(CredentialError::Revoked)
    ));
}
