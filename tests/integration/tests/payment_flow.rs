//! Integration test: a 402 payment round trip.
//!
//! A resource server issues a signed payment request, a receipt service
//! issues a receipt once the client pays, and the server verifies it.

use ack_integration_tests::{offline_resolver, TestIdentity};
use ack_keys::KeyCurve;
use ack_pay::{
    create_payment_receipt, create_signed_payment_request, receipt_from_authorization_header,
    verify_payment_receipt, verify_payment_request_token, CreatePaymentReceiptParams, PaymentError,
    PaymentOption, PaymentRequest, PaymentRequestTokenOptions, PaymentRequiredBody,
    VerifyPaymentReceiptOptions, VerifyPaymentRequestTokenOptions, PAYMENT_REQUIRED_STATUS,
};
use ack_vc::{sign_credential, CredentialError, SignOptions};
use chrono::{Duration, Utc};

struct Parties {
    server: TestIdentity,
    receipt_service: TestIdentity,
    client: TestIdentity,
}

fn parties() -> Parties {
    Parties {
        server: TestIdentity::did_key(KeyCurve::Secp256k1).unwrap(),
        receipt_service: TestIdentity::did_key(KeyCurve::Ed25519).unwrap(),
        client: TestIdentity::did_key(KeyCurve::Secp256r1).unwrap(),
    }
}

fn premium_request(parties: &Parties) -> PaymentRequest {
    PaymentRequest::new(
        "premium-content-1",
        vec![
            PaymentOption::new("stripe-usd", 5u64, 2, "USD", parties.server.did.clone())
                .receipt_service(parties.receipt_service.did.clone()),
            PaymentOption::new("usdc-base-sepolia", 50_000u64, 6, "USDC", "0x7a3b000000000000000000000000000000000001")
                .network("eip155:84532")
                .receipt_service(parties.receipt_service.did.clone()),
        ],
    )
    .description("Premium content")
    .expires_at(Utc::now() + Duration::minutes(15))
}

/// The receipt service attests that `option_id` of `token` was paid.
fn issue_receipt(parties: &Parties, token: &str, option_id: &str) -> String {
    let receipt = create_payment_receipt(CreatePaymentReceiptParams {
        payment_request_token: token.to_string(),
        payment_option_id: option_id.to_string(),
        issuer: parties.receipt_service.did.clone(),
        payer_did: parties.client.did.clone(),
        expiration_date: None,
        metadata: None,
    });
    sign_credential(
        &receipt,
        &SignOptions::new(parties.receipt_service.did.clone(), &parties.receipt_service.signer),
    )
    .expect("sign receipt")
    .jwt
}

// =========================================================================
// Full flow
// =========================================================================

#[tokio::test]
async fn test_payment_required_to_receipt() {
    let parties = parties();
    let resolver = offline_resolver();

    // Server answers 402 with a signed request.
    let signed = create_signed_payment_request(
        premium_request(&parties),
        &PaymentRequestTokenOptions::new(parties.server.did.clone(), &parties.server.signer),
    )
    .expect("signed request");
    let body = serde_json::to_value(PaymentRequiredBody::from(signed.clone())).unwrap();
    assert_eq!(PAYMENT_REQUIRED_STATUS, 402);

    // Client checks the request came from the server, then picks an option.
    let received: PaymentRequiredBody = serde_json::from_value(body).unwrap();
    let verified = verify_payment_request_token(
        &received.payment_request_token,
        &VerifyPaymentRequestTokenOptions::new(&resolver).issuer(parties.server.did.clone()),
    )
    .await
    .expect("request token");
    assert_eq!(verified.payment_request, signed.payment_request);
    let option = verified.payment_request.find_option("stripe-usd").expect("option");
    assert_eq!(option.currency, "USD");

    // Receipt service issues a receipt after payment settles.
    let receipt = issue_receipt(&parties, &received.payment_request_token, &option.id);

    // Client retries with the receipt as a bearer token.
    let header = format!("Bearer {}", receipt);
    let presented = receipt_from_authorization_header(&header).expect("bearer");

    let result = verify_payment_receipt(
        presented,
        &VerifyPaymentReceiptOptions::new(&resolver)
            .trusted_receipt_issuers([parties.receipt_service.did.clone()])
            .payment_request_issuer(parties.server.did.clone()),
    )
    .await
    .expect("receipt");

    let request = result.payment_request.expect("embedded request");
    assert_eq!(request.id, "premium-content-1");
    assert_eq!(result.payment_request_token, received.payment_request_token);
    assert_eq!(
        result.receipt.credential_subject.id.as_deref(),
        Some(parties.client.did.as_str())
    );
}

// =========================================================================
// Rejections
// =========================================================================

#[tokio::test]
async fn test_receipt_for_foreign_request_rejected() {
    let parties = parties();
    let rogue = TestIdentity::did_key(KeyCurve::Secp256k1).unwrap();
    let resolver = offline_resolver();

    // A request signed by someone other than the server.
    let signed = create_signed_payment_request(
        premium_request(&parties),
        &PaymentRequestTokenOptions::new(rogue.did.clone(), &rogue.signer),
    )
    .unwrap();
    let receipt = issue_receipt(&parties, &signed.payment_request_token, "stripe-usd");

    let result = verify_payment_receipt(
        receipt.as_str(),
        &VerifyPaymentReceiptOptions::new(&resolver)
            .trusted_receipt_issuers([parties.receipt_service.did.clone()])
            .payment_request_issuer(parties.server.did.clone()),
    )
    .await;
    assert!(matches!(result, Err(PaymentError::InvalidPaymentRequestToken(_))));
}

#[tokio::test]
async fn test_receipt_from_untrusted_service_rejected() {
    let parties = parties();
    let resolver = offline_resolver();

    let signed = create_signed_payment_request(
        premium_request(&parties),
        &PaymentRequestTokenOptions::new(parties.server.did.clone(), &parties.server.signer),
    )
    .unwrap();
    let receipt = issue_receipt(&parties, &signed.payment_request_token, "stripe-usd");

    let result = verify_payment_receipt(
        receipt.as_str(),
        &VerifyPaymentReceiptOptions::new(&resolver)
            .trusted_receipt_issuers([parties.server.did.clone()]),
    )
    .await;
    assert!(matches!(
        result,
        Err(PaymentError::Credential(CredentialError::UntrustedIssuer(_)))
    ));
}

#[tokio::test]
async fn test_tampered_request_token_rejected() {
    let parties = parties();
    let resolver = offline_resolver();

    let signed = create_signed_payment_request(
        premium_request(&parties),
        &PaymentRequestTokenOptions::new(parties.server.did.clone(), &parties.server.signer),
    )
    .unwrap();

    // Replace the first character of the signature segment.
    let token = &signed.payment_request_token;
    let at = token.rfind('.').unwrap() + 1;
    let replacement = if token[at..].starts_with('A') { "B" } else { "A" };
    let token = format!("{}{}{}", &token[..at], replacement, &token[at + 1..]);

    let result = verify_payment_request_token(&token, &VerifyPaymentRequestTokenOptions::new(&resolver)).await;
    assert!(matches!(result, Err(PaymentError::InvalidPaymentRequestToken(_))));
}

#[tokio::test]
async fn test_expired_request_still_backs_receipt() {
    let parties = parties();
    let resolver = offline_resolver();

    // Receipts outlive the request they pay for.
    let request = PaymentRequest::new(
        "expired-1",
        vec![PaymentOption::new("stripe-usd", 5u64, 2, "USD", parties.server.did.clone())],
    )
    .expires_at(Utc::now() - Duration::minutes(1));
    let signed = create_signed_payment_request(
        request,
        &PaymentRequestTokenOptions::new(parties.server.did.clone(), &parties.server.signer),
    )
    .unwrap();
    assert!(signed.payment_request.is_expired());

    let receipt = issue_receipt(&parties, &signed.payment_request_token, "stripe-usd");
    let result = verify_payment_receipt(
        receipt,
        &VerifyPaymentReceiptOptions::new(&resolver)
            .trusted_receipt_issuers([parties.receipt_service.did.clone()]),
    )
    .await
    .expect("receipt outlives request");
    assert_eq!(result.payment_request.unwrap().id, "expired-1");
}
