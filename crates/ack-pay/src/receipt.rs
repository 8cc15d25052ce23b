use serde_json::{Map, Value};

use ack_did::DidResolver;
use ack_jwt::is_jwt_string;
use ack_vc::{
    create_credential, is_credential, parse_jwt_credential, verify_parsed_credential,
    CreateCredentialParams, CredentialError, CredentialKind, ReceiptClaimVerifier, Verifiable,
    VerifyCredentialOptions, W3CCredential, PAYMENT_RECEIPT_CREDENTIAL_TYPE,
};

use crate::error::PaymentError;
use crate::request::PaymentRequest;
use crate::token::{verify_payment_request_token, VerifyPaymentRequestTokenOptions};

/// Parameters for [`create_payment_receipt`].
#[derive(Debug, Clone)]
pub struct CreatePaymentReceiptParams {
    /// The payment request token, embedded verbatim.
    pub payment_request_token: String,
    pub payment_option_id: String,
    /// Receipt service DID.
    pub issuer: String,
    pub payer_did: String,
    pub expiration_date: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// Build an unsigned `PaymentReceiptCredential` about the payer.
pub fn create_payment_receipt(params: CreatePaymentReceiptParams) -> W3CCredential {
    let mut attestation = Map::new();
    attestation.insert(
        "paymentRequestToken".into(),
        Value::String(params.payment_request_token),
    );
    attestation.insert(
        "paymentOptionId".into(),
        Value::String(params.payment_option_id),
    );
    if let Some(metadata) = params.metadata {
        attestation.insert("metadata".into(), Value::Object(metadata));
    }

    let mut credential_params = CreateCredentialParams::new(params.issuer, params.payer_did)
        .credential_type(PAYMENT_RECEIPT_CREDENTIAL_TYPE)
        .attestation(attestation);
    credential_params.expiration_date = params.expiration_date;
    create_credential(credential_params)
}

/// A receipt as presented by a client.
#[derive(Debug, Clone)]
pub enum ReceiptInput {
    Jwt(String),
    Credential(Box<Verifiable<W3CCredential>>),
}

impl ReceiptInput {
    /// Interpret arbitrary JSON: a JWT string or a credential object.
    pub fn from_value(value: Value) -> Result<Self, PaymentError> {
        match value {
            Value::String(s) if is_jwt_string(&s) => Ok(Self::Jwt(s)),
            value if is_credential(&value) => Ok(Self::Credential(Box::new(
                serde_json::from_value(value)
                    .map_err(|_| not_a_receipt())?,
            ))),
            _ => Err(not_a_receipt()),
        }
    }
}

fn not_a_receipt() -> PaymentError {
    CredentialError::InvalidCredential("Receipt is not a JWT or Credential".into()).into()
}

impl From<&str> for ReceiptInput {
    fn from(jwt: &str) -> Self {
        Self::Jwt(jwt.to_string())
    }
}

impl From<String> for ReceiptInput {
    fn from(jwt: String) -> Self {
        Self::Jwt(jwt)
    }
}

impl From<Verifiable<W3CCredential>> for ReceiptInput {
    fn from(credential: Verifiable<W3CCredential>) -> Self {
        Self::Credential(Box::new(credential))
    }
}

/// Options for [`verify_payment_receipt`].
pub struct VerifyPaymentReceiptOptions<'a> {
    pub resolver: &'a dyn DidResolver,
    /// Receipt services whose receipts are accepted.
    pub trusted_receipt_issuers: Option<Vec<String>>,
    /// Required issuer of the embedded payment request token.
    pub payment_request_issuer: Option<String>,
    /// Verify the embedded payment request token. Its expiry is never checked.
    pub verify_payment_request_token_jwt: bool,
}

impl<'a> VerifyPaymentReceiptOptions<'a> {
    pub fn new(resolver: &'a dyn DidResolver) -> Self {
        Self {
            resolver,
            trusted_receipt_issuers: None,
            payment_request_issuer: None,
            verify_payment_request_token_jwt: true,
        }
    }

    pub fn trusted_receipt_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trusted_receipt_issuers = Some(issuers.into_iter().map(Into::into).collect());
        self
    }

    pub fn payment_request_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.payment_request_issuer = Some(issuer.into());
        self
    }

    pub fn verify_payment_request_token_jwt(mut self, verify: bool) -> Self {
        self.verify_payment_request_token_jwt = verify;
        self
    }
}

/// A verified receipt. `payment_request` is `None` when the embedded token
/// was not verified.
#[derive(Debug, Clone)]
pub struct VerifiedPaymentReceipt {
    pub receipt: Verifiable<W3CCredential>,
    pub payment_request_token: String,
    pub payment_request: Option<PaymentRequest>,
}

/// Verify a payment receipt and, by default, the payment request token it
/// embeds.
pub async fn verify_payment_receipt(
    receipt: impl Into<ReceiptInput>,
    options: &VerifyPaymentReceiptOptions<'_>,
) -> Result<VerifiedPaymentReceipt, PaymentError> {
    let receipt = match receipt.into() {
        ReceiptInput::Jwt(jwt) => parse_jwt_credential(&jwt, options.resolver).await?,
        ReceiptInput::Credential(credential) => *credential,
    };

    let claim = match CredentialKind::classify(&receipt) {
        CredentialKind::PaymentReceipt(claim) => claim,
        _ => {
            return Err(CredentialError::InvalidCredential(
                "Credential is not a PaymentReceiptCredential".into(),
            )
            .into())
        }
    };

    let receipt_verifier = ReceiptClaimVerifier;
    let mut verify_options = VerifyCredentialOptions::new(options.resolver).verifier(&receipt_verifier);
    verify_options.trusted_issuers = options.trusted_receipt_issuers.clone();
    verify_parsed_credential(&receipt, &verify_options).await?;

    let payment_request_token = claim.payment_request_token;
    if !options.verify_payment_request_token_jwt {
        return Ok(VerifiedPaymentReceipt {
            receipt,
            payment_request_token,
            payment_request: None,
        });
    }

    if !is_jwt_string(&payment_request_token) {
        return Err(CredentialError::InvalidCredentialSubject(
            "Payment Request token is not a JWT".into(),
        )
        .into());
    }

    let mut token_options = VerifyPaymentRequestTokenOptions::new(options.resolver).verify_expiry(false);
    token_options.issuer = options.payment_request_issuer.clone();
    let verified = verify_payment_request_token(&payment_request_token, &token_options).await?;

    tracing::info!(
        receipt_issuer = %receipt.issuer.id,
        request_id = %verified.payment_request.id,
        "Verified payment receipt"
    );

    Ok(VerifiedPaymentReceipt {
        receipt,
        payment_request_token,
        payment_request: Some(verified.payment_request),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PaymentOption;
    use crate::token::{create_signed_payment_request, PaymentRequestTokenOptions};
    use ack_did::{create_did_key_uri, KeyDidResolver, UniversalDidResolver};
    use ack_jwt::create_jwt_signer;
    use ack_keys::{KeyCurve, Keypair};
    use ack_vc::{sign_credential, SignOptions};
    use serde_json::json;
    use std::sync::Arc;

    struct Party {
        did: String,
        keypair: Keypair,
    }

    impl Party {
        fn new(curve: KeyCurve) -> Self {
            let keypair = Keypair::generate(curve);
            Self {
                did: create_did_key_uri(&keypair).unwrap().to_string(),
                keypair,
            }
        }
    }

    fn resolver() -> UniversalDidResolver {
        UniversalDidResolver::new().with_method("key", Arc::new(KeyDidResolver))
    }

    fn request_token(server: &Party) -> String {
        let signer = create_jwt_signer(&server.keypair);
        let request = PaymentRequest::new(
            "req-7",
            vec![PaymentOption::new("stripe-usd", 5u64, 2, "USD", server.did.clone())],
        );
        create_signed_payment_request(request, &PaymentRequestTokenOptions::new(server.did.clone(), &signer))
            .unwrap()
            .payment_request_token
    }

    fn signed_receipt(receipt_service: &Party, token: String) -> (String, Verifiable<W3CCredential>) {
        let receipt = create_payment_receipt(CreatePaymentReceiptParams {
            payment_request_token: token,
            payment_option_id: "stripe-usd".into(),
            issuer: receipt_service.did.clone(),
            payer_did: "did:web:payer.example.com".into(),
            expiration_date: None,
            metadata: Some(json!({"paymentIntent": "pi_123"}).as_object().unwrap().clone()),
        });
        let signer = create_jwt_signer(&receipt_service.keypair);
        let signed = sign_credential(&receipt, &SignOptions::new(receipt_service.did.clone(), &signer)).unwrap();
        (signed.jwt, signed.verifiable_credential)
    }

    #[test]
    fn test_create_payment_receipt() {
        let receipt = create_payment_receipt(CreatePaymentReceiptParams {
            payment_request_token: "a.b.c".into(),
            payment_option_id: "opt".into(),
            issuer: "did:web:receipts.example.com".into(),
            payer_did: "did:web:payer.example.com".into(),
            expiration_date: Some("2030-01-01T00:00:00.000Z".into()),
            metadata: None,
        });
        assert!(receipt.has_type("PaymentReceiptCredential"));
        assert_eq!(receipt.issuer.id, "did:web:receipts.example.com");
        assert_eq!(
            receipt.credential_subject.id.as_deref(),
            Some("did:web:payer.example.com")
        );
        assert_eq!(receipt.credential_subject.claims["paymentRequestToken"], "a.b.c");
        assert!(receipt.credential_subject.claims.get("metadata").is_none());
        assert_eq!(
            receipt.expiration_date.as_deref(),
            Some("2030-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_receipt_input_from_value() {
        assert!(matches!(
            ReceiptInput::from_value(json!("a.b.c")),
            Ok(ReceiptInput::Jwt(_))
        ));
        assert!(matches!(
            ReceiptInput::from_value(json!({"hello": "world"})),
            Err(PaymentError::Credential(CredentialError::InvalidCredential(ref m)))
                if m == "Receipt is not a JWT or Credential"
        ));
        assert!(ReceiptInput::from_value(json!(42)).is_err());
    }

    #[tokio::test]
    async fn test_verify_receipt_jwt() {
        let server = Party::new(KeyCurve::Secp256k1);
        let receipt_service = Party::new(KeyCurve::Ed25519);
        let token = request_token(&server);
        let (jwt, _) = signed_receipt(&receipt_service, token.clone());

        let resolver = resolver();
        let verified = verify_payment_receipt(
            jwt.as_str(),
            &VerifyPaymentReceiptOptions::new(&resolver)
                .trusted_receipt_issuers([receipt_service.did.clone()])
                .payment_request_issuer(server.did.clone()),
        )
        .await
        .unwrap();

        assert_eq!(verified.payment_request_token, token);
        assert_eq!(verified.payment_request.unwrap().id, "req-7");
        assert_eq!(verified.receipt.issuer.id, receipt_service.did);
    }

    #[tokio::test]
    async fn test_verify_receipt_credential_without_token_check() {
        let server = Party::new(KeyCurve::Secp256r1);
        let receipt_service = Party::new(KeyCurve::Secp256k1);
        let (_, credential) = signed_receipt(&receipt_service, request_token(&server));

        let resolver = resolver();
        let verified = verify_payment_receipt(
            credential,
            &VerifyPaymentReceiptOptions::new(&resolver).verify_payment_request_token_jwt(false),
        )
        .await
        .unwrap();
        assert!(verified.payment_request.is_none());
    }

    #[tokio::test]
    async fn test_untrusted_receipt_issuer() {
        let server = Party::new(KeyCurve::Secp256k1);
        let receipt_service = Party::new(KeyCurve::Secp256k1);
        let (jwt, _) = signed_receipt(&receipt_service, request_token(&server));

        let resolver = resolver();
        let result = verify_payment_receipt(
            jwt,
            &VerifyPaymentReceiptOptions::new(&resolver)
                .trusted_receipt_issuers(["did:web:other-receipts.example.com"]),
        )
        .await;
        assert!(matches!(
            result,
            Err(PaymentError::Credential(CredentialError::UntrustedIssuer(_)))
        ));
    }

    #[tokio::test]
    async fn test_pinned_request_issuer_mismatch() {
        let server = Party::new(KeyCurve::Secp256k1);
        let impostor = Party::new(KeyCurve::Secp256k1);
        let receipt_service = Party::new(KeyCurve::Secp256k1);
        let (jwt, _) = signed_receipt(&receipt_service, request_token(&impostor));

        let resolver = resolver();
        let result = verify_payment_receipt(
            jwt,
            &VerifyPaymentReceiptOptions::new(&resolver)
                .trusted_receipt_issuers([receipt_service.did.clone()])
                .payment_request_issuer(server.did.clone()),
        )
        .await;
        assert!(matches!(result, Err(PaymentError::InvalidPaymentRequestToken(_))));
    }

    #[tokio::test]
    async fn test_non_receipt_credential_rejected() {
        let issuer = Party::new(KeyCurve::Ed25519);
        let credential = create_credential(
            CreateCredentialParams::new(issuer.did.clone(), "did:web:agent.example.com")
                .credential_type("ControllerCredential")
                .claim("controller", "did:web:owner.example.com"),
        );
        let signer = create_jwt_signer(&issuer.keypair);
        let signed = sign_credential(&credential, &SignOptions::new(issuer.did.clone(), &signer)).unwrap();

        let resolver = resolver();
        let result = verify_payment_receipt(signed.jwt, &VerifyPaymentReceiptOptions::new(&resolver)).await;
        assert!(matches!(
            result,
            Err(PaymentError::Credential(CredentialError::InvalidCredential(ref m)))
                if m == "Credential is not a PaymentReceiptCredential"
        ));
    }
}
