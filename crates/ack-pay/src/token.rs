use ack_did::DidResolver;
use ack_jwt::{
    create_jwt, verify_jwt, JwtAlgorithm, JwtOptions, JwtPayload, JwtSigner, JwtVerified,
    JwtVerifyPolicies, VerifyJwtOptions,
};

use crate::error::PaymentError;
use crate::request::PaymentRequest;

/// Who signs payment request tokens.
pub struct PaymentRequestTokenOptions<'a> {
    pub issuer: String,
    pub signer: &'a dyn JwtSigner,
    /// Defaults to the signer's algorithm.
    pub algorithm: Option<JwtAlgorithm>,
}

impl<'a> PaymentRequestTokenOptions<'a> {
    pub fn new(issuer: impl Into<String>, signer: &'a dyn JwtSigner) -> Self {
        Self {
            issuer: issuer.into(),
            signer,
            algorithm: None,
        }
    }
}

/// Sign a payment request. Every request field is a top-level claim and
/// `sub` is the request id.
pub fn create_payment_request_token(
    request: &PaymentRequest,
    options: &PaymentRequestTokenOptions<'_>,
) -> Result<String, PaymentError> {
    let payload = JwtPayload::from_serializable(request)?.subject(request.id.clone());

    let mut jwt_options = JwtOptions::new(options.issuer.clone(), options.signer);
    if let Some(alg) = options.algorithm {
        jwt_options = jwt_options.alg(alg);
    }
    Ok(create_jwt(payload, &jwt_options)?)
}

/// A validated payment request and its token.
#[derive(Debug, Clone)]
pub struct SignedPaymentRequest {
    pub payment_request: PaymentRequest,
    pub payment_request_token: String,
}

/// Validate a payment request, then sign it.
pub fn create_signed_payment_request(
    request: PaymentRequest,
    options: &PaymentRequestTokenOptions<'_>,
) -> Result<SignedPaymentRequest, PaymentError> {
    let payment_request = request.validate()?;
    let payment_request_token = create_payment_request_token(&payment_request, options)?;

    tracing::info!(
        request_id = %payment_request.id,
        issuer = %options.issuer,
        options = payment_request.payment_options.len(),
        "Created payment request"
    );

    Ok(SignedPaymentRequest {
        payment_request,
        payment_request_token,
    })
}

/// Options for [`verify_payment_request_token`].
pub struct VerifyPaymentRequestTokenOptions<'a> {
    pub resolver: &'a dyn DidResolver,
    pub verify_expiry: bool,
    /// Required token issuer.
    pub issuer: Option<String>,
}

impl<'a> VerifyPaymentRequestTokenOptions<'a> {
    pub fn new(resolver: &'a dyn DidResolver) -> Self {
        Self {
            resolver,
            verify_expiry: true,
            issuer: None,
        }
    }

    pub fn verify_expiry(mut self, verify_expiry: bool) -> Self {
        self.verify_expiry = verify_expiry;
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// A verified payment request token.
#[derive(Debug, Clone)]
pub struct VerifiedPaymentRequest {
    pub payment_request: PaymentRequest,
    pub parsed: JwtVerified,
}

/// Verify a payment request token and recover the request.
///
/// The audience is never checked: anyone holding the token may pay it.
pub async fn verify_payment_request_token(
    token: &str,
    options: &VerifyPaymentRequestTokenOptions<'_>,
) -> Result<VerifiedPaymentRequest, PaymentError> {
    let mut jwt_options = VerifyJwtOptions::new(options.resolver).policies(JwtVerifyPolicies {
        exp: options.verify_expiry,
        aud: false,
        now: None,
    });
    if let Some(issuer) = &options.issuer {
        jwt_options = jwt_options.issuer(issuer.clone());
    }

    let parsed = verify_jwt(token, &jwt_options).await.map_err(|e| {
        tracing::debug!(error = %e, "Payment request token rejected");
        PaymentError::invalid_token()
    })?;

    let value = serde_json::to_value(&parsed.payload)?;
    let payment_request = PaymentRequest::parse(value).map_err(|_| {
        PaymentError::InvalidPaymentRequestToken(
            "Payment Request token is not a valid PaymentRequest".into(),
        )
    })?;

    Ok(VerifiedPaymentRequest {
        payment_request,
        parsed,
    })
}
