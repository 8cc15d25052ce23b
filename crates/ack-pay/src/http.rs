use serde::{Deserialize, Serialize};

use crate::request::PaymentRequest;
use crate::token::SignedPaymentRequest;

/// HTTP status a resource server answers with when payment is required.
pub const PAYMENT_REQUIRED_STATUS: u16 = 402;

/// Body of a 402 Payment Required response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequiredBody {
    pub payment_request_token: String,
    pub payment_request: PaymentRequest,
}

impl From<SignedPaymentRequest> for PaymentRequiredBody {
    fn from(signed: SignedPaymentRequest) -> Self {
        Self {
            payment_request_token: signed.payment_request_token,
            payment_request: signed.payment_request,
        }
    }
}

/// Extract the receipt from an `Authorization: Bearer <receipt>` header value.
pub fn receipt_from_authorization_header(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
