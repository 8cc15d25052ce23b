//! ACK Payment Protocol
//!
//! Signed payment requests served with HTTP 402, and payment receipt
//! credentials that prove a request was paid.

pub mod error;
pub mod http;
pub mod receipt;
pub mod request;
pub mod token;

pub use error::PaymentError;
pub use http::{receipt_from_authorization_header, PaymentRequiredBody, PAYMENT_REQUIRED_STATUS};
pub use receipt::{
    create_payment_receipt, verify_payment_receipt, CreatePaymentReceiptParams, ReceiptInput,
    VerifiedPaymentReceipt, VerifyPaymentReceiptOptions,
};
pub use request::{Amount, PaymentOption, PaymentRequest};
pub use token::{
    create_payment_request_token, create_signed_payment_request, verify_payment_request_token,
    PaymentRequestTokenOptions, SignedPaymentRequest, VerifiedPaymentRequest,
    VerifyPaymentRequestTokenOptions,
};
