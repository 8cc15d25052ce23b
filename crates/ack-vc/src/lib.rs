//! ACK Credential Engine
//!
//! W3C Verifiable Credentials issued as JWT-VCs:
//! - credential and presentation construction
//! - signing and parsing of JWT-VCs and JWT-VPs
//! - verification with issuer trust and pluggable claim verifiers
//! - revocation through bitstring status lists

pub mod claims;
pub mod create;
pub mod error;
pub mod parse;
pub mod revocation;
pub mod signing;
pub mod types;
pub mod verifiers;
pub mod verify;

pub use claims::{
    is_controller_credential, is_credential, is_payment_receipt_credential, is_status_list_credential,
    BitstringStatusListClaim, ControllerClaim, CredentialKind, PaymentReceiptClaim,
    CONTROLLER_CREDENTIAL_TYPE, PAYMENT_RECEIPT_CREDENTIAL_TYPE, STATUS_LIST_CREDENTIAL_TYPE,
};
pub use create::{
    create_credential, create_presentation, now_iso, CreateCredentialParams, CreatePresentationParams,
};
pub use error::CredentialError;
pub use parse::{parse_jwt_credential, parse_jwt_presentation};
pub use revocation::{
    compress_bitstring, create_status_list_credential, decompress_bitstring, is_revoked,
    make_revocable, RevocationOptions, StatusBitstring, StatusListParams, DEFAULT_STATUS_LIST_LENGTH,
    REVOCATION_PURPOSE, STATUS_LIST_ENTRY_TYPE,
};
pub use signing::{
    sign_credential, sign_presentation, SignOptions, SignPresentationOptions, SignedCredential,
};
pub use types::{
    CredentialStatus, CredentialSubject, Issuer, Proof, Verifiable, W3CCredential, W3CPresentation,
    CREDENTIALS_V1_CONTEXT, JWT_PROOF_TYPE,
};
pub use verifiers::{ControllerClaimVerifier, ReceiptClaimVerifier};
pub use verify::{
    is_expired, verify_parsed_credential, verify_proof, ClaimVerifier, VerifyCredentialOptions,
};
