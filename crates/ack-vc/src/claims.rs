use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ack_did::is_did_uri;
use ack_jwt::is_jwt_string;

use crate::types::{CredentialSubject, W3CCredential};

pub const CONTROLLER_CREDENTIAL_TYPE: &str = "ControllerCredential";
pub const PAYMENT_RECEIPT_CREDENTIAL_TYPE: &str = "PaymentReceiptCredential";
pub const STATUS_LIST_CREDENTIAL_TYPE: &str = "BitstringStatusListCredential";
pub const STATUS_LIST_TYPE: &str = "BitstringStatusList";

/// `{id, controller}`: the subject DID is controlled by `controller`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerClaim {
    pub id: String,
    pub controller: String,
}

/// Payment receipt attestation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceiptClaim {
    pub payment_request_token: String,
    pub payment_option_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Status list subject: `{id, type: "BitstringStatusList", statusPurpose, encodedList}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitstringStatusListClaim {
    pub id: String,
    #[serde(rename = "type")]
    pub list_type: String,
    pub status_purpose: String,
    pub encoded_list: String,
}

impl ControllerClaim {
    /// Parse a credential subject. Both DIDs must be DID URIs.
    pub fn from_subject(subject: &CredentialSubject) -> Option<Self> {
        let claim: Self = serde_json::from_value(subject.to_value()).ok()?;
        (is_did_uri(&claim.id) && is_did_uri(&claim.controller)).then_some(claim)
    }
}

impl PaymentReceiptClaim {
    /// Parse a credential subject. The request token must be a compact JWT.
    pub fn from_subject(subject: &CredentialSubject) -> Option<Self> {
        let claim: Self = serde_json::from_value(subject.to_value()).ok()?;
        is_jwt_string(&claim.payment_request_token).then_some(claim)
    }
}

impl BitstringStatusListClaim {
    pub fn from_subject(subject: &CredentialSubject) -> Option<Self> {
        let claim: Self = serde_json::from_value(subject.to_value()).ok()?;
        (claim.list_type == STATUS_LIST_TYPE).then_some(claim)
    }
}

/// A credential classified by its subject shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialKind {
    StatusList(BitstringStatusListClaim),
    PaymentReceipt(PaymentReceiptClaim),
    Controller(ControllerClaim),
    Other,
}

impl CredentialKind {
    /// Classify by subject shape, first match wins: status list, payment
    /// receipt, controller.
    pub fn classify(credential: &W3CCredential) -> Self {
        let subject = &credential.credential_subject;
        if let Some(claim) = BitstringStatusListClaim::from_subject(subject) {
            return Self::StatusList(claim);
        }
        if let Some(claim) = PaymentReceiptClaim::from_subject(subject) {
            return Self::PaymentReceipt(claim);
        }
        if let Some(claim) = ControllerClaim::from_subject(subject) {
            return Self::Controller(claim);
        }
        Self::Other
    }
}

pub fn is_status_list_credential(credential: &W3CCredential) -> bool {
    matches!(CredentialKind::classify(credential), CredentialKind::StatusList(_))
}

pub fn is_payment_receipt_credential(credential: &W3CCredential) -> bool {
    matches!(
        CredentialKind::classify(credential),
        CredentialKind::PaymentReceipt(_)
    )
}

pub fn is_controller_credential(credential: &W3CCredential) -> bool {
    matches!(CredentialKind::classify(credential), CredentialKind::Controller(_))
}

/// Whether arbitrary JSON has the W3C credential envelope shape.
pub fn is_credential(value: &Value) -> bool {
    serde_json::from_value::<W3CCredential>(value.clone()).is_ok()
}
