use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use ack_did::is_did_uri;

use crate::error::PaymentError;

/// Parse an `expiresAt` value: RFC 3339, or a bare `YYYY-MM-DD` date taken as
/// midnight UTC.
fn parse_expires_at(value: &str) -> Result<DateTime<Utc>, PaymentError> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            PaymentError::InvalidPaymentRequest(format!("expiresAt is not a date: {}", value))
        })
}

/// A payment amount in the currency's smallest unit: a positive integer, or a
/// decimal string for values that do not fit a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Integer(u64),
    Decimal(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Integer(value) => write!(f, "{}", value),
            Amount::Decimal(value) => f.write_str(value),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Integer(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Decimal(value.to_string())
    }
}

/// Negative decimals are clamped to zero.
fn clamp_decimals<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let decimals = i64::deserialize(deserializer)?;
    u32::try_from(decimals.max(0)).map_err(serde::de::Error::custom)
}

/// One way to pay for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOption {
    pub id: String,
    pub amount: Amount,
    #[serde(deserialize_with = "clamp_decimals")]
    pub decimals: u32,
    pub currency: String,
    /// Payee: an address, CAIP-10 account id or DID.
    pub recipient: String,
    /// CAIP-2 chain id, for on-chain options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// URL or DID of the service that executes the payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_service: Option<String>,
    /// URL or DID of the service that issues receipts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_service: Option<String>,
}

impl PaymentOption {
    pub fn new(
        id: impl Into<String>,
        amount: impl Into<Amount>,
        decimals: u32,
        currency: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount: amount.into(),
            decimals,
            currency: currency.into(),
            recipient: recipient.into(),
            network: None,
            payment_service: None,
            receipt_service: None,
        }
    }

    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn payment_service(mut self, service: impl Into<String>) -> Self {
        self.payment_service = Some(service.into());
        self
    }

    pub fn receipt_service(mut self, service: impl Into<String>) -> Self {
        self.receipt_service = Some(service.into());
        self
    }

    fn validate(&self) -> Result<(), PaymentError> {
        if self.amount == Amount::Integer(0) {
            return Err(PaymentError::InvalidPaymentRequest(format!(
                "payment option {}: amount must be positive",
                self.id
            )));
        }
        for (field, value) in [
            ("paymentService", &self.payment_service),
            ("receiptService", &self.receipt_service),
        ] {
            if let Some(value) = value {
                if !is_url_or_did(value) {
                    return Err(PaymentError::InvalidPaymentRequest(format!(
                        "payment option {}: {} must be a URL or DID",
                        self.id, field
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

fn is_url_or_did(value: &str) -> bool {
    is_did_uri(value) || is_url(value)
}

/// A request for payment, offered through one or more options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL the client is directed to after paying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_callback: Option<String>,
    /// RFC 3339 expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub payment_options: Vec<PaymentOption>,
}

impl PaymentRequest {
    pub fn new(id: impl Into<String>, payment_options: Vec<PaymentOption>) -> Self {
        Self {
            id: id.into(),
            description: None,
            service_callback: None,
            expires_at: None,
            payment_options,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn service_callback(mut self, url: impl Into<String>) -> Self {
        self.service_callback = Some(url.into());
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at.to_rfc3339_opts(SecondsFormat::Millis, true));
        self
    }

    pub fn find_option(&self, id: &str) -> Option<&PaymentOption> {
        self.payment_options.iter().find(|option| option.id == id)
    }

    /// Validate the request and normalise `expiresAt` to UTC with
    /// millisecond precision.
    pub fn validate(mut self) -> Result<Self, PaymentError> {
        if self.payment_options.is_empty() {
            return Err(PaymentError::InvalidPaymentRequest(
                "paymentOptions must not be empty".into(),
            ));
        }
        for option in &self.payment_options {
            option.validate()?;
        }
        if let Some(callback) = &self.service_callback {
            if !is_url(callback) {
                return Err(PaymentError::InvalidPaymentRequest(
                    "serviceCallback must be a URL".into(),
                ));
            }
        }
        if let Some(expires_at) = &self.expires_at {
            let parsed = parse_expires_at(expires_at)?;
            self.expires_at = Some(parsed.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        Ok(self)
    }

    /// Deserialize and validate. Unknown fields are ignored.
    pub fn parse(value: Value) -> Result<Self, PaymentError> {
        let request: Self = serde_json::from_value(value)
            .map_err(|e| PaymentError::InvalidPaymentRequest(e.to_string()))?;
        request.validate()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .as_deref()
            .and_then(|d| parse_expires_at(d).ok())
            .map(|d| d < Utc::now())
            .unwrap_or(false)
    }
}
