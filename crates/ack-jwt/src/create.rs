use ack_keys::encoding::{base64url_to_bytes, bytes_to_base64url};
use serde_json::Map;

use crate::algorithm::JwtAlgorithm;
use crate::error::JwtError;
use crate::payload::{JwtHeader, JwtPayload};
use crate::signer::JwtSigner;

/// Whether a string has the compact form `header.payload.signature`, each
/// segment non-empty base64url.
pub fn is_jwt_string(value: &str) -> bool {
    let segments: Vec<&str> = value.split('.').collect();
    segments.len() == 3
        && segments.iter().all(|s| {
            !s.is_empty()
                && s
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}

/// Issuer, signer and header options for [`create_jwt`].
pub struct JwtOptions<'a> {
    pub issuer: String,
    pub signer: &'a dyn JwtSigner,
    /// Seconds after `nbf` (or `iat`) at which the token expires.
    pub expires_in: Option<i64>,
    /// Header `alg`. Defaults to the signer's algorithm.
    pub alg: Option<JwtAlgorithm>,
    pub kid: Option<String>,
}

impl<'a> JwtOptions<'a> {
    pub fn new(issuer: impl Into<String>, signer: &'a dyn JwtSigner) -> Self {
        Self {
            issuer: issuer.into(),
            signer,
            expires_in: None,
            alg: None,
            kid: None,
        }
    }

    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = Some(seconds);
        self
    }

    pub fn alg(mut self, alg: JwtAlgorithm) -> Self {
        self.alg = Some(alg);
        self
    }

    pub fn kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }
}

/// Sign a payload into a compact JWT.
///
/// `iat` defaults to now and `iss` is always the configured issuer.
pub fn create_jwt(mut payload: JwtPayload, options: &JwtOptions<'_>) -> Result<String, JwtError> {
    let alg = options.alg.unwrap_or_else(|| options.signer.algorithm());
    if alg != options.signer.algorithm() {
        return Err(JwtError::SigningFailed(format!(
            "header alg {} does not match signer alg {}",
            alg,
            options.signer.algorithm()
        )));
    }

    let iat = *payload.iat.get_or_insert_with(|| chrono::Utc::now().timestamp());
    if let Some(expires_in) = options.expires_in {
        payload.exp = Some(payload.nbf.unwrap_or(iat) + expires_in);
    }
    payload.iss = Some(options.issuer.clone());

    let header = JwtHeader {
        typ: "JWT".into(),
        alg: alg.to_string(),
        kid: options.kid.clone(),
        extra: Map::new(),
    };

    let signing_input = format!(
        "{}.{}",
        bytes_to_base64url(&serde_json::to_vec(&header)?),
        bytes_to_base64url(&serde_json::to_vec(&payload)?)
    );
    let signature = options.signer.sign(signing_input.as_bytes())?;
    let jwt = format!("{}.{}", signing_input, bytes_to_base64url(&signature));

    if !is_jwt_string(&jwt) {
        return Err(JwtError::SigningFailed("signer produced an empty signature".into()));
    }
    Ok(jwt)
}

/// A JWT split into its parts. Nothing has been verified.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedJwt {
    pub header: JwtHeader,
    pub payload: JwtPayload,
    pub signature: Vec<u8>,
    /// `header.payload` exactly as received, for signature checks.
    pub signing_input: String,
}

/// Decode a compact JWT without verifying it.
pub fn decode_jwt(jwt: &str) -> Result<DecodedJwt, JwtError> {
    if !is_jwt_string(jwt) {
        return Err(JwtError::Malformed("expected three base64url segments".into()));
    }
    let malformed = || JwtError::Malformed("expected three base64url segments".into());
    let (signing_input, signature) = jwt.rsplit_once('.').ok_or_else(malformed)?;
    let (header, payload) = signing_input.split_once('.').ok_or_else(malformed)?;

    let decode = |segment: &str, part: &str| {
        base64url_to_bytes(segment).map_err(|e| JwtError::Malformed(format!("{}: {}", part, e)))
    };
    let header: JwtHeader = serde_json::from_slice(&decode(header, "header")?)
        .map_err(|e| JwtError::Malformed(format!("header: {}", e)))?;
    let payload: JwtPayload = serde_json::from_slice(&decode(payload, "payload")?)
        .map_err(|e| JwtError::Malformed(format!("payload: {}", e)))?;
    let signature = decode(signature, "signature")?;

    Ok(DecodedJwt {
        header,
        payload,
        signature,
        signing_input: signing_input.to_string(),
    })
}
