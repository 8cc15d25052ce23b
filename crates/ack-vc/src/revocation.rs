use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use ack_keys::encoding::{base64url_to_bytes, bytes_to_base64url};

use crate::claims::{BitstringStatusListClaim, STATUS_LIST_CREDENTIAL_TYPE, STATUS_LIST_TYPE};
use crate::create::{create_credential, CreateCredentialParams};
use crate::error::CredentialError;
use crate::types::{CredentialStatus, W3CCredential};

pub const STATUS_LIST_ENTRY_TYPE: &str = "BitstringStatusListEntry";
pub const REVOCATION_PURPOSE: &str = "revocation";

/// Minimum list length, in bits (16 KiB).
pub const DEFAULT_STATUS_LIST_LENGTH: usize = 131_072;

/// Where a credential's revocation bit lives.
#[derive(Debug, Clone)]
pub struct RevocationOptions {
    pub id: String,
    pub status_list_index: usize,
    pub status_list_url: String,
}

/// Attach a `BitstringStatusListEntry` to a credential.
pub fn make_revocable(mut credential: W3CCredential, options: &RevocationOptions) -> W3CCredential {
    credential.credential_status = Some(CredentialStatus {
        id: options.id.clone(),
        status_type: STATUS_LIST_ENTRY_TYPE.into(),
        status_purpose: Some(REVOCATION_PURPOSE.into()),
        status_list_index: Some(options.status_list_index.to_string()),
        status_list_credential: Some(options.status_list_url.clone()),
    });
    credential
}

/// Parameters for [`create_status_list_credential`].
#[derive(Debug, Clone)]
pub struct StatusListParams {
    /// Where the status list credential is published.
    pub url: String,
    pub encoded_list: String,
    pub issuer: String,
}

/// Build an unsigned `BitstringStatusListCredential` for a revocation list.
pub fn create_status_list_credential(params: StatusListParams) -> W3CCredential {
    create_credential(
        CreateCredentialParams::new(params.issuer, format!("{}#list", params.url))
            .id(params.url)
            .credential_type(STATUS_LIST_CREDENTIAL_TYPE)
            .claim("type", STATUS_LIST_TYPE)
            .claim("statusPurpose", REVOCATION_PURPOSE)
            .claim("encodedList", params.encoded_list),
    )
}

/// GZIP-compress a bitstring and encode it as multibase base64url (`u` prefix).
pub fn compress_bitstring(bits: &[u8]) -> Result<String, CredentialError> {
    let invalid = |e: std::io::Error| CredentialError::InvalidStatusList(e.to_string());
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bits).map_err(invalid)?;
    let compressed = encoder.finish().map_err(invalid)?;
    Ok(format!("u{}", bytes_to_base64url(&compressed)))
}

/// Decode an `encodedList`. The `u` prefix is optional.
pub fn decompress_bitstring(encoded: &str) -> Result<Vec<u8>, CredentialError> {
    let encoded = encoded.strip_prefix('u').unwrap_or(encoded);
    let compressed = base64url_to_bytes(encoded)
        .map_err(|e| CredentialError::InvalidStatusList(e.to_string()))?;

    let mut bits = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut bits)
        .map_err(|e| CredentialError::InvalidStatusList(e.to_string()))?;
    Ok(bits)
}

/// A status bitstring. Index 0 is the most significant bit of the first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBitstring {
    bytes: Vec<u8>,
}

impl Default for StatusBitstring {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_LIST_LENGTH)
    }
}

impl StatusBitstring {
    /// A cleared bitstring of at least `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn decode(encoded: &str) -> Result<Self, CredentialError> {
        Ok(Self::from_bytes(decompress_bitstring(encoded)?))
    }

    pub fn encode(&self) -> Result<String, CredentialError> {
        compress_bitstring(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Out-of-range indices read as unset.
    pub fn get(&self, index: usize) -> bool {
        self.bytes
            .get(index / 8)
            .map(|byte| byte & (0x80 >> (index % 8)) != 0)
            .unwrap_or(false)
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), CredentialError> {
        let len = self.len();
        let byte = self.bytes.get_mut(index / 8).ok_or_else(|| {
            CredentialError::InvalidStatusList(format!("index {} out of range for {} bits", index, len))
        })?;
        let mask = 0x80 >> (index % 8);
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        Ok(())
    }
}

/// Whether `credential` is marked revoked in `status_list`.
///
/// Credentials without a `BitstringStatusListEntry` are never revoked. The
/// status list must be the one the entry references.
pub fn is_revoked(
    credential: &W3CCredential,
    status_list: &W3CCredential,
) -> Result<bool, CredentialError> {
    let status = match &credential.credential_status {
        Some(status) if status.status_type == STATUS_LIST_ENTRY_TYPE => status,
        _ => return Ok(false),
    };

    let list_url = status.status_list_credential.as_deref().ok_or_else(|| {
        CredentialError::InvalidStatusList("status entry has no statusListCredential".into())
    })?;
    if status_list.id.as_deref() != Some(list_url) {
        return Err(CredentialError::InvalidStatusList(format!(
            "status list {} does not match {}",
            status_list.id.as_deref().unwrap_or("<none>"),
            list_url
        )));
    }

    let index: usize = status
        .status_list_index
        .as_deref()
        .and_then(|i| i.parse().ok())
        .ok_or_else(|| CredentialError::InvalidStatusList("invalid statusListIndex".into()))?;

    let claim = BitstringStatusListClaim::from_subject(&status_list.credential_subject)
        .ok_or_else(|| CredentialError::InvalidStatusList("not a BitstringStatusList".into()))?;
    if status.status_purpose.as_deref().unwrap_or(REVOCATION_PURPOSE) != claim.status_purpose {
        return Err(CredentialError::InvalidStatusList(format!(
            "status purpose {} does not match list purpose {}",
            status.status_purpose.as_deref().unwrap_or(REVOCATION_PURPOSE),
            claim.status_purpose
        )));
    }

    let bits = StatusBitstring::decode(&claim.encoded_list)?;
    if index >= bits.len() {
        return Err(CredentialError::InvalidStatusList(format!(
            "index {} out of range for {} bits",
            index,
            bits.len()
        )));
    }
    Ok(bits.get(index))
}
