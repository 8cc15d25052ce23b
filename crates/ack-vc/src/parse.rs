use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

use ack_did::DidResolver;
use ack_jwt::{verify_jwt, JwtPayload, VerifyJwtOptions};

use crate::error::CredentialError;
use crate::types::{Proof, Verifiable, W3CCredential, W3CPresentation};

fn timestamp_to_iso(seconds: i64) -> Option<String> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn embedded_object(payload: &JwtPayload, claim: &str) -> Result<Map<String, Value>, CredentialError> {
    match payload.get_claim(claim) {
        Some(Value::Object(map)) => Ok(map.clone()),
        _ => Err(CredentialError::InvalidCredential(format!(
            "JWT does not contain a `{}` claim",
            claim
        ))),
    }
}

/// Rebuild the credential carried in a JWT-VC payload. Registered claims take
/// precedence over the embedded `vc` for issuer and subject id and fill in
/// missing dates and id.
pub(crate) fn credential_from_payload(payload: &JwtPayload) -> Result<W3CCredential, CredentialError> {
    let mut vc = embedded_object(payload, "vc")?;

    if let Some(iss) = &payload.iss {
        let issuer = match vc.remove("issuer") {
            Some(Value::Object(mut issuer)) => {
                issuer.insert("id".into(), Value::String(iss.clone()));
                Value::Object(issuer)
            }
            _ => serde_json::json!({ "id": iss }),
        };
        vc.insert("issuer".into(), issuer);
    }

    if let Some(sub) = &payload.sub {
        let subject = vc
            .entry("credentialSubject")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(subject) = subject {
            subject.insert("id".into(), Value::String(sub.clone()));
        }
    }

    if !vc.contains_key("issuanceDate") {
        if let Some(date) = payload.nbf.or(payload.iat).and_then(timestamp_to_iso) {
            vc.insert("issuanceDate".into(), Value::String(date));
        }
    }
    if !vc.contains_key("expirationDate") {
        if let Some(date) = payload.exp.and_then(timestamp_to_iso) {
            vc.insert("expirationDate".into(), Value::String(date));
        }
    }
    if !vc.contains_key("id") {
        if let Some(jti) = &payload.jti {
            vc.insert("id".into(), Value::String(jti.clone()));
        }
    }
    vc.remove("proof");

    serde_json::from_value(Value::Object(vc)).map_err(|e| {
        CredentialError::InvalidCredential(format!("JWT does not contain a valid credential: {}", e))
    })
}

/// Verify a JWT-VC and return it as a credential whose `JwtProof2020` proof
/// carries the original token.
pub async fn parse_jwt_credential(
    jwt: &str,
    resolver: &dyn DidResolver,
) -> Result<Verifiable<W3CCredential>, CredentialError> {
    let verified = verify_jwt(jwt, &VerifyJwtOptions::new(resolver).skip_audience()).await?;
    let credential = credential_from_payload(&verified.payload)?;

    tracing::debug!(issuer = %verified.issuer, "Parsed JWT credential");

    Ok(Verifiable {
        inner: credential,
        proof: Proof::jwt(jwt),
    })
}

/// Verify a JWT-VP. When `domain` is given the token's `aud` must contain it.
pub async fn parse_jwt_presentation(
    jwt: &str,
    resolver: &dyn DidResolver,
    domain: Option<&str>,
) -> Result<Verifiable<W3CPresentation>, CredentialError> {
    let mut options = VerifyJwtOptions::new(resolver);
    options = match domain {
        Some(domain) => options.audience(domain),
        None => options.skip_audience(),
    };
    let verified = verify_jwt(jwt, &options).await?;

    let mut vp = embedded_object(&verified.payload, "vp")?;
    vp.insert("holder".into(), Value::String(verified.issuer.clone()));
    vp.remove("proof");
    let presentation: W3CPresentation = serde_json::from_value(Value::Object(vp)).map_err(|e| {
        CredentialError::InvalidCredential(format!("JWT does not contain a valid presentation: {}", e))
    })?;

    Ok(Verifiable {
        inner: presentation,
        proof: Proof::jwt(jwt),
    })
}
