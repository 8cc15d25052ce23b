use ack_did::{DidDocument, DidResolver, VerificationMethod};

use crate::algorithm::JwtAlgorithm;
use crate::create::{decode_jwt, DecodedJwt};
use crate::error::JwtError;
use crate::payload::{JwtHeader, JwtPayload};

/// Clock skew tolerated on `nbf`, `iat` and `exp`, in seconds.
pub const CLOCK_SKEW_SECS: i64 = 300;

/// Which time and audience checks [`verify_jwt`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JwtVerifyPolicies {
    /// Reject expired tokens.
    pub exp: bool,
    /// Require `aud` to contain the expected audience (and reject an
    /// unexpected `aud` when no audience is configured).
    pub aud: bool,
    /// Override the current time, in seconds since the epoch.
    pub now: Option<i64>,
}

impl Default for JwtVerifyPolicies {
    fn default() -> Self {
        Self {
            exp: true,
            aud: true,
            now: None,
        }
    }
}

/// Options for [`verify_jwt`].
pub struct VerifyJwtOptions<'a> {
    pub resolver: &'a dyn DidResolver,
    /// Required `iss`.
    pub issuer: Option<String>,
    /// This verifier's identity, matched against `aud`.
    pub audience: Option<String>,
    pub policies: JwtVerifyPolicies,
}

impl<'a> VerifyJwtOptions<'a> {
    pub fn new(resolver: &'a dyn DidResolver) -> Self {
        Self {
            resolver,
            issuer: None,
            audience: None,
            policies: JwtVerifyPolicies::default(),
        }
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn policies(mut self, policies: JwtVerifyPolicies) -> Self {
        self.policies = policies;
        self
    }

    /// Skip the expiry check.
    pub fn skip_expiry(mut self) -> Self {
        self.policies.exp = false;
        self
    }

    /// Skip the audience check.
    pub fn skip_audience(mut self) -> Self {
        self.policies.aud = false;
        self
    }
}

/// A verified JWT.
#[derive(Debug, Clone)]
pub struct JwtVerified {
    pub header: JwtHeader,
    pub payload: JwtPayload,
    /// The `iss` DID.
    pub issuer: String,
    /// The verification method whose key checked the signature.
    pub signer: VerificationMethod,
    pub did_document: DidDocument,
    pub jwt: String,
}

/// Candidate keys for `alg`: methods under `authentication`/`assertionMethod`
/// (all methods when neither is set) whose key curve matches.
fn candidate_keys(
    document: &DidDocument,
    alg: JwtAlgorithm,
    kid: Option<&str>,
) -> Vec<(VerificationMethod, Vec<u8>)> {
    let kid_matches = |vm: &VerificationMethod| match kid {
        Some(kid) if kid.starts_with('#') => vm.id.ends_with(kid),
        Some(kid) => vm.id == kid,
        None => true,
    };
    document
        .signing_methods()
        .into_iter()
        .filter(|vm| kid_matches(*vm))
        .filter_map(|vm| match vm.public_key() {
            Ok(Some((bytes, curve))) if curve == alg.curve() => Some((vm.clone(), bytes)),
            _ => None,
        })
        .collect()
}

fn check_times(payload: &JwtPayload, policies: &JwtVerifyPolicies) -> Result<(), JwtError> {
    let now = policies
        .now
        .unwrap_or_else(|| chrono::Utc::now().timestamp());

    if let Some(nbf) = payload.nbf {
        if nbf > now + CLOCK_SKEW_SECS {
            return Err(JwtError::NotYetValid(format!("nbf: {} > now: {}", nbf, now)));
        }
    } else if let Some(iat) = payload.iat {
        if iat > now + CLOCK_SKEW_SECS {
            return Err(JwtError::NotYetValid(format!("iat: {} > now: {}", iat, now)));
        }
    }

    if policies.exp {
        if let Some(exp) = payload.exp {
            if exp <= now - CLOCK_SKEW_SECS {
                return Err(JwtError::Expired { exp, now });
            }
        }
    }
    Ok(())
}

fn check_audience(
    payload: &JwtPayload,
    expected: Option<&str>,
    policies: &JwtVerifyPolicies,
) -> Result<(), JwtError> {
    if !policies.aud {
        return Ok(());
    }
    match (&payload.aud, expected) {
        (None, _) => Ok(()),
        (Some(_), None) => Err(JwtError::AudienceRequired),
        (Some(aud), Some(expected)) if aud.contains(expected) => Ok(()),
        (Some(_), Some(expected)) => Err(JwtError::AudienceMismatch(expected.to_string())),
    }
}

/// Verify a JWT against its issuer's DID document.
///
/// Resolves `iss`, checks the signature with a key matching the header `alg`,
/// then applies the time, audience and issuer checks.
pub async fn verify_jwt(jwt: &str, options: &VerifyJwtOptions<'_>) -> Result<JwtVerified, JwtError> {
    let DecodedJwt {
        header,
        payload,
        signature,
        signing_input,
    } = decode_jwt(jwt)?;

    let alg: JwtAlgorithm = header.alg.parse()?;
    let issuer = payload.iss.clone().ok_or(JwtError::MissingIssuer)?;

    let did_document = options.resolver.resolve(&issuer).await?;
    let candidates = candidate_keys(&did_document, alg, header.kid.as_deref());
    if candidates.is_empty() {
        return Err(JwtError::NoSuitableKeys {
            did: issuer,
            alg: alg.to_string(),
        });
    }

    let signer = candidates
        .into_iter()
        .find(|(_, public_key)| {
            ack_keys::verify(signing_input.as_bytes(), &signature, public_key, alg.curve()).is_ok()
        })
        .map(|(vm, _)| vm)
        .ok_or_else(|| JwtError::SignatureInvalid("no matching public key found".into()))?;

    check_times(&payload, &options.policies)?;
    check_audience(&payload, options.audience.as_deref(), &options.policies)?;

    if let Some(expected) = &options.issuer {
        if expected != &issuer {
            return Err(JwtError::IssuerMismatch {
                expected: expected.clone(),
                actual: issuer,
            });
        }
    }

    tracing::debug!(issuer = %issuer, kid = %signer.id, "JWT verified");
    Ok(JwtVerified {
        header,
        payload,
        issuer,
        signer,
        did_document,
        jwt: jwt.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create::{create_jwt, JwtOptions};
    use crate::signer::create_jwt_signer;
    use ack_did::{create_did_key_uri, KeyDidResolver, UniversalDidResolver};
    use ack_keys::{KeyCurve, Keypair};
    use serde_json::json;
    use std::sync::Arc;

    fn resolver() -> UniversalDidResolver {
        UniversalDidResolver::new().with_method("key", Arc::new(KeyDidResolver))
    }

    fn issue(curve: KeyCurve, payload: JwtPayload) -> (String, String) {
        let kp = Keypair::generate(curve);
        let did = create_did_key_uri(&kp).unwrap().to_string();
        let signer = create_jwt_signer(&kp);
        let jwt = create_jwt(payload, &JwtOptions::new(did.clone(), &signer)).unwrap();
        (did, jwt)
    }

    #[tokio::test]
    async fn test_verify_each_curve() {
        let resolver = resolver();
        for curve in KeyCurve::ALL {
            let (did, jwt) = issue(curve, JwtPayload::new().subject("did:example:subject"));
            let verified = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await.unwrap();
            assert_eq!(verified.issuer, did);
            assert_eq!(verified.payload.sub.as_deref(), Some("did:example:subject"));
            assert_eq!(verified.did_document.id, did);
        }
    }

    #[tokio::test]
    async fn test_required_issuer() {
        let resolver = resolver();
        let (did, jwt) = issue(KeyCurve::Secp256k1, JwtPayload::new());
        let ok = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver).issuer(did.clone())).await;
        assert!(ok.is_ok());

        let err = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver).issuer("did:example:other"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Expected issuer did:example:other, got {}", did)
        );
    }

    #[tokio::test]
    async fn test_tampered_payload_rejected() {
        let resolver = resolver();
        let (_, jwt) = issue(KeyCurve::Ed25519, JwtPayload::new().claim("amount", json!(5)));
        let decoded = decode_jwt(&jwt).unwrap();
        let mut payload = decoded.payload.clone();
        payload.claims.insert("amount".into(), json!(500));
        let forged_payload =
            ack_keys::encoding::bytes_to_base64url(&serde_json::to_vec(&payload).unwrap());
        let parts: Vec<&str> = jwt.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        let result = verify_jwt(&forged, &VerifyJwtOptions::new(&resolver)).await;
        assert!(matches!(result, Err(JwtError::SignatureInvalid(_))));
    }

    #[tokio::test]
    async fn test_spoofed_issuer_rejected() {
        let resolver = resolver();
        let victim = Keypair::generate(KeyCurve::Secp256k1);
        let victim_did = create_did_key_uri(&victim).unwrap().to_string();
        let attacker = create_jwt_signer(&Keypair::generate(KeyCurve::Secp256k1));
        let jwt = create_jwt(JwtPayload::new(), &JwtOptions::new(victim_did, &attacker)).unwrap();

        let result = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await;
        assert!(matches!(result, Err(JwtError::SignatureInvalid(_))));
    }

    #[tokio::test]
    async fn test_expired() {
        let resolver = resolver();
        let past = chrono::Utc::now().timestamp() - 3_600;
        let mut payload = JwtPayload::new().expires_at(past);
        payload.iat = Some(past - 60);
        let (_, jwt) = issue(KeyCurve::Secp256r1, payload);

        let result = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await;
        assert!(matches!(result, Err(JwtError::Expired { .. })));

        let skipped = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver).skip_expiry()).await;
        assert!(skipped.is_ok());
    }

    #[tokio::test]
    async fn test_not_yet_valid() {
        let resolver = resolver();
        let future = chrono::Utc::now().timestamp() + 3_600;
        let (_, jwt) = issue(KeyCurve::Ed25519, JwtPayload::new().not_before(future));
        let result = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await;
        assert!(matches!(result, Err(JwtError::NotYetValid(_))));
    }

    #[tokio::test]
    async fn test_audience_policies() {
        let resolver = resolver();
        let (_, jwt) = issue(
            KeyCurve::Secp256k1,
            JwtPayload::new().audience("did:web:verifier.example"),
        );

        let ok = verify_jwt(
            &jwt,
            &VerifyJwtOptions::new(&resolver).audience("did:web:verifier.example"),
        )
        .await;
        assert!(ok.is_ok());

        let wrong = verify_jwt(
            &jwt,
            &VerifyJwtOptions::new(&resolver).audience("did:web:other.example"),
        )
        .await;
        assert!(matches!(wrong, Err(JwtError::AudienceMismatch(_))));

        let missing = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await;
        assert!(matches!(missing, Err(JwtError::AudienceRequired)));

        let skipped = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver).skip_audience()).await;
        assert!(skipped.is_ok());
    }

    #[tokio::test]
    async fn test_unresolvable_issuer() {
        let resolver = resolver();
        let kp = Keypair::generate(KeyCurve::Ed25519);
        let signer = create_jwt_signer(&kp);
        let jwt = create_jwt(
            JwtPayload::new(),
            &JwtOptions::new("did:web:unknown.example", &signer),
        )
        .unwrap();
        let result = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await;
        assert!(matches!(result, Err(JwtError::Resolution(_))));
    }

    #[tokio::test]
    async fn test_kid_selects_method() {
        let resolver = resolver();
        let kp = Keypair::generate(KeyCurve::Ed25519);
        let did = create_did_key_uri(&kp).unwrap().to_string();
        let signer = create_jwt_signer(&kp);
        let fingerprint = did.trim_start_matches("did:key:");
        let options = JwtOptions::new(did.clone(), &signer).kid(format!("#{}", fingerprint));
        let jwt = create_jwt(JwtPayload::new(), &options).unwrap();

        let verified = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await.unwrap();
        assert_eq!(verified.signer.id, format!("{}#{}", did, fingerprint));

        let options = JwtOptions::new(did, &signer).kid("#missing");
        let jwt = create_jwt(JwtPayload::new(), &options).unwrap();
        let result = verify_jwt(&jwt, &VerifyJwtOptions::new(&resolver)).await;
        assert!(matches!(result, Err(JwtError::NoSuitableKeys { .. })));
    }
}
