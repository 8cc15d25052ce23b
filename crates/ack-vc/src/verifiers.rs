use async_trait::async_trait;

use ack_did::DidResolver;

use crate::claims::{
    ControllerClaim, PaymentReceiptClaim, CONTROLLER_CREDENTIAL_TYPE, PAYMENT_RECEIPT_CREDENTIAL_TYPE,
};
use crate::error::CredentialError;
use crate::types::CredentialSubject;
use crate::verify::ClaimVerifier;

fn has_type(credential_type: &[String], wanted: &str) -> bool {
    credential_type.iter().any(|t| t == wanted)
}

/// Checks a `ControllerCredential`: the subject's resolved DID document must
/// name the claimed controller.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControllerClaimVerifier;

#[async_trait]
impl ClaimVerifier for ControllerClaimVerifier {
    fn accepts(&self, credential_type: &[String]) -> bool {
        has_type(credential_type, CONTROLLER_CREDENTIAL_TYPE)
    }

    async fn verify(
        &self,
        subject: &CredentialSubject,
        resolver: &dyn DidResolver,
    ) -> Result<(), CredentialError> {
        let claim = ControllerClaim::from_subject(subject).ok_or_else(|| {
            CredentialError::InvalidCredentialSubject(
                "Credential subject is not a valid controller claim".into(),
            )
        })?;

        let resolved = resolver.resolve_with_controller(&claim.id).await?;
        let actual = resolved
            .controller
            .map(|controller| controller.id)
            .unwrap_or_default();

        if actual != claim.controller {
            tracing::debug!(
                subject = %claim.id,
                expected = %claim.controller,
                actual = %actual,
                "Controller claim rejected"
            );
            return Err(CredentialError::InvalidControllerClaim {
                expected: claim.controller,
                actual,
            });
        }
        Ok(())
    }
}

/// Checks that a `PaymentReceiptCredential` subject has the receipt shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReceiptClaimVerifier;

#[async_trait]
impl ClaimVerifier for ReceiptClaimVerifier {
    fn accepts(&self, credential_type: &[String]) -> bool {
        has_type(credential_type, PAYMENT_RECEIPT_CREDENTIAL_TYPE)
    }

    async fn verify(
        &self,
        subject: &CredentialSubject,
        _resolver: &dyn DidResolver,
    ) -> Result<(), CredentialError> {
        PaymentReceiptClaim::from_subject(subject)
            .map(|_| ())
            .ok_or_else(|| {
                CredentialError::InvalidCredentialSubject(
                    "Credential subject is not a valid payment receipt".into(),
                )
            })
    }
}
