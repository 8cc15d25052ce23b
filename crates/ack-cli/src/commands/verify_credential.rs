//! `ack verify-credential`: parse and verify a JWT-VC.

use ack_core::AckConfig;
use ack_did::UniversalDidResolver;
use ack_vc::{
    parse_jwt_credential, verify_parsed_credential, ControllerClaimVerifier, ReceiptClaimVerifier,
    VerifyCredentialOptions,
};
use clap::Args;

#[derive(Args, Debug)]
pub struct VerifyCredentialArgs {
    /// The JWT-encoded credential.
    pub jwt: String,

    /// Trusted issuer DID (repeatable). Defaults to the configured handshake
    /// trusted issuers; with none at all any issuer is accepted.
    #[arg(long = "trusted-issuer")]
    pub trusted_issuers: Vec<String>,
}

pub async fn run(args: &VerifyCredentialArgs, config: &AckConfig) -> anyhow::Result<()> {
    let resolver = UniversalDidResolver::from_config(&config.resolver)?;
    let credential = parse_jwt_credential(&args.jwt, &resolver).await?;

    let trusted = if args.trusted_issuers.is_empty() {
        &config.handshake.trusted_issuers
    } else {
        &args.trusted_issuers
    };

    let controller = ControllerClaimVerifier;
    let receipt = ReceiptClaimVerifier;
    let mut options = VerifyCredentialOptions::new(&resolver)
        .verifier(&controller)
        .verifier(&receipt);
    if !trusted.is_empty() {
        options = options.trusted_issuers(trusted.iter().cloned());
    }

    verify_parsed_credential(&credential, &options).await?;
    tracing::info!(issuer = %credential.issuer.id, "Credential verified");

    println!("{}", serde_json::to_string_pretty(&credential)?);
    Ok(())
}
