//! `ack verify-jwt`: verify a JWT signature against the issuer's DID document.

use ack_core::AckConfig;
use ack_did::UniversalDidResolver;
use ack_jwt::{verify_jwt, VerifyJwtOptions};
use clap::Args;
use serde_json::json;

#[derive(Args, Debug)]
pub struct VerifyJwtArgs {
    /// The compact JWT.
    pub jwt: String,

    /// Required issuer DID.
    #[arg(long)]
    pub issuer: Option<String>,

    /// Audience that must appear in `aud`. Without it `aud` is not checked.
    #[arg(long)]
    pub audience: Option<String>,
}

pub async fn run(args: &VerifyJwtArgs, config: &AckConfig) -> anyhow::Result<()> {
    let resolver = UniversalDidResolver::from_config(&config.resolver)?;

    let mut options = VerifyJwtOptions::new(&resolver);
    if let Some(issuer) = &args.issuer {
        options = options.issuer(issuer.clone());
    }
    options = match &args.audience {
        Some(audience) => options.audience(audience.clone()),
        None => options.skip_audience(),
    };

    let verified = verify_jwt(&args.jwt, &options).await?;
    let output = json!({
        "issuer": verified.issuer,
        "verificationMethod": verified.signer.id,
        "header": verified.header,
        "payload": verified.payload,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
