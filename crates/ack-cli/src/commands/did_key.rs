//! `ack did-key`: derive a did:key from a public or private JWK.

use std::path::Path;

use ack_did::{create_did_key_uri, create_did_key_uri_from_public_key};
use ack_keys::{jwk_to_keypair, PrivateKeyJwk, PublicKeyJwk};
use clap::Args;
use serde_json::Value;

#[derive(Args, Debug)]
pub struct DidKeyArgs {
    /// A JWK as inline JSON or a path to a JSON file.
    #[arg(long)]
    pub jwk: String,
}

/// Inline JSON, or the contents of the file it names.
fn read_jwk(input: &str) -> anyhow::Result<Value> {
    let text = if Path::new(input).is_file() {
        std::fs::read_to_string(input)?
    } else {
        input.to_string()
    };
    Ok(serde_json::from_str(&text)?)
}

/// A private JWK is checked against its own public members before use.
fn did_from_jwk(jwk: Value) -> anyhow::Result<String> {
    let did = if jwk.get("d").is_some() {
        let private: PrivateKeyJwk = serde_json::from_value(jwk)?;
        create_did_key_uri(&jwk_to_keypair(&private)?)?
    } else {
        let public: PublicKeyJwk = serde_json::from_value(jwk)?;
        let (bytes, curve) = public.to_public_key()?;
        create_did_key_uri_from_public_key(&bytes, curve)?
    };
    Ok(did.to_string())
}

pub fn run(args: &DidKeyArgs) -> anyhow::Result<()> {
    let did = did_from_jwk(read_jwk(&args.jwk)?)?;
    println!("{}", did);
    Ok(())
}
