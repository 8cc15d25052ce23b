//! `ack keygen`: generate a keypair and print its did:key and keys.

use ack_did::create_did_key_uri;
use ack_keys::{encode_public_key_from_keypair, keypair_to_jwk, KeyCurve, Keypair, PublicKeyEncoding};
use clap::Args;
use serde_json::{json, Value};

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Curve: secp256k1, secp256r1 or Ed25519.
    #[arg(long, default_value = "secp256k1")]
    pub curve: String,

    /// Public key encoding: jwk, multibase, hex or base58.
    #[arg(long, default_value = "jwk")]
    pub encoding: String,
}

/// The JSON printed for a fresh keypair.
fn describe(keypair: &Keypair, encoding: PublicKeyEncoding) -> anyhow::Result<Value> {
    let did = create_did_key_uri(keypair)?;
    let public_key = encode_public_key_from_keypair(keypair, encoding)?;
    let private_key_jwk = keypair_to_jwk(keypair)?;

    Ok(json!({
        "did": did.to_string(),
        "curve": keypair.curve(),
        "publicKey": public_key,
        "privateKeyJwk": private_key_jwk,
    }))
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    let curve: KeyCurve = args.curve.parse()?;
    let encoding: PublicKeyEncoding = args.encoding.parse()?;

    let keypair = Keypair::generate(curve);
    let output = describe(&keypair, encoding)?;
    tracing::debug!(curve = %curve, "Generated keypair");

    println!("{}", serde_json::to_string_pretty(&output)?);
    eprintln!("Keep privateKeyJwk secret: it controls this DID.");
    Ok(())
}
