//! `ack resolve`: resolve DIDs concurrently and print their documents.

use ack_core::AckConfig;
use ack_did::{DidResolver, UniversalDidResolver};
use clap::Args;
use futures::future::join_all;
use serde_json::{Map, Value};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// DIDs to resolve.
    #[arg(required = true)]
    pub dids: Vec<String>,
}

pub async fn run(args: &ResolveArgs, config: &AckConfig) -> anyhow::Result<()> {
    let resolver = UniversalDidResolver::from_config(&config.resolver)?;

    let results = join_all(args.dids.iter().map(|did| resolver.resolve(did))).await;

    let mut documents = Map::new();
    let mut failures = 0usize;
    for (did, result) in args.dids.iter().zip(results) {
        match result {
            Ok(document) => {
                documents.insert(did.clone(), serde_json::to_value(document)?);
            }
            Err(e) => {
                tracing::debug!(did = %did, error = %e, "Resolution failed");
                eprintln!("{}: {}", did, e);
                failures += 1;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(documents))?);
    if failures > 0 {
        anyhow::bail!("{} of {} DIDs failed to resolve", failures, args.dids.len());
    }
    Ok(())
}
