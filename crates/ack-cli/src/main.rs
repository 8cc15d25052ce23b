//! ACK CLI: command-line access to the Agent Commerce Kit trust layer.
//!
//! Subcommands: keygen, did-key, resolve, verify-jwt, verify-credential, init.

mod commands;

use std::path::PathBuf;

use ack_core::AckConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// ACK: identity and payment trust for agents.
#[derive(Parser, Debug)]
#[command(name = "ack", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "ack.toml")]
    config: PathBuf,

    /// Override the configured log level.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: text or json.
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a keypair and its did:key.
    Keygen(commands::keygen::KeygenArgs),
    /// Derive a did:key from a JWK.
    DidKey(commands::did_key::DidKeyArgs),
    /// Resolve one or more DIDs.
    Resolve(commands::resolve::ResolveArgs),
    /// Verify a JWT against its issuer's DID document.
    VerifyJwt(commands::verify_jwt::VerifyJwtArgs),
    /// Verify a JWT-encoded verifiable credential.
    VerifyCredential(commands::verify_credential::VerifyCredentialArgs),
    /// Write a default ack.toml.
    Init(commands::init::InitArgs),
}

fn init_tracing(config: &AckConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // Logs go to stderr so command output on stdout stays machine-readable.
    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AckConfig::load(&cli.config)?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    init_tracing(&config);

    match &cli.command {
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::DidKey(args) => commands::did_key::run(args),
        Commands::Resolve(args) => commands::resolve::run(args, &config).await,
        Commands::VerifyJwt(args) => commands::verify_jwt::run(args, &config).await,
        Commands::VerifyCredential(args) => commands::verify_credential::run(args, &config).await,
        Commands::Init(args) => commands::init::run(args),
    }
}
