//! `ack init`: write a default configuration file.

use std::path::PathBuf;

use ack_core::AckConfig;
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("ack.toml");

    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    AckConfig::default().save(&config_path)?;
    println!("Wrote default configuration to {}", config_path.display());
    println!("Add trusted issuer DIDs under [handshake] before verifying peers.");
    Ok(())
}
