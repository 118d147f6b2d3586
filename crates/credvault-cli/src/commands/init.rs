//! `credvault init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use crate::config::WalletConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, path: &Path) -> anyhow::Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    WalletConfig::default().save(path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
