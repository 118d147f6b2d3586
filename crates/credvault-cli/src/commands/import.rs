//! `credvault import` — Save credentials from a JSON file.

use clap::Args;
use std::path::PathBuf;

use credvault_core::Credential;
use credvault_wallet::CredentialWallet;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file holding one credential or an array of credentials.
    pub file: PathBuf,
}

pub async fn run(args: &ImportArgs, wallet: &CredentialWallet) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", args.file.display(), e))?;
    let credentials = Credential::from_json_batch(&contents)?;
    let count = credentials.len();
    wallet.save_all(credentials).await?;
    println!("Imported {} credential(s)", count);
    Ok(())
}
