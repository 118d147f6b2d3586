//! `credvault remove` — Delete a credential by id.

use clap::Args;

use credvault_wallet::CredentialWallet;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Credential id.
    pub id: String,
}

pub async fn run(args: &RemoveArgs, wallet: &CredentialWallet) -> anyhow::Result<()> {
    wallet.remove(&args.id).await?;
    println!("Removed {}", args.id);
    Ok(())
}
