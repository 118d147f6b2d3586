//! `credvault show` — Print one credential by id.

use clap::Args;

use credvault_wallet::CredentialWallet;

use super::print_json;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Credential id.
    pub id: String,
}

pub async fn run(args: &ShowArgs, wallet: &CredentialWallet) -> anyhow::Result<()> {
    match wallet.find_by_id(&args.id).await? {
        Some(credential) => print_json(&credential),
        None => anyhow::bail!("credential not found: {}", args.id),
    }
}
