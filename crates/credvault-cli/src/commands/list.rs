//! `credvault list` — List stored credentials.

use clap::Args;

use credvault_wallet::CredentialWallet;

use super::print_json;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print only credential ids, one per line.
    #[arg(long)]
    pub ids: bool,
}

pub async fn run(args: &ListArgs, wallet: &CredentialWallet) -> anyhow::Result<()> {
    let credentials = wallet.list().await?;
    if args.ids {
        for credential in &credentials {
            println!("{}", credential.id);
        }
        return Ok(());
    }
    print_json(&credentials)
}
