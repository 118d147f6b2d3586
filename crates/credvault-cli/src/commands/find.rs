//! `credvault find` — Find credentials by context and type.

use clap::Args;

use credvault_wallet::CredentialWallet;

use super::print_json;

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Context the credential must carry.
    #[arg(short, long)]
    pub context: String,

    /// Type the credential must carry.
    #[arg(short = 't', long = "type")]
    pub credential_type: String,
}

pub async fn run(args: &FindArgs, wallet: &CredentialWallet) -> anyhow::Result<()> {
    let credentials = wallet
        .find_by_context_type(&args.context, &args.credential_type)
        .await?;
    print_json(&credentials)
}
