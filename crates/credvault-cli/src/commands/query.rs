//! `credvault query` — Select credentials with a JSON proof query.

use clap::Args;

use credvault_wallet::CredentialWallet;

use super::print_json;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Proof query as JSON, or `@path` to read it from a file.
    pub query: String,
}

pub async fn run(args: &QueryArgs, wallet: &CredentialWallet) -> anyhow::Result<()> {
    let raw = match args.query.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path, e))?,
        None => args.query.clone(),
    };
    let query: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("invalid query JSON: {}", e))?;

    let credentials = wallet.find_by_json_query(&query).await?;
    print_json(&credentials)
}
