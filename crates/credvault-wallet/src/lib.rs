//! Credvault Wallet — the holder's credential wallet.

pub mod error;
pub mod holder;

pub use error::WalletError;
pub use holder::CredentialWallet;
