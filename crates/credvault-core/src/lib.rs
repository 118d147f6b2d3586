//! Credvault Core — the credential record shared by the storage, query and
//! wallet layers.
//!
//! The record mirrors the W3C Verifiable Credential document shape. This
//! crate trusts that shape; it performs no schema validation of its own.

pub mod credential;
pub mod error;

pub use credential::{Credential, CredentialSchemaRef, Identified};
pub use error::CoreError;
