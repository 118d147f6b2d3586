//! Credvault Query
//!
//! Decodes caller-supplied proof queries into [`ProofQuery`] and evaluates
//! them against credentials with [`QueryEngine`]. Unknown query keys and
//! unknown operators are rejected while decoding, before any credential is
//! looked at.

pub mod engine;
pub mod error;
pub mod operator;
pub mod query;

pub use engine::QueryEngine;
pub use error::QueryError;
pub use operator::{Operator, SubjectCondition};
pub use query::{IssuerFilter, ProofQuery, WILDCARD_ISSUER};
