/// Errors raised while decoding a proof query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("not defined query key: {0}")]
    NotDefinedQueryKey(String),

    #[error("not defined comparator: {0}")]
    NotDefinedComparator(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
