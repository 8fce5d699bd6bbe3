//! Error taxonomy for tree construction and derived queries.

/// Errors returned by suffix-tree construction and the queries that consume
/// the finished tree. None of these are transient: every operation is a
/// deterministic function of its inputs, so nothing is ever retried.
#[derive(thiserror::Error, Debug)]
pub enum SuffixTreeError {
    /// The input cannot be indexed: it is empty, contains the sentinel
    /// character, or uses a symbol outside the declared alphabet.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A construction invariant was violated (a suffix link that must exist
    /// is missing, or node-hopping mismatched along a path guaranteed to be
    /// present). The partially built tree is malformed and must be dropped.
    #[error("internal consistency violation: {0}")]
    InternalConsistency(String),

    /// A query was issued against a tree that is not in the required state,
    /// e.g. an interval-dependent read before the annotation pass has run.
    #[error("precondition not met: {0}")]
    Precondition(String),
}
