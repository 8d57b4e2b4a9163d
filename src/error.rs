//! Error taxonomy for reconciliation.
//!
//! Class and attribute mismatches are never errors: they are recorded as
//! [`ComparisonKind`](crate::ComparisonKind) values. Everything here is fatal
//! and aborts the whole call.

use crate::types::Span;

/// Error type for reconciliation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// The overlap predicate was given spans it cannot classify.
    #[error("Unhandled overlap case: first [{}, {}), second [{}, {})", first.start, first.end, second.start, second.end)]
    UnhandledOverlapCase {
        /// Span of the first annotation.
        first: Span,
        /// Span of the second annotation.
        second: Span,
    },
    /// Malformed equivalence or no-overlap configuration.
    #[error("Invalid equivalence spec: {0}")]
    InvalidEquivalenceSpec(String),
    /// The two batches do not contain the same documents.
    #[error("Batch mismatch: {reason}")]
    BatchMismatch {
        /// What disagreed.
        reason: String,
        /// Sorted document names of the first batch.
        names_a: Vec<String>,
        /// Sorted document names of the second batch.
        names_b: Vec<String>,
    },
    /// An annotation source failed to produce its documents.
    #[error("Annotation source error: {0}")]
    Source(String),
}

impl ReconcileError {
    /// Create an invalid-spec error from any displayable message.
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidEquivalenceSpec(message.into())
    }

    /// Create a source error from the failing source's name and its error.
    pub fn from_source<E: std::error::Error>(source_name: &str, e: E) -> Self {
        Self::Source(format!("{}: {}", source_name, e))
    }
}
