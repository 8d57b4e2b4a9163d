//! # annotation-reconciler
//!
//! Deterministic reconciliation of span-level text annotations.
//!
//! Given two independently produced sets of annotations over the same
//! documents (for example human annotation against an automatic annotator),
//! the reconciler pairs them up and classifies every annotation as a match
//! or a specific kind of mismatch. The output feeds inter-annotator
//! agreement and precision/recall studies.
//!
//! ## Core Contract
//!
//! 1. Every input annotation appears in exactly one [`ComparisonRecord`]
//! 2. A `Match` always means overlapping spans with equivalent class and
//!    attributes; no mismatch record has both equivalent
//! 3. Output order is a pure function of input order and options
//!
//! ## Architecture
//!
//! ```text
//! AnnotationSource → Documents → BatchReconciler → Reconciler → ComparisonRecords → metrics
//!                                                     ↓
//!                                  overlaps() + ClassEquivalence/AttributeEquivalence
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Batches are processed in document-name order
//! - Within a document: matches, then leftovers in A order, then unclaimed B
//! - Options and results carry canonical fingerprints

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod error;
pub mod overlap;
pub mod policy;
pub mod reconciler;
pub mod batch;
pub mod source;
pub mod metrics;
pub mod canonical;

// Re-exports
pub use types::{Annotation, ClassifiedDocument, ComparisonKind, ComparisonRecord, Document, Span};
pub use error::ReconcileError;
pub use overlap::overlaps;
pub use policy::{
    attributes_equivalent, classes_equivalent, AttributeEquivalence, ClassEquivalence,
    EquivalenceGroups, KeyEquivalence, NoOverlapPolicy, ReconcileOptions,
};
pub use reconciler::{reconcile, Candidate, FirstFound, MatchSelector, MaxOverlap, Reconciler};
pub use batch::{
    reconcile_batch, BatchReconcileResult, BatchReconciler, DocumentRegistry, DocumentRegistryEntry,
};
pub use source::{AnnotationSource, InMemoryAnnotationSource};
pub use metrics::{
    compute_document_classification_metrics, compute_record_metrics, discrepancies, BinaryMetrics,
    ComparisonSummary, GoldStandard,
};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
