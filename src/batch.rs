//! Batch reconciliation across many documents.
//!
//! Both batches are sorted by document name and must contain exactly the
//! same names. Documents are reconciled independently and the records are
//! concatenated in name order, so the output does not depend on the order
//! in which either batch was supplied.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::canonical::canonical_hash_hex;
use crate::error::ReconcileError;
use crate::metrics::ComparisonSummary;
use crate::policy::ReconcileOptions;
use crate::reconciler::{FirstFound, MatchSelector, Reconciler};
use crate::source::AnnotationSource;
use crate::types::{ComparisonRecord, Document};

/// Result of a batch reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReconcileResult {
    /// Fingerprint of the options used.
    pub options_hash: String,
    /// Selection strategy used.
    pub selector: String,
    /// All records, in document-name order.
    pub records: Vec<ComparisonRecord>,
    /// Per-document summary.
    pub registry: DocumentRegistry,
    /// Fingerprint of `records`.
    pub records_hash: String,
}

impl BatchReconcileResult {
    /// Summary over the whole batch.
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary::from_records(&self.records)
    }

    /// Records of one document.
    pub fn records_for<'a>(&'a self, document_name: &'a str) -> impl Iterator<Item = &'a ComparisonRecord> {
        self.records
            .iter()
            .filter(move |r| r.document_name() == document_name)
    }
}

/// Registry of all documents in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRegistry {
    /// One entry per document, in name order.
    pub entries: Vec<DocumentRegistryEntry>,
    /// Hash of the registry for integrity verification.
    pub registry_hash: String,
}

/// Per-document metadata in the registry.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRegistryEntry {
    /// Document name.
    pub document_name: String,
    /// Annotations in the first batch's document.
    pub annotations_a: usize,
    /// Annotations in the second batch's document.
    pub annotations_b: usize,
    /// Record counts per kind.
    pub summary: ComparisonSummary,
}

impl DocumentRegistry {
    /// Create a new registry from entries.
    pub fn new(entries: Vec<DocumentRegistryEntry>) -> Self {
        let registry_hash = canonical_hash_hex(&entries);
        Self {
            entries,
            registry_hash,
        }
    }

    /// Get entry by document name.
    pub fn get(&self, document_name: &str) -> Option<&DocumentRegistryEntry> {
        self.entries.iter().find(|e| e.document_name == document_name)
    }
}

/// Batch reconciler for pairing two batches of documents.
#[derive(Debug, Clone, Default)]
pub struct BatchReconciler<M: MatchSelector = FirstFound> {
    reconciler: Reconciler<M>,
}

impl BatchReconciler<FirstFound> {
    /// Create a batch reconciler with the reference first-found selection.
    pub fn new(options: ReconcileOptions) -> Self {
        Self {
            reconciler: Reconciler::new(options),
        }
    }
}

impl<M: MatchSelector> BatchReconciler<M> {
    /// Wrap an existing single-document reconciler.
    pub fn from_reconciler(reconciler: Reconciler<M>) -> Self {
        Self { reconciler }
    }

    /// Get the underlying reconciler.
    pub fn reconciler(&self) -> &Reconciler<M> {
        &self.reconciler
    }

    /// Reconcile two batches of documents.
    ///
    /// Fails with [`ReconcileError::BatchMismatch`] when the batches do not
    /// hold the same document names, or when a name repeats within a batch.
    /// Any error aborts the whole batch; no partial result is returned.
    pub fn reconcile_batch(
        &self,
        batch_a: &[Document],
        batch_b: &[Document],
    ) -> Result<BatchReconcileResult, ReconcileError> {
        let pairs = pair_documents(batch_a, batch_b)?;

        let per_document = self.reconcile_pairs(&pairs)?;

        let mut entries = Vec::with_capacity(pairs.len());
        let mut records = Vec::new();
        for ((document_a, document_b), document_records) in pairs.iter().zip(per_document) {
            entries.push(DocumentRegistryEntry {
                document_name: document_a.name.clone(),
                annotations_a: document_a.len(),
                annotations_b: document_b.len(),
                summary: ComparisonSummary::from_records(&document_records),
            });
            records.extend(document_records);
        }

        let registry = DocumentRegistry::new(entries);
        let records_hash = canonical_hash_hex(&records);

        tracing::info!(
            documents = registry.entries.len(),
            records = records.len(),
            selector = self.reconciler.selector().name(),
            records_hash = %records_hash,
            "Reconciled batch"
        );

        Ok(BatchReconcileResult {
            options_hash: self.reconciler.options().params_hash(),
            selector: self.reconciler.selector().name().to_string(),
            records,
            registry,
            records_hash,
        })
    }

    /// Load both batches from annotation sources and reconcile them.
    pub fn reconcile_sources<A, B>(&self, source_a: &A, source_b: &B) -> Result<BatchReconcileResult, ReconcileError>
    where
        A: AnnotationSource,
        B: AnnotationSource,
    {
        let batch_a = source_a
            .load_documents()
            .map_err(|e| ReconcileError::from_source(source_a.source_name(), e))?;
        let batch_b = source_b
            .load_documents()
            .map_err(|e| ReconcileError::from_source(source_b.source_name(), e))?;

        tracing::debug!(
            source_a = source_a.source_name(),
            source_b = source_b.source_name(),
            documents_a = batch_a.len(),
            documents_b = batch_b.len(),
            "Loaded annotation sources"
        );

        self.reconcile_batch(&batch_a, &batch_b)
    }

    #[cfg(not(feature = "parallel"))]
    fn reconcile_pairs(
        &self,
        pairs: &[(&Document, &Document)],
    ) -> Result<Vec<Vec<ComparisonRecord>>, ReconcileError> {
        pairs
            .iter()
            .map(|(a, b)| self.reconciler.reconcile(a, b))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn reconcile_pairs(
        &self,
        pairs: &[(&Document, &Document)],
    ) -> Result<Vec<Vec<ComparisonRecord>>, ReconcileError> {
        use rayon::prelude::*;

        // Indexed collect keeps name order.
        pairs
            .par_iter()
            .map(|(a, b)| self.reconciler.reconcile(a, b))
            .collect()
    }
}

/// Reconcile two batches with the reference first-found selection and
/// return the concatenated records.
pub fn reconcile_batch(
    batch_a: &[Document],
    batch_b: &[Document],
    options: &ReconcileOptions,
) -> Result<Vec<ComparisonRecord>, ReconcileError> {
    BatchReconciler::new(options.clone())
        .reconcile_batch(batch_a, batch_b)
        .map(|result| result.records)
}

/// Sort both batches by name and pair them up, validating the name sets.
fn pair_documents<'a>(
    batch_a: &'a [Document],
    batch_b: &'a [Document],
) -> Result<Vec<(&'a Document, &'a Document)>, ReconcileError> {
    let mut sorted_a: Vec<&Document> = batch_a.iter().collect();
    let mut sorted_b: Vec<&Document> = batch_b.iter().collect();
    sorted_a.sort_by(|x, y| x.name.cmp(&y.name));
    sorted_b.sort_by(|x, y| x.name.cmp(&y.name));

    let names_a: Vec<String> = sorted_a.iter().map(|d| d.name.clone()).collect();
    let names_b: Vec<String> = sorted_b.iter().map(|d| d.name.clone()).collect();

    let reason = if let Some(name) = first_duplicate(&names_a) {
        Some(format!("document name {:?} appears more than once in the first batch", name))
    } else if let Some(name) = first_duplicate(&names_b) {
        Some(format!("document name {:?} appears more than once in the second batch", name))
    } else if names_a.len() != names_b.len() {
        Some(format!(
            "batches hold {} and {} documents",
            names_a.len(),
            names_b.len()
        ))
    } else {
        names_a
            .iter()
            .zip(&names_b)
            .position(|(a, b)| a != b)
            .map(|i| format!("document names differ at sorted index {}: {:?} vs {:?}", i, names_a[i], names_b[i]))
    };

    if let Some(reason) = reason {
        let only_a: BTreeSet<&String> = names_a.iter().filter(|n| !names_b.contains(n)).collect();
        let only_b: BTreeSet<&String> = names_b.iter().filter(|n| !names_a.contains(n)).collect();
        tracing::error!(
            reason = %reason,
            only_in_a = ?only_a,
            only_in_b = ?only_b,
            documents_a = names_a.len(),
            documents_b = names_b.len(),
            "Batches contain different documents"
        );
        return Err(ReconcileError::BatchMismatch {
            reason,
            names_a,
            names_b,
        });
    }

    Ok(sorted_a.into_iter().zip(sorted_b).collect())
}

fn first_duplicate(sorted_names: &[String]) -> Option<&String> {
    sorted_names
        .windows(2)
        .find(|pair| pair[0] == pair[1])
        .map(|pair| &pair[0])
}
