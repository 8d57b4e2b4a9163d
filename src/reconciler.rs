//! Two-pass annotation reconciliation.
//!
//! The reconciler pairs annotations from two sources for one document and
//! classifies every annotation exactly once.
//!
//! ## Algorithm
//!
//! 1. **Match pass**: for each annotation in A (input order), collect the
//!    unclaimed annotations in B that overlap it with equivalent class and
//!    attributes. The [`MatchSelector`] picks one; both sides are claimed and
//!    a `Match` record is emitted.
//! 2. **Leftover pass**: for each annotation in A left unmatched, collect the
//!    unclaimed annotations in B that overlap it. If the selector picks one,
//!    it is claimed and the pair is classified as a class, attribute, or
//!    class-and-attribute mismatch. Otherwise the A annotation is reported
//!    through the [`NoOverlapPolicy`].
//! 3. Every B annotation still unclaimed is reported through the
//!    no-overlap policy.
//!
//! Output order is: matches in A order, then leftover records in A order,
//! then unclaimed B annotations in B order.
//!
//! ## Known limitation
//!
//! With the default [`FirstFound`] selector the first acceptable candidate
//! wins. When three or more annotations cluster on the same text this can
//! pair them suboptimally, e.g. one long span in A matches the first of
//! several short spans in B and the remaining short spans come out as
//! `NoOverlap`. This is the reference behaviour and is kept for output
//! compatibility; [`MaxOverlap`] is available as an alternative.

use crate::error::ReconcileError;
use crate::overlap::overlaps;
use crate::policy::{attributes_equivalent, classes_equivalent, ReconcileOptions};
use crate::types::{Annotation, ComparisonKind, ComparisonRecord, Document};

/// An unclaimed annotation from the second input that is eligible for pairing.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Position of the annotation in the second input.
    pub position: usize,
    /// The annotation itself.
    pub annotation: &'a Annotation,
}

/// Strategy for choosing among several eligible candidates.
///
/// Candidates are always passed in input order. Returning `None` leaves the
/// target unpaired in the current pass.
pub trait MatchSelector: Send + Sync {
    /// Pick an index into `candidates`.
    fn select(&self, target: &Annotation, candidates: &[Candidate<'_>]) -> Option<usize>;

    /// Stable name of the strategy, for logs.
    fn name(&self) -> &'static str;
}

/// Take the first candidate in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFound;

impl MatchSelector for FirstFound {
    fn select(&self, _target: &Annotation, candidates: &[Candidate<'_>]) -> Option<usize> {
        if candidates.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn name(&self) -> &'static str {
        "first_found"
    }
}

/// Take the candidate sharing the most characters with the target; ties go
/// to the earliest candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxOverlap;

impl MatchSelector for MaxOverlap {
    fn select(&self, target: &Annotation, candidates: &[Candidate<'_>]) -> Option<usize> {
        let span = target.span();
        candidates
            .iter()
            .enumerate()
            .max_by(|(i, x), (j, y)| {
                let x_len = span.intersection_len(&x.annotation.span());
                let y_len = span.intersection_len(&y.annotation.span());
                x_len.cmp(&y_len).then(j.cmp(i))
            })
            .map(|(i, _)| i)
    }

    fn name(&self) -> &'static str {
        "max_overlap"
    }
}

/// Reconciles the annotations of two sources for a single document.
#[derive(Debug, Clone, Default)]
pub struct Reconciler<M: MatchSelector = FirstFound> {
    options: ReconcileOptions,
    selector: M,
}

impl Reconciler<FirstFound> {
    /// Create a reconciler with the reference first-found selection.
    pub fn new(options: ReconcileOptions) -> Self {
        Self {
            options,
            selector: FirstFound,
        }
    }
}

impl<M: MatchSelector> Reconciler<M> {
    /// Create a reconciler with a custom selection strategy.
    pub fn with_selector(options: ReconcileOptions, selector: M) -> Self {
        Self { options, selector }
    }

    /// Get the options.
    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Get the selection strategy.
    pub fn selector(&self) -> &M {
        &self.selector
    }

    /// Reconcile two documents for the same source text.
    ///
    /// Records carry the name and character length of `document_a`.
    pub fn reconcile(
        &self,
        document_a: &Document,
        document_b: &Document,
    ) -> Result<Vec<ComparisonRecord>, ReconcileError> {
        if document_a.name != document_b.name {
            tracing::warn!(
                document_a = %document_a.name,
                document_b = %document_b.name,
                "Reconciling documents with different names"
            );
        }
        self.reconcile_annotations(
            &document_a.name,
            &document_a.annotations,
            &document_b.annotations,
            document_a.num_characters,
        )
    }

    /// Reconcile two annotation collections.
    ///
    /// Every annotation of both inputs appears in exactly one returned
    /// record. Inputs are never modified.
    pub fn reconcile_annotations(
        &self,
        document_name: &str,
        annotations_a: &[Annotation],
        annotations_b: &[Annotation],
        document_length: usize,
    ) -> Result<Vec<ComparisonRecord>, ReconcileError> {
        let mut matched_a = vec![false; annotations_a.len()];
        let mut claimed_b = vec![false; annotations_b.len()];
        let mut records = Vec::with_capacity(annotations_a.len().max(annotations_b.len()));

        // Match pass
        for (index_a, annotation_a) in annotations_a.iter().enumerate() {
            let mut candidates = Vec::new();
            for (index_b, annotation_b) in annotations_b.iter().enumerate() {
                if claimed_b[index_b] {
                    continue;
                }
                if self.fully_equivalent(annotation_a, annotation_b)? {
                    candidates.push(Candidate {
                        position: index_b,
                        annotation: annotation_b,
                    });
                }
            }

            if let Some(chosen) = self.choose(annotation_a, &candidates) {
                matched_a[index_a] = true;
                claimed_b[chosen.position] = true;
                records.push(ComparisonRecord::paired(
                    document_name,
                    ComparisonKind::Match,
                    annotation_a.clone(),
                    chosen.annotation.clone(),
                    document_length,
                ));
            }
        }

        // Leftover pass
        for (index_a, annotation_a) in annotations_a.iter().enumerate() {
            if matched_a[index_a] {
                continue;
            }

            let mut candidates = Vec::new();
            for (index_b, annotation_b) in annotations_b.iter().enumerate() {
                if claimed_b[index_b] {
                    continue;
                }
                if overlaps(annotation_a.span(), annotation_b.span())? {
                    candidates.push(Candidate {
                        position: index_b,
                        annotation: annotation_b,
                    });
                }
            }

            match self.choose(annotation_a, &candidates) {
                Some(chosen) => {
                    claimed_b[chosen.position] = true;
                    records.push(ComparisonRecord::paired(
                        document_name,
                        self.classify(annotation_a, chosen.annotation),
                        annotation_a.clone(),
                        chosen.annotation.clone(),
                        document_length,
                    ));
                }
                None => records.push(ComparisonRecord::only_a(
                    document_name,
                    self.options.no_overlap.kind_for(annotation_a),
                    annotation_a.clone(),
                    document_length,
                )),
            }
        }

        for (index_b, annotation_b) in annotations_b.iter().enumerate() {
            if claimed_b[index_b] {
                continue;
            }
            records.push(ComparisonRecord::only_b(
                document_name,
                self.options.no_overlap.kind_for(annotation_b),
                annotation_b.clone(),
                document_length,
            ));
        }

        tracing::debug!(
            document = %document_name,
            selector = self.selector.name(),
            annotations_a = annotations_a.len(),
            annotations_b = annotations_b.len(),
            records = records.len(),
            matches = records.iter().filter(|r| r.kind() == ComparisonKind::Match).count(),
            "Reconciled document"
        );

        Ok(records)
    }

    fn fully_equivalent(&self, first: &Annotation, second: &Annotation) -> Result<bool, ReconcileError> {
        Ok(overlaps(first.span(), second.span())?
            && classes_equivalent(first, second, &self.options.classes)
            && attributes_equivalent(first, second, &self.options.attributes))
    }

    fn choose<'a>(&self, target: &Annotation, candidates: &[Candidate<'a>]) -> Option<Candidate<'a>> {
        let index = self.selector.select(target, candidates)?;
        let chosen = candidates.get(index).copied();
        if chosen.is_none() {
            tracing::warn!(
                selector = self.selector.name(),
                index,
                candidates = candidates.len(),
                annotation = %target.id,
                "Selector returned an out-of-range candidate index; treating as no selection"
            );
        }
        chosen
    }

    /// Kind for an overlapping pair that was not taken in the match pass.
    fn classify(&self, first: &Annotation, second: &Annotation) -> ComparisonKind {
        let classes = classes_equivalent(first, second, &self.options.classes);
        let attributes = attributes_equivalent(first, second, &self.options.attributes);
        match (classes, attributes) {
            (false, true) => ComparisonKind::ClassMismatch,
            (true, false) => ComparisonKind::AttributeMismatch,
            (false, false) => ComparisonKind::ClassAndAttributeMismatch,
            // Only reachable when a selector declined a full match earlier.
            (true, true) => ComparisonKind::Match,
        }
    }
}

/// Reconcile two documents with the reference first-found selection.
pub fn reconcile(
    document_a: &Document,
    document_b: &Document,
    options: &ReconcileOptions,
) -> Result<Vec<ComparisonRecord>, ReconcileError> {
    Reconciler::new(options.clone()).reconcile(document_a, document_b)
}
