//! Comparison records produced by reconciliation.

use serde::Serialize;
use std::fmt;

use super::annotation::Annotation;

/// Outcome of comparing one annotation pair, or one unpaired annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// No annotation on the other side overlaps this one.
    NoOverlap,
    /// Overlapping pair, classes differ, attributes equivalent.
    ClassMismatch,
    /// Overlapping pair, classes equivalent, attributes differ.
    AttributeMismatch,
    /// Overlapping pair, both classes and attributes differ.
    ClassAndAttributeMismatch,
    /// Overlapping pair with equivalent classes and attributes.
    Match,
    /// Unpaired annotation counted as agreement by the no-overlap policy.
    MatchNoOverlap,
}

impl ComparisonKind {
    /// All kinds, in reporting order.
    pub const ALL: [ComparisonKind; 6] = [
        Self::NoOverlap,
        Self::ClassMismatch,
        Self::AttributeMismatch,
        Self::ClassAndAttributeMismatch,
        Self::Match,
        Self::MatchNoOverlap,
    ];

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoOverlap => "No Overlap",
            Self::ClassMismatch => "Class Mismatch",
            Self::AttributeMismatch => "Attribute Mismatch",
            Self::ClassAndAttributeMismatch => "Class and Attribute Mismatch",
            Self::Match => "Match",
            Self::MatchNoOverlap => "Match- No Overlap",
        }
    }

    /// Whether downstream metrics count this kind as agreement.
    pub fn is_agreement(&self) -> bool {
        matches!(self, Self::Match | Self::MatchNoOverlap)
    }

    /// Whether this kind describes an overlapping pair.
    pub fn is_paired(&self) -> bool {
        !matches!(self, Self::NoOverlap | Self::MatchNoOverlap)
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reconciled pair or unpaired annotation.
///
/// At least one side is always present; the constructors are the only way
/// to build a record. Side A is always the first input, side B the second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRecord {
    document_name: String,
    kind: ComparisonKind,
    annotation_a: Option<Annotation>,
    annotation_b: Option<Annotation>,
    document_length: usize,
}

impl ComparisonRecord {
    /// Record for an overlapping pair.
    pub fn paired(
        document_name: impl Into<String>,
        kind: ComparisonKind,
        annotation_a: Annotation,
        annotation_b: Annotation,
        document_length: usize,
    ) -> Self {
        Self {
            document_name: document_name.into(),
            kind,
            annotation_a: Some(annotation_a),
            annotation_b: Some(annotation_b),
            document_length,
        }
    }

    /// Record for an annotation present only in the first input.
    pub fn only_a(
        document_name: impl Into<String>,
        kind: ComparisonKind,
        annotation: Annotation,
        document_length: usize,
    ) -> Self {
        Self {
            document_name: document_name.into(),
            kind,
            annotation_a: Some(annotation),
            annotation_b: None,
            document_length,
        }
    }

    /// Record for an annotation present only in the second input.
    pub fn only_b(
        document_name: impl Into<String>,
        kind: ComparisonKind,
        annotation: Annotation,
        document_length: usize,
    ) -> Self {
        Self {
            document_name: document_name.into(),
            kind,
            annotation_a: None,
            annotation_b: Some(annotation),
            document_length,
        }
    }

    /// Name of the reconciled document.
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    /// Result kind.
    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }

    /// Annotation from the first input, if any.
    pub fn annotation_a(&self) -> Option<&Annotation> {
        self.annotation_a.as_ref()
    }

    /// Annotation from the second input, if any.
    pub fn annotation_b(&self) -> Option<&Annotation> {
        self.annotation_b.as_ref()
    }

    /// Character length of the document (taken from the first input).
    pub fn document_length(&self) -> usize {
        self.document_length
    }

    /// Whether this record counts as agreement.
    pub fn is_agreement(&self) -> bool {
        self.kind.is_agreement()
    }

    /// The annotation whose span locates this record: side A when present.
    pub fn primary_annotation(&self) -> &Annotation {
        match (&self.annotation_a, &self.annotation_b) {
            (Some(a), _) => a,
            (None, Some(b)) => b,
            (None, None) => unreachable!("comparison record without annotations"),
        }
    }

    /// Relative position of the record within the document, in `[0, 1]`.
    pub fn location_fraction(&self) -> Option<f64> {
        if self.document_length == 0 {
            return None;
        }
        Some(self.primary_annotation().start as f64 / self.document_length as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agreement_kinds() {
        let agreeing: Vec<_> = ComparisonKind::ALL
            .iter()
            .filter(|k| k.is_agreement())
            .collect();
        assert_eq!(agreeing, vec![&ComparisonKind::Match, &ComparisonKind::MatchNoOverlap]);
    }

    #[test]
    fn test_labels_match_report_wording() {
        assert_eq!(ComparisonKind::NoOverlap.to_string(), "No Overlap");
        assert_eq!(
            ComparisonKind::ClassAndAttributeMismatch.to_string(),
            "Class and Attribute Mismatch"
        );
        assert_eq!(ComparisonKind::MatchNoOverlap.to_string(), "Match- No Overlap");
    }

    #[test]
    fn test_only_b_primary_annotation() {
        let ann = Annotation::new("b1", 40, 50, "negative");
        let record = ComparisonRecord::only_b("doc", ComparisonKind::NoOverlap, ann.clone(), 100);

        assert!(record.annotation_a().is_none());
        assert_eq!(record.primary_annotation(), &ann);
        assert_eq!(record.location_fraction(), Some(0.4));
    }
}
