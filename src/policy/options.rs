//! Reconciliation options.
//!
//! All configuration is passed explicitly; there is no process-wide default
//! state. Options serialize to a canonical form so a batch result can carry
//! the fingerprint of the options that produced it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::equivalence::{AttributeEquivalence, ClassEquivalence};
use crate::canonical::canonical_hash_hex;
use crate::types::{Annotation, ComparisonKind};

/// How an annotation with no overlapping counterpart is reported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "classes", rename_all = "snake_case")]
pub enum NoOverlapPolicy {
    /// Report `NoOverlap`, counted as disagreement.
    #[default]
    Mismatch,
    /// Report every unpaired annotation as `MatchNoOverlap`.
    AlwaysMatch,
    /// Report `MatchNoOverlap` only for annotations whose class is listed.
    MatchClasses(BTreeSet<String>),
}

impl NoOverlapPolicy {
    /// Allow-list policy from class names.
    pub fn match_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MatchClasses(classes.into_iter().map(Into::into).collect())
    }

    /// Result kind for an annotation that overlaps nothing.
    pub fn kind_for(&self, annotation: &Annotation) -> ComparisonKind {
        let agrees = match self {
            Self::Mismatch => false,
            Self::AlwaysMatch => true,
            Self::MatchClasses(classes) => classes.contains(&annotation.class),
        };
        if agrees {
            ComparisonKind::MatchNoOverlap
        } else {
            ComparisonKind::NoOverlap
        }
    }
}

/// Options for one reconciliation call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Class comparison policy.
    #[serde(default)]
    pub classes: ClassEquivalence,
    /// Attribute comparison policy.
    #[serde(default)]
    pub attributes: AttributeEquivalence,
    /// No-overlap reporting policy.
    #[serde(default)]
    pub no_overlap: NoOverlapPolicy,
}

impl ReconcileOptions {
    /// Options with exact classes, exact attributes, and no-overlap as mismatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the class policy.
    pub fn with_classes(mut self, classes: ClassEquivalence) -> Self {
        self.classes = classes;
        self
    }

    /// Replace the attribute policy.
    pub fn with_attributes(mut self, attributes: AttributeEquivalence) -> Self {
        self.attributes = attributes;
        self
    }

    /// Replace the no-overlap policy.
    pub fn with_no_overlap(mut self, no_overlap: NoOverlapPolicy) -> Self {
        self.no_overlap = no_overlap;
        self
    }

    /// Deterministic fingerprint of these options.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::EquivalenceGroups;

    #[test]
    fn test_no_overlap_kinds() {
        let negative = Annotation::new("a", 0, 3, "negative");
        let positive = Annotation::new("b", 0, 3, "positive");

        assert_eq!(NoOverlapPolicy::Mismatch.kind_for(&negative), ComparisonKind::NoOverlap);
        assert_eq!(NoOverlapPolicy::AlwaysMatch.kind_for(&positive), ComparisonKind::MatchNoOverlap);

        let allow = NoOverlapPolicy::match_classes(["negative", "hypothetical"]);
        assert_eq!(allow.kind_for(&negative), ComparisonKind::MatchNoOverlap);
        assert_eq!(allow.kind_for(&positive), ComparisonKind::NoOverlap);
    }

    #[test]
    fn test_params_hash_determinism() {
        assert_eq!(ReconcileOptions::default().params_hash(), ReconcileOptions::new().params_hash());
    }

    #[test]
    fn test_params_hash_changes() {
        let grouped = ReconcileOptions::new().with_classes(ClassEquivalence::GroupedBy(
            EquivalenceGroups::new(vec![vec!["present", "positive"]]).unwrap(),
        ));
        assert_ne!(ReconcileOptions::default().params_hash(), grouped.params_hash());
    }

    #[test]
    fn test_options_from_json_with_defaults() {
        let options: ReconcileOptions = serde_json::from_str(
            r#"{"no_overlap":{"mode":"match_classes","classes":["negative"]}}"#,
        )
        .unwrap();

        assert_eq!(options.classes, ClassEquivalence::Exact);
        assert_eq!(options.attributes, AttributeEquivalence::Exact);
        assert_eq!(options.no_overlap, NoOverlapPolicy::match_classes(["negative"]));
    }
}
