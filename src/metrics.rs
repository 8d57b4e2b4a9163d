//! Agreement and classification metrics over reconciliation output.
//!
//! A thin reduction over [`ComparisonRecord`]s: each record is mapped to a
//! binary label per side by a caller-supplied predicate, and the labels are
//! compared as gold standard against test. A missing annotation is a
//! negative label.

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::types::{Annotation, ClassifiedDocument, ComparisonKind, ComparisonRecord};

/// Count of records per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// `NoOverlap` records.
    pub no_overlap: usize,
    /// `ClassMismatch` records.
    pub class_mismatch: usize,
    /// `AttributeMismatch` records.
    pub attribute_mismatch: usize,
    /// `ClassAndAttributeMismatch` records.
    pub class_and_attribute_mismatch: usize,
    /// `Match` records.
    pub matches: usize,
    /// `MatchNoOverlap` records.
    pub match_no_overlap: usize,
}

impl ComparisonSummary {
    /// Tally a list of records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ComparisonRecord>,
    {
        let mut summary = Self::default();
        for record in records {
            summary.add(record.kind());
        }
        summary
    }

    /// Count one more record of `kind`.
    pub fn add(&mut self, kind: ComparisonKind) {
        *self.slot(kind) += 1;
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: ComparisonKind) -> usize {
        match kind {
            ComparisonKind::NoOverlap => self.no_overlap,
            ComparisonKind::ClassMismatch => self.class_mismatch,
            ComparisonKind::AttributeMismatch => self.attribute_mismatch,
            ComparisonKind::ClassAndAttributeMismatch => self.class_and_attribute_mismatch,
            ComparisonKind::Match => self.matches,
            ComparisonKind::MatchNoOverlap => self.match_no_overlap,
        }
    }

    /// Total number of records.
    pub fn total(&self) -> usize {
        ComparisonKind::ALL.iter().map(|&k| self.count(k)).sum()
    }

    /// Number of records counted as agreement.
    pub fn agreements(&self) -> usize {
        self.matches + self.match_no_overlap
    }

    /// Fraction of records counted as agreement; 0.0 when there are none.
    pub fn agreement(&self) -> f64 {
        ratio(self.agreements(), self.total())
    }

    /// Merge another summary into this one.
    pub fn merge(&mut self, other: &ComparisonSummary) {
        for kind in ComparisonKind::ALL {
            *self.slot(kind) += other.count(kind);
        }
    }

    fn slot(&mut self, kind: ComparisonKind) -> &mut usize {
        match kind {
            ComparisonKind::NoOverlap => &mut self.no_overlap,
            ComparisonKind::ClassMismatch => &mut self.class_mismatch,
            ComparisonKind::AttributeMismatch => &mut self.attribute_mismatch,
            ComparisonKind::ClassAndAttributeMismatch => &mut self.class_and_attribute_mismatch,
            ComparisonKind::Match => &mut self.matches,
            ComparisonKind::MatchNoOverlap => &mut self.match_no_overlap,
        }
    }
}

/// Which side of each record is the gold standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldStandard {
    /// Side A is the reference.
    #[default]
    First,
    /// Side B is the reference.
    Second,
}

/// Binary classification metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BinaryMetrics {
    /// Positive test labels that are positive in the gold standard.
    pub true_positives: usize,
    /// Positive test labels that are negative in the gold standard.
    pub false_positives: usize,
    /// Negative test labels that are positive in the gold standard.
    pub false_negatives: usize,
    /// Negative test labels that are negative in the gold standard.
    pub true_negatives: usize,
    /// tp / (tp + fp), 0.0 when undefined.
    pub precision: f64,
    /// tp / (tp + fn), 0.0 when undefined.
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0.0 when undefined.
    pub f_score: f64,
    /// Fraction of items counted as agreement.
    pub agreement: f64,
}

impl BinaryMetrics {
    /// Compute metrics from label pairs `(gold, test)` and an agreement count.
    pub fn from_labels<I>(labels: I, agreements: usize) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let mut metrics = Self::default();
        let mut total = 0;
        for (gold, test) in labels {
            total += 1;
            match (gold, test) {
                (true, true) => metrics.true_positives += 1,
                (false, true) => metrics.false_positives += 1,
                (true, false) => metrics.false_negatives += 1,
                (false, false) => metrics.true_negatives += 1,
            }
        }

        let tp = metrics.true_positives;
        metrics.precision = ratio(tp, tp + metrics.false_positives);
        metrics.recall = ratio(tp, tp + metrics.false_negatives);
        let sum = metrics.precision + metrics.recall;
        metrics.f_score = if sum > 0.0 {
            2.0 * metrics.precision * metrics.recall / sum
        } else {
            0.0
        };
        metrics.agreement = ratio(agreements, total);
        metrics
    }

    /// Number of items with a positive gold label.
    pub fn support(&self) -> usize {
        self.true_positives + self.false_negatives
    }
}

/// Precision, recall, F-score and agreement over comparison records.
///
/// `is_positive` labels a present annotation; an absent side is negative.
/// Agreement counts `Match` and `MatchNoOverlap` records.
pub fn compute_record_metrics<F>(
    records: &[ComparisonRecord],
    gold_standard: GoldStandard,
    is_positive: F,
) -> BinaryMetrics
where
    F: Fn(&Annotation) -> bool,
{
    let label = |annotation: Option<&Annotation>| annotation.map_or(false, &is_positive);

    let labels = records.iter().map(|record| {
        let (gold, test) = match gold_standard {
            GoldStandard::First => (record.annotation_a(), record.annotation_b()),
            GoldStandard::Second => (record.annotation_b(), record.annotation_a()),
        };
        (label(gold), label(test))
    });
    let agreements = records.iter().filter(|r| r.is_agreement()).count();

    BinaryMetrics::from_labels(labels, agreements)
}

/// Metrics over document-level classification labels.
///
/// Both lists are matched by document name; they must contain exactly the
/// same names. Agreement is the fraction of documents with identical labels
/// regardless of value; any label other than `positive_class` is negative.
pub fn compute_document_classification_metrics(
    gold: &[ClassifiedDocument],
    test: &[ClassifiedDocument],
    positive_class: &str,
) -> Result<BinaryMetrics, ReconcileError> {
    let mut gold_sorted: Vec<&ClassifiedDocument> = gold.iter().collect();
    let mut test_sorted: Vec<&ClassifiedDocument> = test.iter().collect();
    gold_sorted.sort_by(|a, b| a.name().cmp(b.name()));
    test_sorted.sort_by(|a, b| a.name().cmp(b.name()));

    let names_gold: Vec<String> = gold_sorted.iter().map(|d| d.name().to_string()).collect();
    let names_test: Vec<String> = test_sorted.iter().map(|d| d.name().to_string()).collect();
    if names_gold != names_test {
        tracing::error!(
            gold = ?names_gold,
            test = ?names_test,
            "Classified document names differ"
        );
        return Err(ReconcileError::BatchMismatch {
            reason: "gold standard and test documents differ".to_string(),
            names_a: names_gold,
            names_b: names_test,
        });
    }

    let pairs: Vec<_> = gold_sorted.iter().zip(&test_sorted).collect();
    let agreements = pairs
        .iter()
        .filter(|(g, t)| g.document_class == t.document_class)
        .count();
    let labels = pairs.iter().map(|(g, t)| {
        (
            g.document_class == positive_class,
            t.document_class == positive_class,
        )
    });

    Ok(BinaryMetrics::from_labels(labels, agreements))
}

/// Records that do not count as agreement.
pub fn discrepancies(records: &[ComparisonRecord]) -> impl Iterator<Item = &ComparisonRecord> {
    records.iter().filter(|r| !r.is_agreement())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
