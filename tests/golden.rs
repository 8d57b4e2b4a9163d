//! Golden scenarios for annotation reconciliation.
//!
//! These pin the exact record kinds produced for small hand-built
//! documents, including the no-overlap policy and equivalence grouping.

use annotation_reconciler::{
    reconcile, reconcile_batch, Annotation, BatchReconciler, ClassEquivalence, ComparisonKind,
    ComparisonRecord, ComparisonSummary, Document, EquivalenceGroups, NoOverlapPolicy,
    ReconcileError, ReconcileOptions,
};

const POSITIVE: &str = "classPositive";
const NEGATIVE: &str = "classNegative";

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn make_annotation(index: usize, class: &str, certainty: &str, annotator: &str) -> Annotation {
    let start = index * 2;
    Annotation::new(format!("{}_{}", annotator, index), start, start + 1, class)
        .with_text("x")
        .with_annotator(annotator)
        .with_attribute("certainty", certainty)
}

fn make_document(name: &str, annotator: &str, rows: &[(&str, &str)]) -> Document {
    let annotations = rows
        .iter()
        .enumerate()
        .map(|(i, (class, certainty))| make_annotation(i, class, certainty, annotator))
        .collect();
    Document::new(name, annotations, 12)
}

fn document_all_same() -> Document {
    make_document(
        "note_1",
        "reference",
        &[
            (POSITIVE, "high"),
            (POSITIVE, "high"),
            (POSITIVE, "high"),
            (POSITIVE, "high"),
            (NEGATIVE, "high"),
            (POSITIVE, "high"),
        ],
    )
}

fn document_all_different() -> Document {
    make_document(
        "note_1",
        "candidate",
        &[
            (POSITIVE, "high"),
            (NEGATIVE, "high"),
            (NEGATIVE, "high"),
            (POSITIVE, "low"),
            (NEGATIVE, "low"),
            (NEGATIVE, "low"),
        ],
    )
}

fn kinds(records: &[ComparisonRecord]) -> Vec<ComparisonKind> {
    records.iter().map(|r| r.kind()).collect()
}

fn merged_classes() -> ClassEquivalence {
    ClassEquivalence::GroupedBy(EquivalenceGroups::new(vec![vec![POSITIVE, NEGATIVE]]).unwrap())
}

// ─────────────────────────────────────────────────────────────────────────────
// DIRECT COMPARISON
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_all_same_vs_all_different() {
    init_tracing();
    let records = reconcile(
        &document_all_same(),
        &document_all_different(),
        &ReconcileOptions::default(),
    )
    .unwrap();

    let summary = ComparisonSummary::from_records(&records);
    assert_eq!(summary.matches, 1);
    assert_eq!(summary.class_mismatch, 2);
    assert_eq!(summary.attribute_mismatch, 2);
    assert_eq!(summary.class_and_attribute_mismatch, 1);
    assert_eq!(summary.total(), 6);

    assert_eq!(
        kinds(&records),
        vec![
            ComparisonKind::Match,
            ComparisonKind::ClassMismatch,
            ComparisonKind::ClassMismatch,
            ComparisonKind::AttributeMismatch,
            ComparisonKind::AttributeMismatch,
            ComparisonKind::ClassAndAttributeMismatch,
        ]
    );

    // Side A is always the first argument.
    assert!(records
        .iter()
        .all(|r| r.annotation_a().map(|a| a.annotator.as_str()) == Some("reference")));
    assert!(records
        .iter()
        .all(|r| r.annotation_b().map(|b| b.annotator.as_str()) == Some("candidate")));
}

#[test]
fn test_all_same_vs_itself() {
    let doc = document_all_same();
    let records = reconcile(&doc, &doc, &ReconcileOptions::default()).unwrap();
    assert!(records.iter().all(|r| r.kind() == ComparisonKind::Match));
    assert_eq!(records.len(), 6);
}

#[test]
fn test_ignoring_classes_and_attributes() {
    let options = ReconcileOptions::new()
        .with_classes(ClassEquivalence::IgnoreAll)
        .with_attributes(annotation_reconciler::AttributeEquivalence::IgnoreAll);
    let records = reconcile(&document_all_same(), &document_all_different(), &options).unwrap();
    assert!(records.iter().all(|r| r.kind() == ComparisonKind::Match));
}

// ─────────────────────────────────────────────────────────────────────────────
// EQUIVALENCE GROUPING
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_merging_classes_relabels_class_mismatches() {
    let direct = reconcile(
        &document_all_same(),
        &document_all_different(),
        &ReconcileOptions::default(),
    )
    .unwrap();
    let grouped = reconcile(
        &document_all_same(),
        &document_all_different(),
        &ReconcileOptions::new().with_classes(merged_classes()),
    )
    .unwrap();

    let direct_summary = ComparisonSummary::from_records(&direct);
    let grouped_summary = ComparisonSummary::from_records(&grouped);

    assert_eq!(grouped_summary.matches, 3);
    assert_eq!(grouped_summary.attribute_mismatch, 3);
    assert_eq!(grouped_summary.class_mismatch, 0);
    assert_eq!(grouped_summary.class_and_attribute_mismatch, 0);
    assert!(grouped_summary.matches >= direct_summary.matches);

    // Each direct class mismatch became a match, each combined mismatch an
    // attribute mismatch.
    for record in &direct {
        let a_id = &record.annotation_a().unwrap().id;
        let counterpart = grouped
            .iter()
            .find(|g| &g.annotation_a().unwrap().id == a_id)
            .unwrap();
        let expected = match record.kind() {
            ComparisonKind::ClassMismatch => ComparisonKind::Match,
            ComparisonKind::ClassAndAttributeMismatch => ComparisonKind::AttributeMismatch,
            other => other,
        };
        assert_eq!(counterpart.kind(), expected, "annotation {}", a_id);
    }
}

#[test]
fn test_classes_outside_every_group_never_match() {
    let groups = ClassEquivalence::GroupedBy(
        EquivalenceGroups::new(vec![vec!["present", "positive"], vec!["absent", "negative"]]).unwrap(),
    );
    let a = Document::new(
        "note_3",
        vec![
            Annotation::new("a1", 0, 5, "hypothetical").with_annotator("reference"),
            Annotation::new("a2", 10, 15, "present").with_annotator("reference"),
        ],
        20,
    );
    let b = Document::new(
        "note_3",
        vec![
            Annotation::new("b1", 0, 5, "hypothetical").with_annotator("candidate"),
            Annotation::new("b2", 10, 15, "positive").with_annotator("candidate"),
        ],
        20,
    );

    let records = reconcile(&a, &b, &ReconcileOptions::new().with_classes(groups)).unwrap();
    assert_eq!(
        kinds(&records),
        vec![ComparisonKind::Match, ComparisonKind::ClassMismatch]
    );
    assert_eq!(records[1].annotation_a().unwrap().id, "a1");
    assert_eq!(records[1].annotation_b().unwrap().id, "b1");

    // Without groups the identical classes agree.
    let direct = reconcile(&a, &b, &ReconcileOptions::default()).unwrap();
    assert_eq!(
        kinds(&direct),
        vec![ComparisonKind::Match, ComparisonKind::ClassMismatch]
    );
    assert_eq!(direct[0].annotation_a().unwrap().id, "a1");
}

// ─────────────────────────────────────────────────────────────────────────────
// NO-OVERLAP POLICY
// ─────────────────────────────────────────────────────────────────────────────

fn lone_negative() -> (Document, Document) {
    let a = Document::new(
        "note_2",
        vec![Annotation::new("a1", 5, 12, "negative").with_annotator("reference")],
        40,
    );
    let b = Document::new(
        "note_2",
        vec![Annotation::new("b1", 20, 30, "positive").with_annotator("candidate")],
        40,
    );
    (a, b)
}

#[test]
fn test_no_overlap_default_policy() {
    let (a, b) = lone_negative();
    let records = reconcile(&a, &b, &ReconcileOptions::default()).unwrap();
    assert_eq!(kinds(&records), vec![ComparisonKind::NoOverlap, ComparisonKind::NoOverlap]);
    assert_eq!(records[0].annotation_a().unwrap().id, "a1");
    assert!(records[0].annotation_b().is_none());
}

#[test]
fn test_no_overlap_allow_list() {
    let (a, b) = lone_negative();
    let options = ReconcileOptions::new().with_no_overlap(NoOverlapPolicy::match_classes(["negative"]));
    let records = reconcile(&a, &b, &options).unwrap();
    assert_eq!(
        kinds(&records),
        vec![ComparisonKind::MatchNoOverlap, ComparisonKind::NoOverlap]
    );
}

#[test]
fn test_no_overlap_always_match() {
    let (a, b) = lone_negative();
    let options = ReconcileOptions::new().with_no_overlap(NoOverlapPolicy::AlwaysMatch);
    let records = reconcile(&a, &b, &options).unwrap();
    assert!(records.iter().all(|r| r.kind() == ComparisonKind::MatchNoOverlap));
    assert_eq!(ComparisonSummary::from_records(&records).agreement(), 1.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// BATCHES
// ─────────────────────────────────────────────────────────────────────────────

fn batch(annotator: &str) -> Vec<Document> {
    let mut same = document_all_same();
    let mut different = document_all_different();
    let (a, b) = lone_negative();
    if annotator == "reference" {
        same.name = "note_3".to_string();
        vec![document_all_same(), a, same]
    } else {
        different.name = "note_3".to_string();
        vec![document_all_different(), b, different]
    }
}

#[test]
fn test_batch_counts_independent_of_input_order() {
    init_tracing();
    let batch_a = batch("reference");
    let batch_b = batch("candidate");

    let reconciler = BatchReconciler::new(ReconcileOptions::default());
    let baseline = reconciler.reconcile_batch(&batch_a, &batch_b).unwrap();

    for rotation in 1..batch_a.len() {
        let mut rotated_a = batch_a.clone();
        rotated_a.rotate_left(rotation);
        let mut reversed_b = batch_b.clone();
        reversed_b.reverse();

        let result = reconciler.reconcile_batch(&rotated_a, &reversed_b).unwrap();
        assert_eq!(result.summary(), baseline.summary());
        assert_eq!(result.records_hash, baseline.records_hash);
    }

    let summary = baseline.summary();
    assert_eq!(summary.matches, 2);
    assert_eq!(summary.class_mismatch, 4);
    assert_eq!(summary.no_overlap, 2);
}

#[test]
fn test_batch_records_follow_name_order() {
    let records = reconcile_batch(&batch("reference"), &batch("candidate"), &ReconcileOptions::default())
        .unwrap();

    let mut names: Vec<&str> = records.iter().map(|r| r.document_name()).collect();
    names.dedup();
    assert_eq!(names, vec!["note_1", "note_2", "note_3"]);
}

#[test]
fn test_batch_mismatch_is_fatal() {
    let batch_a = batch("reference");
    let mut batch_b = batch("candidate");
    batch_b[1].name = "note_9".to_string();

    let err = reconcile_batch(&batch_a, &batch_b, &ReconcileOptions::default()).unwrap_err();
    assert!(matches!(err, ReconcileError::BatchMismatch { .. }));
}

#[test]
fn test_options_hash_recorded() {
    let options = ReconcileOptions::new().with_classes(merged_classes());
    let result = BatchReconciler::new(options.clone())
        .reconcile_batch(&batch("reference"), &batch("candidate"))
        .unwrap();
    assert_eq!(result.options_hash, options.params_hash());
    assert_ne!(result.options_hash, ReconcileOptions::default().params_hash());
}
