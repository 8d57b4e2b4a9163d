//! Equivalence and reporting policies.

pub mod equivalence;
pub mod options;
pub mod decode;

pub use equivalence::{
    attributes_equivalent, classes_equivalent, AttributeEquivalence, ClassEquivalence,
    EquivalenceGroups, KeyEquivalence,
};
pub use options::{NoOverlapPolicy, ReconcileOptions};
pub use decode::{decode_attributes, decode_classes, decode_no_overlap};
