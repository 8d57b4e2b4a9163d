//! Core types for annotation reconciliation.

pub mod annotation;
pub mod comparison;

pub use annotation::{Annotation, ClassifiedDocument, Document, Span};
pub use comparison::{ComparisonKind, ComparisonRecord};
