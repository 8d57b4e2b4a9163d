//! Annotation and document types.
//!
//! These are read-only value objects for the reconciliation engine. Any
//! staged construction (class or attributes assigned after parsing) belongs
//! to the reader that produces them; once handed to the engine they are
//! never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Half-open character interval `[start, end)` into a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered (0 for empty or inverted spans).
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `start <= end` holds.
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Length of the intersection with another span.
    pub fn intersection_len(&self, other: &Span) -> usize {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A labeled character span in a document.
///
/// Attributes are kept in a `BTreeMap` so that serialization and iteration
/// order are stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier, unique within its document (not enforced).
    pub id: String,
    /// Covered text, diagnostic only.
    pub text: String,
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
    /// Class label.
    pub class: String,
    /// Attribute name to attribute value.
    pub attributes: BTreeMap<String, String>,
    /// Annotation source that produced this annotation.
    pub annotator: String,
}

impl Annotation {
    /// Create an annotation with no text, attributes, or annotator.
    pub fn new(id: impl Into<String>, start: usize, end: usize, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            start,
            end,
            class: class.into(),
            attributes: BTreeMap::new(),
            annotator: String::new(),
        }
    }

    /// Set the covered text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the annotator.
    pub fn with_annotator(mut self, annotator: impl Into<String>) -> Self {
        self.annotator = annotator.into();
        self
    }

    /// Add or replace one attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The annotation's character span.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// The annotations one source produced for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document name, the unique key across a batch.
    pub name: String,
    /// Annotations in source order.
    pub annotations: Vec<Annotation>,
    /// Number of characters in the underlying text.
    pub num_characters: usize,
}

impl Document {
    /// Create a new document.
    pub fn new(name: impl Into<String>, annotations: Vec<Annotation>, num_characters: usize) -> Self {
        Self {
            name: name.into(),
            annotations,
            num_characters,
        }
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the document has no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// A document carrying a document-level classification label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedDocument {
    /// The underlying document.
    pub document: Document,
    /// Document-level label, e.g. "positive".
    pub document_class: String,
}

impl ClassifiedDocument {
    /// Attach a label to a document.
    pub fn new(document: Document, document_class: impl Into<String>) -> Self {
        Self {
            document,
            document_class: document_class.into(),
        }
    }

    /// The document name.
    pub fn name(&self) -> &str {
        &self.document.name
    }
}
