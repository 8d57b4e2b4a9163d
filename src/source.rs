//! Annotation sources.
//!
//! A source is whatever produces the documents for one side of a batch: a
//! file reader, a database, or documents built in memory. The reconciler
//! only needs fully built [`Document`] values.

use serde::Deserialize;
use std::convert::Infallible;

use crate::types::Document;

/// Trait for annotation sources.
///
/// Implementations may return documents in any order; batch reconciliation
/// sorts by name.
pub trait AnnotationSource {
    /// Error type for loading documents.
    type Error: std::error::Error + Send + Sync;

    /// Name of the annotation source, e.g. "ehost" or "pycontext".
    fn source_name(&self) -> &str;

    /// Load all documents of this source.
    fn load_documents(&self) -> Result<Vec<Document>, Self::Error>;
}

/// In-memory annotation source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryAnnotationSource {
    name: String,
    documents: Vec<Document>,
}

impl InMemoryAnnotationSource {
    /// Create an empty source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Parse a source from JSON of the form `{"name": ..., "documents": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add a document.
    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Get all documents.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl AnnotationSource for InMemoryAnnotationSource {
    type Error = Infallible;

    fn source_name(&self) -> &str {
        &self.name
    }

    fn load_documents(&self) -> Result<Vec<Document>, Self::Error> {
        Ok(self.documents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let source = InMemoryAnnotationSource::from_json_str(
            r#"{
                "name": "ehost",
                "documents": [{
                    "name": "note_1",
                    "num_characters": 40,
                    "annotations": [{
                        "id": "e1", "text": "bleeding", "start": 4, "end": 12,
                        "class": "bleeding_present",
                        "attributes": {"certainty": "high"},
                        "annotator": "ehost"
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(source.source_name(), "ehost");
        let documents = source.load_documents().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].annotations[0].class, "bleeding_present");
    }
}
