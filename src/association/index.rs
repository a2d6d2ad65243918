use std::fmt;

use ahash::RandomState;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque document identifier, assigned at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Immutable post record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Per (document, term) statistics, fixed at ingestion time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentTerm {
    /// occurrences inside the document, >= 1
    pub frequency: u64,
    /// advisory relevance weight, `None` when statistics were unavailable
    pub weight: Option<f64>,
}

/// Term rows of one document, in first-seen order
pub type DocumentTerms = IndexMap<Box<str>, DocumentTerm, RandomState>;

/// Document registry plus per-document term rows.
///
/// Documents keep creation order, which is also id order since ids are
/// handed out sequentially.
#[derive(Debug, Clone, Default)]
pub struct DocumentTermIndex {
    documents: IndexMap<DocumentId, Document, RandomState>,
    terms: IndexMap<DocumentId, DocumentTerms, RandomState>,
}

impl DocumentTermIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_document(&mut self, document: Document) {
        self.documents.insert(document.id, document);
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn contains_document(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn is_ingested(&self, id: DocumentId) -> bool {
        self.terms.contains_key(&id)
    }

    /// Store the term rows of a freshly ingested document
    pub fn insert_terms(&mut self, id: DocumentId, rows: DocumentTerms) {
        self.terms.insert(id, rows);
    }

    /// Drop the term rows of a document whose ingestion was rolled back
    pub fn remove_terms(&mut self, id: DocumentId) -> Option<DocumentTerms> {
        self.terms.shift_remove(&id)
    }

    pub fn rows_of(&self, id: DocumentId) -> Option<&DocumentTerms> {
        self.terms.get(&id)
    }

    /// Ingested documents with their rows, in ingestion order
    pub fn ingested(&self) -> impl Iterator<Item = (DocumentId, &DocumentTerms)> {
        self.terms.iter().map(|(id, rows)| (*id, rows))
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn ingested_len(&self) -> usize {
        self.terms.len()
    }

    /// Frequency of `term` inside document `id`, 0 if absent
    #[inline]
    pub fn frequency(&self, id: DocumentId, term: &str) -> u64 {
        self.terms
            .get(&id)
            .and_then(|rows| rows.get(term))
            .map_or(0, |row| row.frequency)
    }
}
