use serde::{Deserialize, Serialize};

use crate::association::index::{Document, DocumentId, DocumentTerm};
use crate::association::relation::Relation;
use crate::error::AssociationError;

/// Term rows of one ingested document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTermsData {
    pub document: DocumentId,
    /// (term, row) in first-seen order
    pub terms: Vec<(String, DocumentTerm)>,
}

/// Serializable state of an `AssociationEngine`
/// It does not hold the relation store itself, only its relations, so it can
/// be restored onto an in-memory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationSnapshot {
    /// registered documents in creation order
    pub documents: Vec<Document>,
    /// ingested documents in ingestion order
    pub document_terms: Vec<DocumentTermsData>,
    /// (term, document count), sorted by term
    pub term_counts: Vec<(String, u64)>,
    pub total_documents: u64,
    pub relations: Vec<Relation>,
    pub next_document_id: u64,
}

impl AssociationSnapshot {
    pub fn to_cbor(&self) -> Result<Vec<u8>, AssociationError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, AssociationError> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    /// Reject snapshots whose parts disagree with each other
    pub fn check(&self) -> Result<(), AssociationError> {
        if self.document_terms.len() as u64 != self.total_documents {
            return Err(AssociationError::Snapshot(format!(
                "{} ingested documents but total_documents is {}",
                self.document_terms.len(),
                self.total_documents
            )));
        }
        let known = |id: DocumentId| self.documents.iter().any(|d| d.id == id);
        if let Some(data) = self.document_terms.iter().find(|d| !known(d.document)) {
            return Err(AssociationError::Snapshot(format!(
                "term rows for unregistered {}",
                data.document
            )));
        }
        if let Some(doc) = self.documents.iter().find(|d| d.id.as_u64() >= self.next_document_id) {
            return Err(AssociationError::Snapshot(format!(
                "{} is not below next id {}",
                doc.id, self.next_document_id
            )));
        }
        Ok(())
    }
}
