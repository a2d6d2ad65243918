//! Error types for the association engine.
//!
//! Weight faults are recovered where they happen and never surface here as a
//! failed ingestion; store faults abort the ingestion after it is rolled back.

use thiserror::Error;

use crate::association::index::DocumentId;

/// Errors that can occur inside a relation store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Backend could not be reached or its lock is poisoned
    #[error("Relation store unavailable: {0}")]
    Unavailable(String),
    /// A relation batch was refused; nothing from it was written
    #[error("Relation batch rejected: {0}")]
    BatchRejected(String),
}

/// Errors returned by [`AssociationEngine`](crate::AssociationEngine) operations.
#[derive(Debug, Error)]
pub enum AssociationError {
    /// Document id was never handed out by `create_document`
    #[error("Unknown document: {0}")]
    UnknownDocument(DocumentId),
    /// Each document is ingested exactly once
    #[error("Document already ingested: {0}")]
    AlreadyIngested(DocumentId),
    /// Document frequency absent or non-positive right after it was recorded
    #[error("Missing statistics for term '{term}'")]
    MissingStatistics { term: String },
    /// Relation batch could not be persisted
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
    /// Configuration values out of range or unparsable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Snapshot could not be encoded or decoded
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl From<serde_cbor::Error> for AssociationError {
    fn from(err: serde_cbor::Error) -> Self {
        AssociationError::Snapshot(err.to_string())
    }
}

impl From<toml::de::Error> for AssociationError {
    fn from(err: toml::de::Error) -> Self {
        AssociationError::InvalidConfig(err.to_string())
    }
}
