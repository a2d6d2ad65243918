/// This crate is a Document Association Engine for a small content platform.
/// Every new post is linked to earlier posts that share salient vocabulary.
pub mod association;
pub mod config;
pub mod error;
pub mod tokenizer;

/// Document Association Engine
/// The top-level struct of this crate.
/// It ingests tokenized documents, keeps corpus-wide term statistics, and
/// writes directed, weighted relations between related documents.
///
/// Internally, it holds:
/// - The term ledger (document frequency per term, corpus size)
/// - The document registry and per-document term rows
/// - The exclusion policy deciding which terms are too common
/// - The frequency-sum association scorer
/// - A relation store
///
/// `AssociationEngine<S, W>` has the following generic parameters:
/// - `S`: Relation store type (e.g., InMemoryRelationStore)
/// - `W`: Term weight engine type (e.g., DefaultWeightEngine)
///
/// # Thread Safety
/// Ingestion is serialized internally; queries may run concurrently.
///
/// # Examples
/// ```
/// use doc_association::{AssociationEngine, SimpleTokenizer};
///
/// let engine = AssociationEngine::new();
/// let tokenizer = SimpleTokenizer::default();
/// engine.publish("rust borrow checker lifetimes", &tokenizer).unwrap();
/// engine.publish("cooking pasta sauce", &tokenizer).unwrap();
/// engine.publish("gardening tomatoes soil", &tokenizer).unwrap();
/// let report = engine.publish("rust lifetimes explained", &tokenizer).unwrap();
///
/// assert_eq!(report.relations_created, 2);
/// let related = engine.related_documents(report.document).unwrap();
/// assert_eq!(related.len(), 1);
/// ```
pub use association::{AssociationEngine, IngestReport};

/// Engine configuration
/// Exclusion ratio, shared term floor, and word correlation settings.
/// Loadable from TOML.
pub use config::AssociationConfig;

/// Error types
/// `AssociationError` for engine operations, `StoreError` for relation stores.
pub use error::{AssociationError, StoreError};

/// Term Frequency structure
/// Counts term occurrences within one tokenized document.
pub use association::term::TermFrequency;

/// Term Ledger
/// Corpus-wide document frequency per term and the corpus size.
/// Thread-safe, implemented using DashMap and atomics.
pub use association::corpus::{Term, TermLedger};

/// Document identity and per-document term rows
pub use association::index::{Document, DocumentId, DocumentTerm};

/// Relation Store trait, its in-memory implementation, and ranked results
/// - `Relation`: directed edge with a non-zero association score
/// - `RelatedDocuments`: relations of one document sorted by score
pub use association::relation::{InMemoryRelationStore, RelatedDocuments, Relation, RelationStore};

/// Term weight engine trait
/// The default computes `frequency * ln(total_documents / document_count + 1)`.
pub use association::weight::{DefaultWeightEngine, WeightEngine};

/// Exclusion policy over the term ledger
pub use association::exclusion::ExclusionPolicy;

/// Association scorer
pub use association::evaluate::scoring::{AssociationScorer, PairScore};

/// Word correlation result
pub use association::analyzer::WordCorrelation;

/// Serializable engine state
pub use association::serde::AssociationSnapshot;

/// Tokenizer seam and the default tokenizer
pub use tokenizer::{SimpleTokenizer, Tokenizer};
