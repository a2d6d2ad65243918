pub mod analyzer;
pub mod corpus;
pub mod evaluate;
pub mod exclusion;
pub mod index;
pub mod relation;
pub mod serde;
pub mod term;
pub mod weight;

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::association::analyzer::WordCorrelation;
use crate::association::corpus::{Term, TermLedger};
use crate::association::evaluate::scoring::AssociationScorer;
use crate::association::exclusion::ExclusionPolicy;
use crate::association::index::{Document, DocumentId, DocumentTerm, DocumentTermIndex, DocumentTerms};
use crate::association::relation::{InMemoryRelationStore, RelatedDocuments, RelationStore};
use crate::association::serde::{AssociationSnapshot, DocumentTermsData};
use crate::association::term::TermFrequency;
use crate::association::weight::{DefaultWeightEngine, WeightEngine};
use crate::config::AssociationConfig;
use crate::error::AssociationError;
use crate::tokenizer::Tokenizer;

/// What one ingestion produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub document: DocumentId,
    /// relations written, both directions counted
    pub relations_created: usize,
    /// non-excluded distinct terms of the document
    pub core_vocabulary: usize,
    /// existing documents the document was compared against
    pub compared: usize,
}

impl IngestReport {
    /// `false` when every term of the document was excluded (or it had none),
    /// so there was nothing diagnostic to compare
    pub fn has_relation_candidates(&self) -> bool {
        self.core_vocabulary > 0
    }
}

/// Document association engine
///
/// Keeps corpus term statistics, per-document term rows and the relation
/// graph. Every method takes `&self`; share it across threads with `Arc`.
///
/// `AssociationEngine<S, W>`:
/// - `S`: relation store (default `InMemoryRelationStore`)
/// - `W`: weight engine for the advisory term weight (default `DefaultWeightEngine`)
pub struct AssociationEngine<S = InMemoryRelationStore, W = DefaultWeightEngine>
where
    S: RelationStore,
    W: WeightEngine,
{
    config: AssociationConfig,
    policy: ExclusionPolicy,
    scorer: AssociationScorer,
    ledger: TermLedger,
    index: RwLock<DocumentTermIndex>,
    store: S,
    next_id: AtomicU64,
    /// held for the whole ingest-score-persist sequence
    ingest_lock: Mutex<()>,
    _marker: PhantomData<fn() -> W>,
}

impl AssociationEngine {
    /// Engine with default configuration and an in-memory store
    pub fn new() -> Self {
        Self::assemble(AssociationConfig::default(), InMemoryRelationStore::new())
    }

    /// Engine with the given configuration and an in-memory store.
    /// Fails with `InvalidConfig` when the configuration does not validate.
    pub fn with_config(config: AssociationConfig) -> Result<Self, AssociationError> {
        Self::with_store(config, InMemoryRelationStore::new())
    }

    /// Restore an engine from a snapshot onto an in-memory store
    pub fn from_snapshot(config: AssociationConfig, snapshot: AssociationSnapshot) -> Result<Self, AssociationError> {
        config.validate()?;
        snapshot.check()?;
        let AssociationSnapshot {
            documents,
            document_terms,
            term_counts,
            total_documents,
            relations,
            next_document_id,
        } = snapshot;

        let mut index = DocumentTermIndex::new();
        for document in documents {
            index.insert_document(document);
        }
        for data in document_terms {
            let rows: DocumentTerms = data
                .terms
                .into_iter()
                .map(|(term, row)| (term.into_boxed_str(), row))
                .collect();
            index.insert_terms(data.document, rows);
        }

        let mut engine = Self::assemble(config, InMemoryRelationStore::from_relations(relations));
        engine.ledger = TermLedger::from_counts(total_documents, term_counts);
        engine.index = RwLock::new(index);
        engine.next_id = AtomicU64::new(next_document_id);
        Ok(engine)
    }
}

impl Default for AssociationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, W> AssociationEngine<S, W>
where
    S: RelationStore,
    W: WeightEngine,
{
    /// Engine over a caller-provided relation store.
    /// Fails with `InvalidConfig` when the configuration does not validate.
    pub fn with_store(config: AssociationConfig, store: S) -> Result<Self, AssociationError> {
        config.validate()?;
        Ok(Self::assemble(config, store))
    }

    fn assemble(config: AssociationConfig, store: S) -> Self {
        Self {
            policy: ExclusionPolicy::new(config.exclusion_ratio),
            scorer: AssociationScorer::new(config.min_shared_terms),
            config,
            ledger: TermLedger::new(),
            index: RwLock::new(DocumentTermIndex::new()),
            store,
            next_id: AtomicU64::new(1),
            ingest_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn config(&self) -> &AssociationConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new post and hand out its id
    pub fn create_document(&self, text: &str) -> DocumentId {
        let id = DocumentId::from_u64(self.next_id.fetch_add(1, Ordering::AcqRel));
        let document = Document {
            id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.index.write().insert_document(document);
        debug!(%id, "document created");
        id
    }

    /// Create, tokenize and ingest a post in one call
    pub fn publish<T>(&self, text: &str, tokenizer: &T) -> Result<IngestReport, AssociationError>
    where
        T: Tokenizer + ?Sized,
    {
        let id = self.create_document(text);
        let terms = tokenizer.tokenize(text);
        self.ingest_document(id, &terms)
    }

    /// Ingest the tokenized terms of a registered document.
    ///
    /// Updates the term ledger, stores the document's term rows, scores the
    /// document against every earlier one and writes the resulting relations
    /// as one batch. If the batch cannot be persisted every statistic touched
    /// by this call is rolled back before the error is returned.
    #[instrument(skip_all, fields(document = %id, terms = terms.len()))]
    pub fn ingest_document<T>(&self, id: DocumentId, terms: &[T]) -> Result<IngestReport, AssociationError>
    where
        T: AsRef<str>,
    {
        let _writer = self.ingest_lock.lock();
        {
            let index = self.index.read();
            if !index.contains_document(id) {
                return Err(AssociationError::UnknownDocument(id));
            }
            if index.is_ingested(id) {
                return Err(AssociationError::AlreadyIngested(id));
            }
        }

        let freq = TermFrequency::from_terms(terms);
        let total = self.ledger.begin_document();
        let mut rows = DocumentTerms::with_capacity_and_hasher(freq.distinct_len(), Default::default());
        for (term, frequency) in freq.iter() {
            let recorded = self.ledger.record_sighting(term);
            let weight = match W::weight(term, frequency, Some(recorded.document_count), total) {
                Ok(weight) => Some(weight),
                Err(err) => {
                    warn!(%id, term, error = %err, "storing term without weight");
                    None
                }
            };
            rows.insert(term.into(), DocumentTerm { frequency, weight });
        }
        debug!(total_documents = total, distinct_terms = rows.len(), "ledger updated");

        let outcome = {
            let mut index = self.index.write();
            index.insert_terms(id, rows);
            let index = parking_lot::RwLockWriteGuard::downgrade(index);
            self.scorer.score_document(id, &index, |term| {
                !self.policy.excludes(self.ledger.lookup(term), total)
            })
        };
        if outcome.core_vocabulary == 0 {
            debug!("no relation candidates: empty core vocabulary");
        }

        let relations_created = outcome.relations.len();
        if relations_created > 0 {
            if let Err(err) = self.store.append_batch(outcome.relations) {
                warn!(error = %err, "relation batch failed, rolling back ingestion");
                self.index.write().remove_terms(id);
                self.ledger.retract_document(&freq.term_set_ref_str());
                return Err(err.into());
            }
        }

        info!(relations = relations_created, core_terms = outcome.core_vocabulary, "document ingested");
        Ok(IngestReport {
            document: id,
            relations_created,
            core_vocabulary: outcome.core_vocabulary,
            compared: outcome.compared,
        })
    }

    /// Related documents of `id`, strongest association first.
    /// Empty when there are none.
    pub fn related_documents(&self, id: DocumentId) -> Result<RelatedDocuments, AssociationError> {
        let relations = self.store.relations_from(id)?;
        Ok(RelatedDocuments::from_relations(relations))
    }

    /// Whether `term` is currently too common to be diagnostic
    pub fn is_term_excluded(&self, term: &str) -> bool {
        self.policy.is_excluded(&self.ledger, term)
    }

    pub fn term(&self, term: &str) -> Option<Term> {
        self.ledger.lookup(term)
    }

    pub fn total_documents(&self) -> u64 {
        self.ledger.total_documents()
    }

    pub fn document(&self, id: DocumentId) -> Option<Document> {
        self.index.read().document(id).cloned()
    }

    /// Registered documents, newest first
    pub fn documents_newest_first(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = self.index.read().documents().cloned().collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        documents
    }

    /// Distinct terms of an ingested document, first-seen order
    pub fn terms_of(&self, id: DocumentId) -> Vec<String> {
        self.index
            .read()
            .rows_of(id)
            .map(|rows| rows.keys().map(|t| t.to_string()).collect())
            .unwrap_or_default()
    }

    /// Terms of a document that are not excluded right now
    pub fn core_terms_of(&self, id: DocumentId) -> Vec<String> {
        let total = self.ledger.total_documents();
        self.index
            .read()
            .rows_of(id)
            .map(|rows| {
                rows.keys()
                    .filter(|t| !self.policy.excludes(self.ledger.lookup(t), total))
                    .map(|t| t.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Term rows (frequency and weight) of an ingested document
    pub fn document_terms(&self, id: DocumentId) -> Vec<(String, DocumentTerm)> {
        self.index
            .read()
            .rows_of(id)
            .map(|rows| rows.iter().map(|(t, row)| (t.to_string(), *row)).collect())
            .unwrap_or_default()
    }

    /// Correlated word pairs over the corpus, strongest first
    pub fn related_words(&self) -> Vec<WordCorrelation> {
        analyzer::related_words(
            &self.index.read(),
            self.config.correlation_max_terms,
            self.config.correlation_threshold,
        )
    }

    /// Term co-occurrence counts over the correlation vocabulary
    pub fn co_occurrence(&self) -> Vec<(String, String, u64)> {
        analyzer::co_occurrence(&self.index.read(), self.config.correlation_max_terms)
    }

    /// Capture the whole engine state.
    /// Waits for a running ingestion so the snapshot is consistent.
    pub fn snapshot(&self) -> Result<AssociationSnapshot, AssociationError> {
        let _writer = self.ingest_lock.lock();
        let index = self.index.read();
        Ok(AssociationSnapshot {
            documents: index.documents().cloned().collect(),
            document_terms: index
                .ingested()
                .map(|(document, rows)| DocumentTermsData {
                    document,
                    terms: rows.iter().map(|(t, row)| (t.to_string(), *row)).collect(),
                })
                .collect(),
            term_counts: self.ledger.counts(),
            total_documents: self.ledger.total_documents(),
            relations: self.store.all_relations()?,
            next_document_id: self.next_id.load(Ordering::Acquire),
        })
    }
}
