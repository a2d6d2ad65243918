use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use ahash::RandomState;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::association::index::DocumentId;
use crate::error::StoreError;

/// Directed, scored edge between two documents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub from: DocumentId,
    pub to: DocumentId,
    /// never 0
    pub association: f64,
}

/// Append-only storage for relations.
///
/// `append_batch` is all-or-nothing: on error nothing from the batch is
/// visible, on success every relation of the batch becomes visible at once.
pub trait RelationStore: Send + Sync {
    /// Persist a batch of relations atomically
    fn append_batch(&self, batch: Vec<Relation>) -> Result<(), StoreError>;

    /// Relations leaving `from`, in insertion order
    fn relations_from(&self, from: DocumentId) -> Result<Vec<Relation>, StoreError>;

    /// Relations pointing at `to`, in insertion order
    fn relations_to(&self, to: DocumentId) -> Result<Vec<Relation>, StoreError>;

    /// Every relation, in insertion order
    fn all_relations(&self) -> Result<Vec<Relation>, StoreError>;

    fn relation_count(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, Default)]
struct RelationTable {
    /// insertion order
    relations: Vec<Relation>,
    /// source document -> positions in `relations`
    by_source: IndexMap<DocumentId, Vec<usize>, RandomState>,
}

/// In-memory relation store
/// Every batch is published under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryRelationStore {
    table: RwLock<RelationTable>,
}

impl InMemoryRelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with relations, e.g. from a snapshot
    pub fn from_relations(relations: Vec<Relation>) -> Self {
        let store = Self::new();
        {
            let mut table = store.table.write();
            for relation in relations {
                push_relation(&mut table, relation);
            }
        }
        store
    }
}

fn push_relation(table: &mut RelationTable, relation: Relation) {
    let pos = table.relations.len();
    table.relations.push(relation);
    table
        .by_source
        .entry(relation.from)
        .or_insert_with(Vec::new)
        .push(pos);
}

impl RelationStore for InMemoryRelationStore {
    fn append_batch(&self, batch: Vec<Relation>) -> Result<(), StoreError> {
        if let Some(bad) = batch.iter().find(|r| r.association == 0.0 || !r.association.is_finite()) {
            return Err(StoreError::BatchRejected(format!(
                "invalid association {} for {} -> {}",
                bad.association, bad.from, bad.to
            )));
        }
        let mut table = self.table.write();
        table.relations.reserve(batch.len());
        for relation in batch {
            push_relation(&mut table, relation);
        }
        Ok(())
    }

    fn relations_from(&self, from: DocumentId) -> Result<Vec<Relation>, StoreError> {
        let table = self.table.read();
        Ok(table
            .by_source
            .get(&from)
            .map(|positions| positions.iter().map(|&pos| table.relations[pos]).collect())
            .unwrap_or_default())
    }

    fn relations_to(&self, to: DocumentId) -> Result<Vec<Relation>, StoreError> {
        let table = self.table.read();
        Ok(table.relations.iter().filter(|r| r.to == to).copied().collect())
    }

    fn all_relations(&self) -> Result<Vec<Relation>, StoreError> {
        Ok(self.table.read().relations.clone())
    }

    fn relation_count(&self) -> Result<usize, StoreError> {
        Ok(self.table.read().relations.len())
    }
}

// Blanket implementation so one store can back several engines
impl<T: RelationStore + ?Sized> RelationStore for Arc<T> {
    fn append_batch(&self, batch: Vec<Relation>) -> Result<(), StoreError> {
        (**self).append_batch(batch)
    }

    fn relations_from(&self, from: DocumentId) -> Result<Vec<Relation>, StoreError> {
        (**self).relations_from(from)
    }

    fn relations_to(&self, to: DocumentId) -> Result<Vec<Relation>, StoreError> {
        (**self).relations_to(to)
    }

    fn all_relations(&self) -> Result<Vec<Relation>, StoreError> {
        (**self).all_relations()
    }

    fn relation_count(&self) -> Result<usize, StoreError> {
        (**self).relation_count()
    }
}

/// Ranked related documents of one source document
#[derive(Clone, PartialEq)]
pub struct RelatedDocuments {
    /// (target document, association)
    pub list: Vec<(DocumentId, f64)>,
}

impl RelatedDocuments {
    /// Rank relations leaving one document
    pub fn from_relations(relations: Vec<Relation>) -> Self {
        let mut related = Self {
            list: relations.into_iter().map(|r| (r.to, r.association)).collect(),
        };
        related.sort_by_association_desc();
        related
    }

    /// Sort by descending association; equal scores by ascending target id
    pub fn sort_by_association_desc(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list
            .sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(DocumentId, f64)> {
        self.list.iter()
    }
}

impl Debug for RelatedDocuments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "RelatedDocuments [")?;
            for (id, score) in &self.list {
                writeln!(f, "    {}: {:.3}", id, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for RelatedDocuments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, (id, score)) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {} ({})", rank + 1, id, score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(from: u64, to: u64, association: f64) -> Relation {
        Relation {
            from: DocumentId::from_u64(from),
            to: DocumentId::from_u64(to),
            association,
        }
    }

    #[test]
    fn batch_is_indexed_by_source() {
        let store = InMemoryRelationStore::new();
        store
            .append_batch(vec![rel(4, 1, 3.0), rel(1, 4, 2.0), rel(4, 2, 2.0)])
            .unwrap();
        assert_eq!(store.relation_count().unwrap(), 3);
        assert_eq!(store.relations_from(DocumentId::from_u64(4)).unwrap(), vec![rel(4, 1, 3.0), rel(4, 2, 2.0)]);
        assert_eq!(store.relations_to(DocumentId::from_u64(4)).unwrap(), vec![rel(1, 4, 2.0)]);
        assert!(store.relations_from(DocumentId::from_u64(9)).unwrap().is_empty());
    }

    #[test]
    fn zero_association_rejects_the_whole_batch() {
        let store = InMemoryRelationStore::new();
        let err = store.append_batch(vec![rel(1, 2, 1.0), rel(2, 1, 0.0)]).unwrap_err();
        assert!(matches!(err, StoreError::BatchRejected(_)));
        assert_eq!(store.relation_count().unwrap(), 0);
    }

    #[test]
    fn ranking_is_descending_with_id_tie_break() {
        let related = RelatedDocuments::from_relations(vec![
            rel(1, 5, 2.0),
            rel(1, 3, 4.0),
            rel(1, 2, 2.0),
            rel(1, 9, 1.0),
        ]);
        assert_eq!(
            related.list,
            vec![
                (DocumentId::from_u64(3), 4.0),
                (DocumentId::from_u64(2), 2.0),
                (DocumentId::from_u64(5), 2.0),
                (DocumentId::from_u64(9), 1.0),
            ]
        );
    }

    #[test]
    fn display_lists_one_line_per_hit() {
        let related = RelatedDocuments::from_relations(vec![rel(1, 2, 3.0), rel(1, 3, 1.0)]);
        let text = related.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("  1. doc#2 (3)"));
    }

    #[test]
    fn shared_store_through_arc() {
        let store = Arc::new(InMemoryRelationStore::new());
        let alias = Arc::clone(&store);
        alias.append_batch(vec![rel(2, 1, 2.0)]).unwrap();
        assert_eq!(store.relation_count().unwrap(), 1);
    }
}
