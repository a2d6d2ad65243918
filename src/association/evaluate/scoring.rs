use rayon::prelude::*;

use crate::association::index::{DocumentId, DocumentTermIndex, DocumentTerms};
use crate::association::relation::Relation;

/// Directed scores of one qualifying document pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub other: DocumentId,
    /// number of shared core terms
    pub shared: usize,
    /// new -> other: shared term frequencies summed inside `other`
    pub forward: u64,
    /// other -> new: shared term frequencies summed inside the new document
    pub backward: u64,
}

/// Result of scoring one new document against the corpus
#[derive(Debug, Clone, Default)]
pub struct ScoreOutcome {
    pub relations: Vec<Relation>,
    /// size of the new document's core vocabulary
    pub core_vocabulary: usize,
    /// existing documents compared against
    pub compared: usize,
}

/// Frequency-sum association scorer
///
/// Two documents relate when they share at least `min_shared_terms` core
/// terms. The score from D to o is how often D's shared vocabulary occurs in
/// o, and the reverse direction counts the same terms inside D, so the two
/// directions differ whenever the frequencies differ.
#[derive(Debug, Clone, Copy)]
pub struct AssociationScorer {
    min_shared_terms: usize,
}

impl AssociationScorer {
    pub fn new(min_shared_terms: usize) -> Self {
        Self { min_shared_terms }
    }

    /// Score one pair from the new document's core terms and both row sets.
    /// Returns `None` when the pair shares too few core terms.
    pub fn score_pair(
        &self,
        core: &[&str],
        rows: &DocumentTerms,
        other: DocumentId,
        other_rows: &DocumentTerms,
    ) -> Option<PairScore> {
        let shared: Vec<&str> = core
            .iter()
            .copied()
            .filter(|term| other_rows.contains_key(*term))
            .collect();
        if shared.len() < self.min_shared_terms {
            return None;
        }
        let sum_in = |rows: &DocumentTerms| -> u64 {
            shared
                .iter()
                .map(|term| rows.get(*term).map_or(0, |row| row.frequency))
                .sum()
        };
        Some(PairScore {
            other,
            forward: sum_in(other_rows),
            backward: sum_in(rows),
            shared: shared.len(),
        })
    }

    /// Compare document `id` against every other ingested document.
    ///
    /// `is_core` answers whether a term is currently diagnostic. Relations
    /// come out in ingestion order of the other documents, forward edge
    /// before reverse edge.
    pub fn score_document<F>(&self, id: DocumentId, index: &DocumentTermIndex, is_core: F) -> ScoreOutcome
    where
        F: Fn(&str) -> bool + Sync,
    {
        let rows = match index.rows_of(id) {
            Some(rows) => rows,
            None => return ScoreOutcome::default(),
        };
        let core: Vec<&str> = rows
            .keys()
            .map(|term| &**term)
            .filter(|term| is_core(*term))
            .collect();
        if core.is_empty() {
            return ScoreOutcome::default();
        }

        let others: Vec<(DocumentId, &DocumentTerms)> =
            index.ingested().filter(|(other, _)| *other != id).collect();
        let relations: Vec<Relation> = others
            .par_iter()
            .filter_map(|(other, other_rows)| self.score_pair(&core, rows, *other, other_rows))
            .flat_map_iter(|pair| pair_relations(id, &pair))
            .collect();

        ScoreOutcome {
            relations,
            core_vocabulary: core.len(),
            compared: others.len(),
        }
    }
}

/// Edges of a qualifying pair; zero-score directions produce none
fn pair_relations(id: DocumentId, pair: &PairScore) -> Vec<Relation> {
    let mut out = Vec::with_capacity(2);
    if pair.forward != 0 {
        out.push(Relation {
            from: id,
            to: pair.other,
            association: pair.forward as f64,
        });
    }
    if pair.backward != 0 {
        out.push(Relation {
            from: pair.other,
            to: id,
            association: pair.backward as f64,
        });
    }
    out
}
