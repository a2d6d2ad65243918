use std::sync::atomic::{AtomicU64, Ordering};

use ahash::RandomState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Corpus-wide record of one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// number of distinct ingested documents containing the term
    pub document_count: u64,
}

/// keep document count and per-term document frequency in a thread-safe way
///
/// Only the ingestion path mutates it, and ingestion is serialized by the
/// engine, so concurrent readers always see counts from completed steps.
#[derive(Debug, Default)]
pub struct TermLedger {
    /// documents counted so far
    doc_num: AtomicU64,
    /// document frequency per term
    term_counts: DashMap<Box<str>, u64, RandomState>,
}

impl Clone for TermLedger {
    fn clone(&self) -> Self {
        Self {
            doc_num: AtomicU64::new(self.doc_num.load(Ordering::Acquire)),
            term_counts: self.term_counts.clone(),
        }
    }
}

impl TermLedger {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: AtomicU64::new(0),
            term_counts: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Rebuild a ledger from saved counts
    pub fn from_counts<I>(doc_num: u64, counts: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let ledger = Self::new();
        ledger.doc_num.store(doc_num, Ordering::Release);
        for (term, count) in counts {
            ledger.term_counts.insert(term.into_boxed_str(), count);
        }
        ledger
    }

    /// Count one more document in the corpus
    pub fn begin_document(&self) -> u64 {
        self.doc_num.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Record that the current document contains `term`.
    /// Call once per distinct term of a document.
    pub fn record_sighting(&self, term: &str) -> Term {
        let mut entry = self.term_counts.entry(term.into()).or_insert(0);
        *entry += 1;
        Term { document_count: *entry }
    }

    /// Undo `begin_document` plus one `record_sighting` per term
    pub fn retract_document<T>(&self, terms: &[T])
    where
        T: AsRef<str>,
    {
        // never below zero even if called out of order
        let _ = self
            .doc_num
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        for term in terms {
            let term = term.as_ref();
            let drop_term = match self.term_counts.get_mut(term) {
                Some(mut count) if *count > 1 => {
                    *count -= 1;
                    false
                }
                Some(_) => true,
                None => false,
            };
            if drop_term {
                self.term_counts.remove(term);
            }
        }
    }

    /// Corpus-wide record for `term`
    pub fn lookup(&self, term: &str) -> Option<Term> {
        self.term_counts
            .get(term)
            .map(|count| Term { document_count: *count })
    }

    /// Get the number of documents in the corpus
    pub fn total_documents(&self) -> u64 {
        self.doc_num.load(Ordering::Acquire)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// (term, document count) pairs sorted by term
    pub fn counts(&self) -> Vec<(String, u64)> {
        let mut counts: Vec<(String, u64)> = self
            .term_counts
            .iter()
            .map(|entry| (entry.key().to_string(), *entry.value()))
            .collect();
        counts.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_creates_term_with_count_one() {
        let ledger = TermLedger::new();
        ledger.begin_document();
        assert_eq!(ledger.lookup("rust"), None);
        assert_eq!(ledger.record_sighting("rust").document_count, 1);
        assert_eq!(ledger.lookup("rust"), Some(Term { document_count: 1 }));
    }

    #[test]
    fn later_sightings_increment_by_one() {
        let ledger = TermLedger::new();
        for expected in 1..=3 {
            ledger.begin_document();
            assert_eq!(ledger.record_sighting("rust").document_count, expected);
        }
        assert_eq!(ledger.total_documents(), 3);
        assert_eq!(ledger.vocab_size(), 1);
    }

    #[test]
    fn retract_restores_previous_counts() {
        let ledger = TermLedger::new();
        ledger.begin_document();
        ledger.record_sighting("a");

        ledger.begin_document();
        ledger.record_sighting("a");
        ledger.record_sighting("b");
        ledger.retract_document(&["a", "b"]);

        assert_eq!(ledger.total_documents(), 1);
        assert_eq!(ledger.lookup("a"), Some(Term { document_count: 1 }));
        assert_eq!(ledger.lookup("b"), None);
    }

    #[test]
    fn counts_are_sorted_and_restorable() {
        let ledger = TermLedger::new();
        ledger.begin_document();
        ledger.record_sighting("pear");
        ledger.record_sighting("apple");
        let restored = TermLedger::from_counts(ledger.total_documents(), ledger.counts());
        assert_eq!(restored.counts(), vec![("apple".to_string(), 1), ("pear".to_string(), 1)]);
        assert_eq!(restored.total_documents(), 1);
    }
}
