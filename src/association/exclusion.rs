use crate::association::corpus::{Term, TermLedger};

/// Decides whether a term is too common to be diagnostic.
///
/// A term is excluded when `document_count >= ratio * total_documents`,
/// evaluated against the ledger as it is right now.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionPolicy {
    ratio: f64,
}

impl ExclusionPolicy {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Document count at or above which a term is excluded
    #[inline]
    pub fn threshold(&self, total_documents: u64) -> f64 {
        total_documents as f64 * self.ratio
    }

    /// Exclusion test on already fetched statistics
    #[inline]
    pub fn excludes(&self, term: Option<Term>, total_documents: u64) -> bool {
        if total_documents == 0 {
            return false;
        }
        match term {
            Some(term) => term.document_count as f64 >= self.threshold(total_documents),
            None => false,
        }
    }

    pub fn is_excluded(&self, ledger: &TermLedger, term: &str) -> bool {
        self.excludes(ledger.lookup(term), ledger.total_documents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(doc_num: u64, counts: &[(&str, u64)]) -> TermLedger {
        TermLedger::from_counts(
            doc_num,
            counts.iter().map(|(t, c)| (t.to_string(), *c)),
        )
    }

    #[test]
    fn threshold_is_inclusive() {
        let policy = ExclusionPolicy::new(0.6);
        // 3 >= 0.6 * 5
        let ledger = ledger_with(5, &[("common", 3), ("rare", 2)]);
        assert!(policy.is_excluded(&ledger, "common"));
        assert!(!policy.is_excluded(&ledger, "rare"));
    }

    #[test]
    fn empty_corpus_excludes_nothing() {
        let policy = ExclusionPolicy::new(0.6);
        assert!(!policy.excludes(Some(Term { document_count: 1 }), 0));
        assert!(!policy.is_excluded(&TermLedger::new(), "anything"));
    }

    #[test]
    fn unknown_term_is_never_excluded() {
        let policy = ExclusionPolicy::new(0.6);
        let ledger = ledger_with(4, &[("a", 4)]);
        assert!(!policy.is_excluded(&ledger, "b"));
    }

    #[test]
    fn exclusion_flips_back_when_corpus_outgrows_the_term() {
        let policy = ExclusionPolicy::new(0.6);
        let term = Some(Term { document_count: 3 });
        assert!(policy.excludes(term, 4));
        assert!(policy.excludes(term, 5));
        assert!(!policy.excludes(term, 6));
        // growing together keeps it excluded
        assert!(policy.excludes(Some(Term { document_count: 6 }), 8));
    }
}
