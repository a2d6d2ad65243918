use std::collections::HashSet;

use doc_association::{AssociationConfig, AssociationEngine, RelationStore, Term};
use proptest::prelude::*;

fn term_strategy() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|i| format!("t{}", i))
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(term_strategy(), 0..10), 1..14)
}

fn ratio_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.6), Just(0.8), Just(1.0)]
}

proptest! {
    #[test]
    fn document_count_is_distinct_document_containment(corpus in corpus_strategy()) {
        let engine = AssociationEngine::new();
        for terms in &corpus {
            let id = engine.create_document(&terms.join(" "));
            engine.ingest_document(id, terms).unwrap();
        }
        prop_assert_eq!(engine.total_documents(), corpus.len() as u64);
        for i in 0u8..8 {
            let term = format!("t{}", i);
            let containing = corpus.iter().filter(|doc| doc.contains(&term)).count() as u64;
            let expected = if containing == 0 { None } else { Some(Term { document_count: containing }) };
            prop_assert_eq!(engine.term(&term), expected);
        }
    }

    #[test]
    fn every_relation_has_enough_shared_core_terms(corpus in corpus_strategy(), ratio in ratio_strategy()) {
        let engine = AssociationEngine::with_config(AssociationConfig {
            exclusion_ratio: ratio,
            ..AssociationConfig::default()
        }).unwrap();
        let mut seen = 0;
        for terms in &corpus {
            let id = engine.create_document(&terms.join(" "));
            let report = engine.ingest_document(id, terms).unwrap();

            let all = engine.store().all_relations().unwrap();
            let fresh = &all[seen..];
            prop_assert_eq!(fresh.len(), report.relations_created);
            seen = all.len();

            // the ledger is unchanged since scoring, so current exclusion is the one applied
            for relation in fresh {
                prop_assert!(relation.association > 0.0);
                prop_assert!(relation.from != relation.to);
                prop_assert!(relation.from == id || relation.to == id);

                let from: HashSet<String> = engine.core_terms_of(relation.from).into_iter().collect();
                let to: HashSet<String> = engine.core_terms_of(relation.to).into_iter().collect();
                let shared: Vec<&String> = from.intersection(&to).collect();
                prop_assert!(shared.len() >= 2);

                let expected: u64 = shared
                    .iter()
                    .map(|t| {
                        engine
                            .document_terms(relation.to)
                            .into_iter()
                            .find(|(term, _)| term.as_str() == t.as_str())
                            .map_or(0, |(_, row)| row.frequency)
                    })
                    .sum();
                prop_assert_eq!(relation.association, expected as f64);
            }
        }
    }

    #[test]
    fn weights_are_positive_and_frequencies_at_least_one(corpus in corpus_strategy()) {
        let engine = AssociationEngine::new();
        for terms in &corpus {
            let id = engine.create_document(&terms.join(" "));
            engine.ingest_document(id, terms).unwrap();
            for (_, row) in engine.document_terms(id) {
                prop_assert!(row.frequency >= 1);
                let weight = row.weight.unwrap();
                prop_assert!(weight.is_finite() && weight > 0.0);
            }
        }
    }
}

#[test]
fn exclusion_follows_corpus_growth_in_both_directions() {
    let engine = AssociationEngine::new();
    let publish = |terms: &[&str]| {
        let id = engine.create_document(&terms.join(" "));
        engine.ingest_document(id, terms).unwrap();
    };

    // "hot" in every document stays excluded while the corpus grows
    for i in 0..5 {
        let filler = format!("filler{}", i);
        publish(&["hot", filler.as_str()]);
        assert!(engine.is_term_excluded("hot"));
    }

    // "warm" in 3 of 5 is excluded, then the corpus outgrows it
    let engine = AssociationEngine::new();
    let publish = |terms: &[&str]| {
        let id = engine.create_document(&terms.join(" "));
        engine.ingest_document(id, terms).unwrap();
    };
    publish(&["warm"]);
    publish(&["warm"]);
    publish(&["warm"]);
    publish(&["cold"]);
    publish(&["cold"]);
    // 3 >= 0.6 * 5
    assert!(engine.is_term_excluded("warm"));
    publish(&["other"]);
    // 3 < 0.6 * 6
    assert!(!engine.is_term_excluded("warm"));
}
