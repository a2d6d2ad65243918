use doc_association::{AssociationConfig, AssociationEngine, DocumentId, SimpleTokenizer, Term};

fn publish_all(engine: &AssociationEngine, posts: &[&str]) -> Vec<doc_association::IngestReport> {
    let tokenizer = SimpleTokenizer::default();
    posts
        .iter()
        .map(|post| engine.publish(post, &tokenizer).unwrap())
        .collect()
}

const POSTS: [&str; 4] = [
    "apple banana apple cherry",
    "banana cherry date",
    "apple date date",
    "apple banana date",
];

#[test]
fn four_posts_without_exclusion_link_the_last_post_both_ways() {
    let engine = AssociationEngine::with_config(AssociationConfig {
        exclusion_ratio: 1.0,
        ..AssociationConfig::default()
    }).unwrap();
    let reports = publish_all(&engine, &POSTS);
    let [a, b, c, d] = [reports[0], reports[1], reports[2], reports[3]];

    // C shares only one term with A and with B
    assert_eq!(c.relations_created, 0);
    assert_eq!(c.core_vocabulary, 2);
    assert_eq!(c.compared, 2);

    // D relates to all three, both directions
    assert_eq!(d.relations_created, 6);
    let related_d = engine.related_documents(d.document).unwrap();
    assert_eq!(
        related_d.list,
        vec![(a.document, 3.0), (c.document, 3.0), (b.document, 2.0)]
    );
    assert_eq!(engine.related_documents(a.document).unwrap().list, vec![(d.document, 2.0)]);
    assert_eq!(engine.related_documents(b.document).unwrap().list, vec![(d.document, 2.0)]);
    assert_eq!(engine.related_documents(c.document).unwrap().list, vec![(d.document, 2.0)]);

    assert_eq!(engine.term("apple"), Some(Term { document_count: 3 }));
    assert_eq!(engine.term("cherry"), Some(Term { document_count: 2 }));
}

#[test]
fn four_posts_with_default_exclusion() {
    let engine = AssociationEngine::new();
    let reports = publish_all(&engine, &POSTS);

    // B: banana and cherry are in 2 of 2 posts, only date is core
    assert_eq!(engine.core_terms_of(reports[1].document), vec!["date"]);
    // C: apple and date reach 2 of 3 >= 1.8
    assert!(!reports[2].has_relation_candidates());
    // D: apple, banana, date each reach 3 of 4 >= 2.4
    assert!(!reports[3].has_relation_candidates());
    assert!(reports.iter().all(|r| r.relations_created == 0));

    assert!(engine.is_term_excluded("apple"));
    assert!(engine.is_term_excluded("date"));
    assert!(!engine.is_term_excluded("cherry"));
    assert!(!engine.is_term_excluded("never-seen"));
    assert_eq!(engine.store_relation_count(), 0);
}

#[test]
fn short_post_scores_higher_against_long_post_than_reverse() {
    let engine = AssociationEngine::new();
    let tokenizer = SimpleTokenizer::default();
    for filler in ["cooking pasta", "garden soil", "ocean waves", "mountain trail"] {
        engine.publish(filler, &tokenizer).unwrap();
    }
    let long = engine
        .publish("rust rust rust ownership ownership borrowing lifetimes traits", &tokenizer)
        .unwrap();
    let short = engine.publish("rust ownership", &tokenizer).unwrap();

    assert_eq!(short.relations_created, 2);
    let forward = engine.related_documents(short.document).unwrap();
    let backward = engine.related_documents(long.document).unwrap();
    assert_eq!(forward.list, vec![(long.document, 5.0)]);
    assert_eq!(backward.list, vec![(short.document, 2.0)]);
}

#[test]
fn related_documents_is_stable_across_calls() {
    let engine = AssociationEngine::with_config(AssociationConfig {
        exclusion_ratio: 1.0,
        ..AssociationConfig::default()
    }).unwrap();
    let reports = publish_all(&engine, &POSTS);
    let d = reports[3].document;
    let first = engine.related_documents(d).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.related_documents(d).unwrap(), first);
    }
    assert!(engine.related_documents(DocumentId::from_u64(999)).unwrap().is_empty());
}

trait RelationCount {
    fn store_relation_count(&self) -> usize;
}

impl RelationCount for AssociationEngine {
    fn store_relation_count(&self) -> usize {
        use doc_association::RelationStore;
        self.store().relation_count().unwrap()
    }
}
