use doc_association::{AssociationConfig, AssociationEngine, SimpleTokenizer};

fn main() {
    // build engine; every term below 100% of the corpus stays diagnostic
    let config = AssociationConfig {
        exclusion_ratio: 1.0,
        ..AssociationConfig::default()
    };
    let engine = AssociationEngine::with_config(config).unwrap();
    let tokenizer = SimpleTokenizer::default();

    // publish posts
    let a = engine.publish("apple banana apple cherry", &tokenizer).unwrap();
    engine.publish("banana cherry date", &tokenizer).unwrap();
    engine.publish("apple date date", &tokenizer).unwrap();
    let d = engine.publish("apple banana date", &tokenizer).unwrap();

    // print result
    println!("relations created by the last post: {}", d.relations_created);
    println!("related to {}:\n{}", d.document, engine.related_documents(d.document).unwrap());
    println!("related to {}:\n{}", a.document, engine.related_documents(a.document).unwrap());
    println!("is 'apple' excluded: {}", engine.is_term_excluded("apple"));
    // debug
    println!("{:#?}", engine.related_words());
}
