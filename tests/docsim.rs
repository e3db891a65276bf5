use std::io::Cursor;
use std::sync::{mpsc, Arc, Mutex};

use docsim::{
    DocSim, DocSimConfig, DocSimError, EmbeddingCapability, KeyedVectors, ModelRegistry, ModelSource,
};

fn unit(dim: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[axis] = 1.0;
    v
}

/// fast~quick 0.8, car~automobile 0.75, everything else orthogonal
fn vehicles() -> KeyedVectors {
    let mut kv = KeyedVectors::new(8);
    kv.insert("fast", unit(8, 0)).unwrap();
    kv.insert("quick", vec![0.8, 0.6, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    kv.insert("car", unit(8, 2)).unwrap();
    kv.insert("automobile", vec![0.0, 0.0, 0.75, 0.661_437_8, 0.0, 0.0, 0.0, 0.0]).unwrap();
    kv.insert("red", unit(8, 4)).unwrap();
    kv.insert("slow", unit(8, 5)).unwrap();
    kv.insert("green", unit(8, 6)).unwrap();
    kv.insert("bicycle", unit(8, 7)).unwrap();
    kv
}

fn engine() -> DocSim {
    DocSim::with_model(DocSimConfig::default(), vehicles())
}

/// Deterministic pseudo random vectors, no extra crates needed
fn scrambled(words: &[&str], dim: usize) -> KeyedVectors {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 2000) as f32 / 1000.0 - 1.0
    };
    let mut kv = KeyedVectors::new(dim);
    for word in words {
        kv.insert(word, (0..dim).map(|_| next()).collect()).unwrap();
    }
    kv
}

#[test]
fn related_words_rank_first() {
    let hits = engine()
        .similarity_query("fast red car", &["a quick red automobile", "slow green bicycle"])
        .unwrap();
    assert_eq!(hits.indices(), vec![0, 1]);
    assert!(hits.list[0].score > hits.list[1].score);
}

#[test]
fn explanation_lists_the_closest_document_terms() {
    let hits = engine()
        .similarity_query_explained("fast red car", &["a quick red automobile", "slow green bicycle"])
        .unwrap();
    let doc0 = hits.get(0).unwrap().explanation.as_ref().unwrap();
    let terms: Vec<&str> = doc0.iter().map(|e| e.query_term.as_str()).collect();
    assert_eq!(terms, vec!["fast", "red", "car"]);

    let (word, score) = &doc0[0].similar_terms[0];
    assert_eq!(word, "quick");
    assert!((score - 0.8).abs() < 1e-5);

    let (word, score) = &doc0[2].similar_terms[0];
    assert_eq!(word, "automobile");
    assert!((score - 0.75).abs() < 1e-5);

    let doc1 = hits.get(1).unwrap().explanation.as_ref().unwrap();
    assert!(doc1.iter().all(|e| e.similar_terms.is_empty()));
}

#[test]
fn ranking_is_sorted_with_index_tie_break() {
    let docs = [
        "slow bicycle",
        "fast car",
        "green bicycle",
        "fast car",
        "quick automobile",
        "",
    ];
    let hits = engine().similarity_query("fast car", &docs).unwrap();
    assert_eq!(hits.len(), docs.len());
    for pair in hits.list.windows(2) {
        assert!(
            pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].index < pair[1].index),
            "{:?}",
            hits
        );
    }
    // the two identical documents tie and keep input order
    assert_eq!(&hits.indices()[..2], &[1, 3]);
}

#[test]
fn scores_stay_in_unit_interval() {
    let words = [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
        "kilo", "lima", "mike", "november", "oscar", "papa",
    ];
    let kv = scrambled(&words, 12);
    let config = DocSimConfig::default().with_max_neighbors(3);
    let engine = DocSim::with_model(config, kv);
    let docs = [
        "alpha bravo charlie charlie",
        "delta echo foxtrot golf hotel",
        "india juliet kilo",
        "lima mike november oscar papa papa papa",
        "alpha papa",
        "unknown words only",
        "the and of",
    ];
    let hits = engine.similarity_query("alpha golf kilo papa", &docs).unwrap();
    for hit in &hits {
        assert!((0.0..=1.0).contains(&hit.score), "score {} out of range", hit.score);
    }
}

#[test]
fn repeated_queries_give_identical_results() {
    let engine = engine();
    let docs = ["a quick red automobile", "slow green bicycle", "red car", "fast fast bicycle"];
    let first = engine.similarity_query_explained("fast red car", &docs).unwrap();
    let second = engine.similarity_query_explained("fast red car", &docs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn identical_document_beats_unrelated_one() {
    let hits = engine()
        .similarity_query("fast red car", &["slow green bicycle", "fast red car"])
        .unwrap();
    assert_eq!(hits.indices(), vec![1, 0]);
    assert!((hits.list[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn stopword_only_document_scores_zero() {
    let hits = engine()
        .similarity_query("fast red car", &["the and of a", "red car"])
        .unwrap();
    assert_eq!(hits.get(0).unwrap().score, 0.0);
    assert_eq!(hits.indices(), vec![1, 0]);
}

#[test]
fn custom_stopwords_replace_the_defaults() {
    let mut kv = vehicles();
    kv.insert("now", unit(8, 1)).unwrap();
    let docs = ["now", "fast"];

    let default = DocSim::with_model(DocSimConfig::default(), kv.clone());
    assert!(default.preprocess("now").is_empty());
    assert_eq!(default.similarity_query("now", &docs).unwrap().get(0).unwrap().score, 0.0);

    let empty: &[&str] = &[];
    let custom = DocSim::with_model(DocSimConfig::default().with_stopwords(empty), kv);
    assert_eq!(custom.preprocess("now"), vec!["now"]);
    let hits = custom.similarity_query("now", &docs).unwrap();
    assert_eq!(hits.indices(), vec![0, 1]);
    assert!((hits.list[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn markup_and_urls_are_normalized_away() {
    let engine = engine();
    let text = "<p>fast</p> <img src=\"x.png\"> <b>car</b> see https://example.com/car";
    assert_eq!(engine.preprocess(text), vec!["fast", "image_token", "car", "see", "url_token"]);

    let hits = engine.similarity_query("fast car", &[text, "bicycle"]).unwrap();
    assert_eq!(hits.indices(), vec![0, 1]);
    assert!(hits.list[0].score > 0.0);
    assert_eq!(hits.list[1].score, 0.0);
}

#[test]
fn queries_before_background_load_are_not_ready() {
    let (tx, rx) = mpsc::channel::<()>();
    let rx = Mutex::new(rx);
    let model: Arc<dyn EmbeddingCapability> = Arc::new(vehicles());

    let mut registry = ModelRegistry::new();
    registry.register("slow-model", move || {
        rx.lock()
            .unwrap()
            .recv()
            .map_err(|_| DocSimError::ModelLoad("sender dropped".into()))?;
        Ok(Arc::clone(&model))
    });

    let engine = DocSim::spawn(DocSimConfig::default(), "slow-model".into(), &registry).unwrap();
    assert!(!engine.is_ready());
    let err = engine.similarity_query("fast", &["quick"]).unwrap_err();
    assert!(matches!(err, DocSimError::ModelNotReady));
    assert!(err.is_retryable());

    tx.send(()).unwrap();
    engine.wait_ready().unwrap();
    assert!(engine.is_ready());
    let hits = engine.similarity_query("fast", &["quick"]).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn unknown_model_names_fail_at_construction() {
    let registry = ModelRegistry::new();
    assert!(matches!(
        DocSim::new(DocSimConfig::default(), ModelSource::Default, &registry),
        Err(DocSimError::UnsupportedModel(_))
    ));
    assert!(matches!(
        DocSim::spawn(DocSimConfig::default(), "word2vec-nope".into(), &registry),
        Err(DocSimError::UnsupportedModel(_))
    ));
}

#[test]
fn failed_background_load_is_reported() {
    let mut registry = ModelRegistry::new();
    registry.register("missing", || Err(DocSimError::ModelLoad("no such file".into())));
    let engine = DocSim::spawn(DocSimConfig::default(), "missing".into(), &registry).unwrap();
    assert!(matches!(engine.wait_ready(), Err(DocSimError::ModelLoad(_))));
    match engine.similarity_query("fast", &["quick"]) {
        Err(DocSimError::ModelLoad(msg)) => assert!(msg.contains("no such file")),
        other => panic!("expected ModelLoad, got {:?}", other),
    }
}

#[test]
fn registry_loads_text_vectors() {
    let text = "3 2\nfast 1.0 0.0\nquick 0.8 0.6\nslow 0.0 1.0\n";
    let mut registry = ModelRegistry::new();
    registry.register("text", move || {
        let kv = KeyedVectors::from_text(Cursor::new(text))?;
        Ok(Arc::new(kv) as Arc<dyn EmbeddingCapability>)
    });
    let config = DocSimConfig::default().with_model("text");
    let engine = DocSim::new(config, ModelSource::Default, &registry).unwrap();
    let hits = engine.similarity_query("fast", &["slow", "quick"]).unwrap();
    assert_eq!(hits.indices(), vec![1, 0]);
}

#[test]
fn cbor_vectors_round_trip_into_an_engine() {
    let mut bytes = Vec::new();
    vehicles().write_cbor(&mut bytes).unwrap();
    let kv = KeyedVectors::read_cbor(Cursor::new(bytes)).unwrap();
    let hits = DocSim::with_model(DocSimConfig::default(), kv)
        .similarity_query("fast red car", &["a quick red automobile", "slow green bicycle"])
        .unwrap();
    assert_eq!(hits.indices(), vec![0, 1]);
}
