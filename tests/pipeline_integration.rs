//! Integration tests for the corpus pipeline: normalize, trim, build, n-grams,
//! and merging topic results.

use std::io::Cursor;

use tempfile::TempDir;
use topic_modeler_core::corpus::{Corpus, CorpusBuilder, DataSource, Record, TopicWord};
use topic_modeler_core::ngrams::{NgramExtractor, NgramSize, StopwordSet, count_ngrams};
use topic_modeler_core::persist::{
    RunStamp, load_saved_run, parse_records, save_data, write_model_info,
};
use topic_modeler_core::text::{KeywordContextExtractor, TextNormalizer, sentences_around_keyword};
use topic_modeler_core::topics::{
    Embedder, Embeddings, TopicAssignment, TopicClusterer, TopicError, TopicInfo, TopicModel,
    chart_rows, topic_frequency,
};

const SAMPLES: &[&str] = &[
    "Check https://example.com/path?x=1 NOW!!",
    "Tom & Jerry &amp; friends: (part 2) #cartoon",
    "Café crème, déjà vu… naïve",
    "I can't believe it's 5% off @store",
    "   multiple\t\tspaces\nand lines   ",
    "don't stop; won't stop | ever",
    "www.site.org/page and more",
    "ht&amptpx rest",
    "&a&ampmp rest",
    "",
    "...",
];

#[test]
fn test_clean_is_idempotent_on_samples() {
    let normalizer = TextNormalizer::new();
    for sample in SAMPLES {
        let once = normalizer.clean(sample);
        assert_eq!(normalizer.clean(&once), once, "not idempotent for {sample:?}");
    }
}

#[test]
fn test_keyword_matching_ignores_case() {
    let text = "The KEYWORD shows up. Nothing here. keyword again. End";
    assert_eq!(
        sentences_around_keyword(text, "Keyword").unwrap(),
        sentences_around_keyword(text, "keyword").unwrap()
    );
}

#[test]
fn test_neighbors_are_deduplicated_in_encounter_order() {
    let extractor = KeywordContextExtractor::new("keyword").unwrap();
    assert_eq!(
        extractor.extract("A keyword here. B. keyword again. C."),
        "A keyword here. B. keyword again. C"
    );
}

#[test]
fn test_plus_separated_terms_match_any() {
    let out = sentences_around_keyword(
        "wellness goal found here. unrelated sentence.",
        "wellness+goal",
    )
    .unwrap();
    assert!(out.starts_with("wellness goal found here"));
}

#[test]
fn test_bigram_window_with_stopword_is_rejected() {
    let extractor = NgramExtractor::new(NgramSize::new(2).unwrap(), StopwordSet::from_words(["the"]));
    assert!(extractor.document_ngrams("run the race").is_empty());
}

#[test]
fn test_unigram_stopwords_are_filtered() {
    let extractor = NgramExtractor::new(NgramSize::UNIGRAM, StopwordSet::from_words(["the"]));
    assert_eq!(extractor.run_documents(["the quick fox"]), "quick fox ");
}

#[test]
fn test_duplicates_and_empty_texts_are_removed() {
    let corpus: Corpus = ["Same text here.", "same   TEXT here", "..."]
        .into_iter()
        .map(|body| Record::new().with_field("body", body))
        .collect();

    let built = CorpusBuilder::build(corpus, "body", DataSource::Other).unwrap();
    assert_eq!(built.len(), 1);
    assert_eq!(built.documents(), vec!["same text here"]);
}

#[test]
fn test_reddit_post_end_to_end() {
    let input = r#"{"body": "I set a wellness goal. It was hard. I met it eventually.", "keyword": "wellness goal", "title": "My Journey"}"#;
    let corpus = parse_records(Cursor::new(input)).unwrap();

    let transformed = CorpusBuilder::new(corpus, "body", DataSource::Reddit)
        .unwrap()
        .transform()
        .unwrap();
    let record = &transformed.corpus().records()[0];
    assert_eq!(record.text("body"), Some("My Journey.I set a wellness goal. It was hard"));
    assert_eq!(
        record.text("body_original"),
        Some("I set a wellness goal. It was hard. I met it eventually.")
    );

    let built = transformed.clean().unwrap().finish().unwrap();
    let document = built.documents()[0];
    assert_eq!(document, "my journey i set a wellness goal it was hard");
    assert!(!document.is_empty());
    assert_eq!(document, document.to_lowercase());
}

#[test]
fn test_ngram_counts_over_built_corpus() {
    let corpus: Corpus = [
        "Setting a wellness goal for 2024",
        "My wellness goal: sleep more",
        "No goals, just vibes",
    ]
    .into_iter()
    .map(|body| Record::new().with_field("body", body))
    .collect();
    let built = CorpusBuilder::build(corpus, "body", DataSource::Other).unwrap();

    let stopwords = StopwordSet::build(Some("english"), ["vibes"]).unwrap();
    let extractor = NgramExtractor::new(NgramSize::new(2).unwrap(), stopwords);
    let frequencies = count_ngrams(&extractor.run(&built));
    assert_eq!(frequencies.top(1)[0].ngram, "wellness_goal");
    assert_eq!(frequencies.count_of("wellness_goal"), 2);
}

struct WordCountEmbedder;

impl Embedder for WordCountEmbedder {
    fn encode(&self, documents: &[&str]) -> Result<Embeddings, TopicError> {
        Ok(documents
            .iter()
            .map(|d| vec![d.split_whitespace().count() as f32])
            .collect())
    }
}

struct KeywordClusterer;

impl TopicClusterer for KeywordClusterer {
    fn fit_transform(
        &mut self,
        documents: &[&str],
        _embeddings: &Embeddings,
    ) -> Result<Vec<TopicAssignment>, TopicError> {
        Ok(documents
            .iter()
            .map(|d| TopicAssignment {
                topic: if d.contains("sleep") { 0 } else { 1 },
                probability: 0.8,
            })
            .collect())
    }

    fn topic_info(&self) -> Vec<TopicInfo> {
        vec![
            TopicInfo {
                topic: 0,
                name: "0_sleep_bed".to_string(),
                count: 2,
            },
            TopicInfo {
                topic: 1,
                name: "1_water_drink".to_string(),
                count: 1,
            },
        ]
    }

    fn topic_words(&self, topic: i64) -> Vec<TopicWord> {
        vec![TopicWord {
            word: if topic == 0 { "sleep" } else { "water" }.to_string(),
            weight: 0.5,
        }]
    }
}

#[test]
fn test_topic_run_saved_and_reloaded() {
    let corpus: Corpus = [
        ("Sleep earlier every night", "fitness"),
        ("Drink more water", "health"),
        ("Better sleep, better days", "fitness"),
    ]
    .into_iter()
    .map(|(body, subreddit)| {
        Record::new()
            .with_field("body", body)
            .with_field("keyword", "goal")
            .with_field("subreddit", subreddit)
            .with_field("created_utc", 1_700_000_000)
    })
    .collect();
    let built = CorpusBuilder::build(corpus, "body", DataSource::Other).unwrap();

    let mut model = TopicModel::new(built, WordCountEmbedder, KeywordClusterer);
    model.run().unwrap();
    model.enrich().unwrap();
    let enriched = model.into_corpus();

    let counts = topic_frequency(enriched.corpus(), 10);
    assert_eq!(counts[0].topic_name, "0_sleep_bed");
    assert_eq!(counts[0].count, 2);

    let dir = TempDir::new().unwrap();
    let stamp: RunStamp = "14_11_2023_221320".parse().unwrap();
    save_data(dir.path(), &stamp, enriched.corpus()).unwrap();
    let info = std::fs::read_to_string(write_model_info(dir.path(), &stamp, enriched.corpus()).unwrap())
        .unwrap();
    assert!(info.contains("SUBREDDIT: fitness,health"));
    assert!(info.contains("TOPICS:\n0_sleep_bed\n1_water_drink\n"));
    assert!(info.contains("DATES: 2023-11-14 to 2023-11-14"));

    let saved = load_saved_run(dir.path(), &stamp).unwrap();
    let rows = chart_rows(&saved.corpus, 1, "body");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.topic == 0));
    assert_eq!(rows[0].text.as_deref(), Some("Sleep earlier every night"));
}
