use std::ops::Range;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use corpex::engine::{search, shard_ranges, SearchSession, SessionConfig};
use corpex::{Corpus, CorpexError, Document, MatchMode, Matcher, Pattern};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// `n` documents named `doc00`, `doc01`, ... each holding one sentence
/// that mentions its own index.
fn numbered_corpus(n: usize) -> Arc<Corpus> {
    let docs = (0..n)
        .map(|i| Document::new(format!("doc{i:02}"), [format!("the word appears in line {i}")]))
        .collect();
    Arc::new(Corpus::new(docs).unwrap())
}

fn word_pattern() -> Arc<dyn Matcher> {
    Arc::new(Pattern::compile("word", MatchMode::WholeWord).unwrap())
}

fn config(workers: usize) -> SessionConfig {
    SessionConfig {
        min_words: 1,
        max_words: 20,
        workers,
        ..SessionConfig::default()
    }
}

/// Panics on any line containing "boom".
struct ExplodingMatcher;

impl Matcher for ExplodingMatcher {
    fn find(&self, line: &str) -> Option<Range<usize>> {
        if line.contains("boom") {
            panic!("matcher blew up");
        }
        line.find("word").map(|i| i..i + 4)
    }
}

/// Stalls on lines containing "slow"; matches "word" everywhere else.
struct SlowMatcher;

impl Matcher for SlowMatcher {
    fn find(&self, line: &str) -> Option<Range<usize>> {
        if line.contains("slow") {
            thread::sleep(Duration::from_millis(1500));
            return None;
        }
        line.find("word").map(|i| i..i + 4)
    }
}

fn slow_corpus() -> Arc<Corpus> {
    Arc::new(
        Corpus::new(vec![
            Document::new("fast", ["the word shows up quickly here"]),
            Document::new("slow", ["this slow line takes ages", "the word never gets seen"]),
        ])
        .unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Sharding
// ---------------------------------------------------------------------------

#[test]
fn shards_cover_every_document_once() {
    for len in 0..25 {
        for workers in 1..9 {
            let ranges = shard_ranges(len, workers);

            assert!(ranges.len() <= workers);
            assert!(ranges.iter().all(|r| !r.is_empty()), "no empty shards");

            let covered: Vec<usize> = ranges.iter().cloned().flatten().collect();
            assert_eq!(covered, (0..len).collect::<Vec<_>>(), "len={len} workers={workers}");

            let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
            if let (Some(min), Some(max)) = (sizes.iter().min(), sizes.iter().max()) {
                assert!(max - min <= 1, "shards should be balanced: {sizes:?}");
            }
        }
    }
}

#[test]
fn remainder_documents_are_searched() {
    // 7 documents over 6 workers: integer-division sharding would drop one.
    let results = search(numbered_corpus(7), word_pattern(), config(6)).unwrap();

    assert_eq!(results.examples.len(), 7);
    assert_eq!(results.stats.documents, 7);
    assert_eq!(results.stats.shards, 6);

    let mut sources: Vec<_> = results.examples.iter().map(|e| e.source.clone()).collect();
    sources.sort();
    assert_eq!(sources, (0..7).map(|i| format!("doc{i:02}")).collect::<Vec<_>>());
}

#[test]
fn more_workers_than_documents() {
    let results = search(numbered_corpus(2), word_pattern(), config(16)).unwrap();
    assert_eq!(results.examples.len(), 2);
    assert_eq!(results.stats.shards, 2);
}

#[test]
fn empty_corpus_spawns_nothing() {
    let results = search(Arc::new(Corpus::default()), word_pattern(), config(4)).unwrap();
    assert!(results.examples.is_empty());
    assert_eq!(results.stats.shards, 0);
}

#[test]
fn single_worker_preserves_scan_order() {
    let corpus = Arc::new(
        Corpus::new(vec![
            Document::new("first", ["one word here", "two word here"]),
            Document::new("second", ["three word here"]),
        ])
        .unwrap(),
    );

    let results = search(corpus, word_pattern(), config(1)).unwrap();
    let texts: Vec<_> = results.examples.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["one word here", "two word here", "three word here"]);
}

#[test]
fn zero_workers_is_rejected() {
    let err = search(numbered_corpus(3), word_pattern(), config(0)).err().unwrap();
    assert!(matches!(err, CorpexError::InvalidWorkerCount(0)));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn worker_panic_fails_only_that_query() {
    let corpus = Arc::new(
        Corpus::new(vec![
            Document::new("ok", ["a word in a fine sentence"]),
            Document::new("bad", ["boom goes the word"]),
        ])
        .unwrap(),
    );

    let err = SearchSession::new(Arc::clone(&corpus), Arc::new(ExplodingMatcher), config(2))
        .run()
        .err()
        .unwrap();
    match &err {
        CorpexError::SearchFailure(msg) => assert!(msg.contains("matcher blew up"), "{msg}"),
        other => panic!("expected SearchFailure, got {other:?}"),
    }
    assert!(!err.is_load_error());

    // The corpus is untouched and the next session runs normally.
    let results = search(corpus, word_pattern(), config(2)).unwrap();
    assert_eq!(results.examples.len(), 2);
}

#[test]
fn deadline_returns_timeout() {
    let cfg = SessionConfig {
        deadline: Some(Duration::from_millis(200)),
        ..config(2)
    };

    let err = search(slow_corpus(), Arc::new(SlowMatcher), cfg).err().unwrap();
    match err {
        CorpexError::SearchTimeout { elapsed, partial } => {
            assert!(elapsed >= Duration::from_millis(200));
            assert!(partial.is_empty(), "partial results are opt-in");
        }
        other => panic!("expected SearchTimeout, got {other:?}"),
    }
}

#[test]
fn deadline_keeps_partial_results_when_asked() {
    let cfg = SessionConfig {
        deadline: Some(Duration::from_millis(200)),
        keep_partial_on_timeout: true,
        ..config(2)
    };

    let err = search(slow_corpus(), Arc::new(SlowMatcher), cfg).err().unwrap();
    let partial = err.partial_examples().expect("timeout carries partial results");
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].source, "fast");
}

#[test]
fn generous_deadline_does_not_interfere() {
    let cfg = SessionConfig {
        deadline: Some(Duration::from_secs(30)),
        ..config(3)
    };
    let results = search(numbered_corpus(5), word_pattern(), cfg).unwrap();
    assert_eq!(results.examples.len(), 5);
}
