use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use corpex::{examples, Corpus, CorpexError, Document, Example, Ranker, RankingPolicy, Result};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn example(text: &str, word_count: usize) -> Example {
    Example {
        source: "doc".into(),
        text: text.into(),
        word_count,
        match_start: 0,
        match_end: 1,
    }
}

fn pool(n: usize) -> Vec<Example> {
    (0..n).map(|i| example(&format!("sentence {i}"), 5)).collect()
}

/// `n` sentences that all contain "x" and differ in length.
fn x_corpus(n: usize) -> Corpus {
    let lines: Vec<String> = (0..n)
        .map(|i| format!("x appears in sentence number {i} {}", "w ".repeat(i % 5)))
        .collect();
    Corpus::new(vec![Document::new("xs", lines)]).unwrap()
}

/// `docs` documents of `lines` sentences each, all mentioning "cat".
/// Lengths cycle through 6..=9 words, so many examples tie on length.
fn cat_stories(docs: usize, lines: usize) -> Corpus {
    let documents = (0..docs)
        .map(|d| {
            let lines: Vec<String> = (0..lines)
                .map(|l| format!("the cat in story {d} line {l} {}", "w ".repeat(l % 4)))
                .collect();
            Document::new(format!("story{d:02}"), lines)
        })
        .collect();
    Corpus::new(documents).unwrap()
}

/// Ranks by how many times the term occurs, recording the term it saw.
struct CountingRanker {
    seen_terms: Arc<Mutex<Vec<String>>>,
}

impl Ranker for CountingRanker {
    fn rank(&self, term: &str, mut examples: Vec<Example>) -> Result<Vec<Example>> {
        self.seen_terms.lock().unwrap().push(term.to_owned());
        examples.sort_by_key(|e| std::cmp::Reverse(e.text.matches(term).count()));
        Ok(examples)
    }
}

/// A model that is never reachable.
struct OfflineRanker;

impl Ranker for OfflineRanker {
    fn rank(&self, _term: &str, _examples: Vec<Example>) -> Result<Vec<Example>> {
        Err(CorpexError::RankingFailure("model server unreachable".into()))
    }
}

// ---------------------------------------------------------------------------
// LengthDescending
// ---------------------------------------------------------------------------

#[test]
fn length_descending_is_stable() {
    let input = vec![
        example("five", 5),
        example("nine-a", 9),
        example("nine-b", 9),
        example("three", 3),
    ];

    let ranked = RankingPolicy::LengthDescending.rank("x", input, 10).unwrap();
    let texts: Vec<_> = ranked.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["nine-a", "nine-b", "five", "three"]);
}

// ---------------------------------------------------------------------------
// UniformSample
// ---------------------------------------------------------------------------

#[test]
fn uniform_sample_draws_k_distinct() {
    let input = pool(50);
    let all: HashSet<_> = input.iter().cloned().collect();

    let sampled = RankingPolicy::UniformSample { seed: None }
        .rank("x", input, 7)
        .unwrap();

    assert_eq!(sampled.len(), 7);
    let distinct: HashSet<_> = sampled.iter().cloned().collect();
    assert_eq!(distinct.len(), 7, "sampling is without replacement");
    assert!(distinct.is_subset(&all));
}

#[test]
fn uniform_sample_returns_small_pools_whole() {
    let input = pool(4);
    let sampled = RankingPolicy::UniformSample { seed: None }
        .rank("x", input.clone(), 4)
        .unwrap();

    let got: HashSet<_> = sampled.into_iter().collect();
    let want: HashSet<_> = input.into_iter().collect();
    assert_eq!(got, want);
}

#[test]
fn seeded_sample_is_reproducible() {
    let policy = RankingPolicy::UniformSample { seed: Some(42) };

    let first = policy.rank("x", pool(100), 10).unwrap();
    let second = policy.rank("x", pool(100), 10).unwrap();
    assert_eq!(first, second);
}

#[test]
fn finder_samples_down_to_max_results() {
    let finder = examples()
        .corpus(x_corpus(40))
        .ranking(RankingPolicy::UniformSample { seed: Some(7) })
        .build()
        .unwrap();

    let found = finder.find_examples("x", 5).unwrap();
    assert_eq!(found.len(), 5);
    assert_eq!(found, finder.find_examples("x", 5).unwrap());

    let everything = finder.find_examples("x", 1000).unwrap();
    assert_eq!(everything.len(), 40);
}

#[test]
fn truncated_results_repeat_across_workers() {
    for policy in [
        RankingPolicy::LengthDescending,
        RankingPolicy::UniformSample { seed: Some(42) },
    ] {
        let finder = examples()
            .corpus(cat_stories(12, 30))
            .workers(6)
            .ranking(policy.clone())
            .build()
            .unwrap();

        let first = finder.find_examples("cat", 3).unwrap();
        assert_eq!(first.len(), 3);
        for _ in 0..100 {
            assert_eq!(
                finder.find_examples("cat", 3).unwrap(),
                first,
                "{policy:?} should not depend on worker timing"
            );
        }
    }
}

#[test]
fn length_ties_resolve_in_shard_order() {
    let finder = examples()
        .corpus(cat_stories(12, 30))
        .workers(6)
        .build()
        .unwrap();

    let found = finder.find_examples("cat", 3).unwrap();
    let texts: Vec<_> = found.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(
        texts,
        [
            "the cat in story 0 line 3 w w w",
            "the cat in story 0 line 7 w w w",
            "the cat in story 0 line 11 w w w",
        ]
    );
}

// ---------------------------------------------------------------------------
// SemanticSimilarity
// ---------------------------------------------------------------------------

#[test]
fn semantic_policy_delegates_to_ranker() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let policy = RankingPolicy::semantic(CountingRanker {
        seen_terms: Arc::clone(&seen),
    });

    let input = vec![
        example("go", 5),
        example("go go go", 5),
        example("go go", 5),
    ];
    let ranked = policy.rank("go", input, 2).unwrap();

    let texts: Vec<_> = ranked.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["go go go", "go go"]);
    assert_eq!(*seen.lock().unwrap(), ["go"]);
}

#[test]
fn ranking_failure_without_fallback_fails_the_query() {
    let finder = examples()
        .corpus(x_corpus(3))
        .ranking(RankingPolicy::semantic(OfflineRanker))
        .build()
        .unwrap();

    let err = finder.find_examples("x", 5).err().unwrap();
    match err {
        CorpexError::RankingFailure(msg) => assert!(msg.contains("unreachable")),
        other => panic!("expected RankingFailure, got {other:?}"),
    }

    // Still usable: empty queries never reach the ranker.
    assert!(finder.find_examples("", 5).unwrap().is_empty());
}

#[test]
fn ranking_failure_falls_back_when_configured() {
    let finder = examples()
        .corpus(x_corpus(10))
        .ranking(RankingPolicy::semantic(OfflineRanker))
        .fallback_ranking(RankingPolicy::LengthDescending)
        .build()
        .unwrap();

    let found = finder.find_examples("x", 4).unwrap();
    assert_eq!(found.len(), 4);
    assert!(found.windows(2).all(|w| w[0].word_count >= w[1].word_count));
}
