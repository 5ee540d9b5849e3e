//! # corpex
//!
//! Parallel corpus search for language-learning examples.
//!
//! corpex loads a folder of sentence files once, then answers queries of
//! the form "give me up to N sentences containing this word". Each query
//! compiles a case-insensitive literal pattern, splits the corpus into
//! contiguous shards scanned by parallel workers, aggregates their matches,
//! and hands the result set to a [`RankingPolicy`].
//!
//! There is no index: every query re-scans the corpus.
//!
//! # Quick Start
//!
//! ```rust
//! use std::fs;
//! use corpex::{MatchMode, RankingPolicy};
//!
//! let dir = tempfile::tempdir().unwrap();
//! fs::write(
//!     dir.path().join("movie.1999.vi.srt.txt"),
//!     "the cat sat on the warm mat\n\
//!      the cat sat on the warm mat\n\
//!      no match in this sentence here\n",
//! ).unwrap();
//!
//! let finder = corpex::examples()
//!     .folder(dir.path())
//!     .min_words(3)
//!     .max_words(10)
//!     .match_mode(MatchMode::WholeWord)
//!     .ranking(RankingPolicy::LengthDescending)
//!     .build()
//!     .unwrap();
//!
//! let found = finder.find_examples("CAT", 5).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].source, "movie");
//! assert_eq!(found[0].matched(), "cat");
//! ```
//!
//! # Custom Ranking
//!
//! Implement [`Ranker`] to plug in an external scorer:
//!
//! ```rust
//! use corpex::{Example, Ranker, RankingPolicy, Result};
//!
//! struct ShortestFirst;
//!
//! impl Ranker for ShortestFirst {
//!     fn rank(&self, _term: &str, mut examples: Vec<Example>) -> Result<Vec<Example>> {
//!         examples.sort_by_key(|e| e.text.len());
//!         Ok(examples)
//!     }
//! }
//!
//! let policy = RankingPolicy::semantic(ShortestFirst);
//! ```

#![forbid(unsafe_code)]

pub mod engine;

mod builder;
mod corpus;
mod error;
mod example;
mod finder;
mod pattern;
mod ranking;
mod results;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::ExamplesBuilder;
pub use corpus::{document_name, Corpus, Document, LoadOptions, DEFAULT_SUFFIX_SEGMENTS};
pub use error::{CorpexError, Result};
pub use example::{Example, SearchRequest};
pub use finder::CorpusExamples;
pub use pattern::{MatchMode, Pattern};
pub use ranking::RankingPolicy;
pub use results::{ScanStats, SearchResults};
pub use traits::{Matcher, Ranker};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ExamplesBuilder`] to configure a [`CorpusExamples`].
///
/// # Example
///
/// ```rust
/// use corpex::{Corpus, Document};
///
/// let corpus = Corpus::new(vec![
///     Document::new("notes", ["we went to the old market yesterday"]),
/// ]).unwrap();
///
/// let finder = corpex::examples().corpus(corpus).build().unwrap();
/// assert_eq!(finder.find_examples("market", 3).unwrap().len(), 1);
/// assert!(finder.find_examples("", 3).unwrap().is_empty());
/// ```
pub fn examples() -> ExamplesBuilder {
    ExamplesBuilder::default()
}
