use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::corpus::{Corpus, LoadOptions};
use crate::engine::SessionConfig;
use crate::error::{CorpexError, Result};
use crate::finder::CorpusExamples;
use crate::pattern::MatchMode;
use crate::ranking::RankingPolicy;

enum CorpusSource {
    Folder(PathBuf),
    Memory(Corpus),
}

// ---------------------------------------------------------------------------
// ExamplesBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a [`CorpusExamples`].
///
/// Created via [`corpex::examples()`](crate::examples). Configure with chained
/// builder methods, then call [`build()`](ExamplesBuilder::build) to load the
/// corpus. Configuration is fixed once built.
///
/// # Example
///
/// ```rust,ignore
/// let finder = corpex::examples()
///     .folder("subs/vi")
///     .min_words(4)
///     .max_words(15)
///     .workers(8)
///     .ranking(RankingPolicy::UniformSample { seed: None })
///     .build()?;
/// ```
pub struct ExamplesBuilder {
    source: Option<CorpusSource>,
    load: LoadOptions,
    session: SessionConfig,
    match_mode: MatchMode,
    ranking: RankingPolicy,
    fallback: Option<RankingPolicy>,
}

impl Default for ExamplesBuilder {
    fn default() -> Self {
        Self {
            source: None,
            load: LoadOptions::default(),
            session: SessionConfig::default(),
            match_mode: MatchMode::default(),
            ranking: RankingPolicy::default(),
            fallback: None,
        }
    }
}

impl ExamplesBuilder {
    // ── Source ────────────────────────────────────────────────────────────

    /// Load the corpus from a folder, one document per file.
    pub fn folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(CorpusSource::Folder(path.into()));
        self
    }

    /// Use an already-built corpus.
    pub fn corpus(mut self, corpus: Corpus) -> Self {
        self.source = Some(CorpusSource::Memory(corpus));
        self
    }

    /// Number of dot-separated filename suffixes dropped to form a
    /// document name. Defaults to 4.
    pub fn suffix_segments(mut self, n: usize) -> Self {
        self.load.suffix_segments = n;
        self
    }

    /// Fail the load on undecodable lines instead of skipping them.
    pub fn strict_decoding(mut self, yes: bool) -> Self {
        self.load.strict_decoding = yes;
        self
    }

    // ── Matching ──────────────────────────────────────────────────────────

    /// Sentences must have more than `n` words. Defaults to 4.
    pub fn min_words(mut self, n: usize) -> Self {
        self.session.min_words = n;
        self
    }

    /// Sentences must have fewer than `n` words. Defaults to 15.
    pub fn max_words(mut self, n: usize) -> Self {
        self.session.max_words = n;
        self
    }

    /// Whole-word (default) or substring matching.
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Number of shard workers spawned per query. Defaults to 6.
    pub fn workers(mut self, n: usize) -> Self {
        self.session.workers = n;
        self
    }

    /// Abort a query that runs longer than `d`.
    pub fn deadline(mut self, d: Duration) -> Self {
        self.session.deadline = Some(d);
        self
    }

    /// Keep the examples found before the deadline in the
    /// [`SearchTimeout`](CorpexError::SearchTimeout) error. Off by default.
    pub fn keep_partial_on_timeout(mut self, yes: bool) -> Self {
        self.session.keep_partial_on_timeout = yes;
        self
    }

    // ── Ranking ───────────────────────────────────────────────────────────

    /// How results are ordered or sampled. Defaults to
    /// [`RankingPolicy::LengthDescending`].
    pub fn ranking(mut self, policy: RankingPolicy) -> Self {
        self.ranking = policy;
        self
    }

    /// Policy applied when the primary ranking fails.
    pub fn fallback_ranking(mut self, policy: RankingPolicy) -> Self {
        self.fallback = Some(policy);
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Validate the configuration and load the corpus.
    ///
    /// # Errors
    ///
    /// Configuration errors ([`InvalidWorkerCount`](CorpexError::InvalidWorkerCount),
    /// [`InvalidWordBounds`](CorpexError::InvalidWordBounds),
    /// [`MissingSource`](CorpexError::MissingSource) when no source was set)
    /// and any corpus load error.
    pub fn build(self) -> Result<CorpusExamples> {
        let SessionConfig {
            min_words,
            max_words,
            workers,
            ..
        } = self.session;

        if workers == 0 {
            return Err(CorpexError::InvalidWorkerCount(workers));
        }
        if min_words.saturating_add(1) >= max_words {
            return Err(CorpexError::InvalidWordBounds {
                min: min_words,
                max: max_words,
            });
        }

        let corpus = match self.source {
            Some(CorpusSource::Folder(path)) => Corpus::load(&path, &self.load)?,
            Some(CorpusSource::Memory(corpus)) => corpus,
            None => return Err(CorpexError::MissingSource),
        };

        Ok(CorpusExamples::new(
            Arc::new(corpus),
            self.match_mode,
            self.session,
            self.ranking,
            self.fallback,
        ))
    }
}
