use std::sync::Arc;
use std::time::Duration;

use crate::builder::ExamplesBuilder;
use crate::corpus::Corpus;
use crate::engine::{SearchSession, SessionConfig};
use crate::error::{CorpexError, Result};
use crate::example::{Example, SearchRequest};
use crate::pattern::{MatchMode, Pattern};
use crate::ranking::RankingPolicy;
use crate::results::{ScanStats, SearchResults};

/// Finds example sentences for a term in a loaded corpus.
///
/// The corpus is loaded once at build time and never changes. Every query
/// runs in its own [`SearchSession`], so a failed query leaves the finder
/// ready for the next one.
///
/// ```rust
/// use corpex::{Corpus, Document, MatchMode};
///
/// let corpus = Corpus::new(vec![
///     Document::new("A", ["a cat sat on the mat today"]),
///     Document::new("B", ["the category is closed now friend"]),
/// ]).unwrap();
///
/// let finder = corpex::examples()
///     .corpus(corpus)
///     .min_words(3)
///     .max_words(10)
///     .build()
///     .unwrap();
///
/// let found = finder.find_examples("cat", 10).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].source, "A");
/// assert_eq!((found[0].match_start, found[0].match_end), (2, 5));
/// ```
pub struct CorpusExamples {
    corpus: Arc<Corpus>,
    match_mode: MatchMode,
    session: SessionConfig,
    ranking: RankingPolicy,
    fallback: Option<RankingPolicy>,
}

impl CorpusExamples {
    pub(crate) fn new(
        corpus: Arc<Corpus>,
        match_mode: MatchMode,
        session: SessionConfig,
        ranking: RankingPolicy,
        fallback: Option<RankingPolicy>,
    ) -> Self {
        Self {
            corpus,
            match_mode,
            session,
            ranking,
            fallback,
        }
    }

    /// Same as [`corpex::examples()`](crate::examples).
    pub fn builder() -> ExamplesBuilder {
        ExamplesBuilder::default()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn ranking(&self) -> &RankingPolicy {
        &self.ranking
    }

    /// Up to `max_results` example sentences containing `term`.
    ///
    /// An empty `term` or `max_results == 0` returns an empty list.
    pub fn find_examples(&self, term: &str, max_results: usize) -> Result<Vec<Example>> {
        self.search(&SearchRequest::new(term, max_results))
            .map(|results| results.examples)
    }

    /// Like [`find_examples`](Self::find_examples), with scan statistics.
    ///
    /// # Errors
    ///
    /// - [`CorpexError::SearchFailure`] when a worker panics
    /// - [`CorpexError::SearchTimeout`] when the configured deadline passes
    /// - [`CorpexError::RankingFailure`] when ranking fails and no fallback
    ///   policy is configured (or the fallback fails too)
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        if request.is_empty() {
            return Ok(SearchResults {
                examples: Vec::new(),
                stats: ScanStats::compute(0, 0, 0, Duration::ZERO),
            });
        }

        let pattern = Pattern::compile(&request.term, self.match_mode)?;
        let session = SearchSession::new(
            Arc::clone(&self.corpus),
            Arc::new(pattern),
            self.session.clone(),
        );
        let SearchResults { examples, stats } = session.run()?;
        let found = examples.len();

        let examples = self.rank(&request.term, examples, request.max_results)?;
        tracing::info!(
            term = %request.term,
            found,
            returned = examples.len(),
            lines = stats.lines,
            elapsed_ms = stats.duration.as_millis() as u64,
            "examples search finished"
        );

        Ok(SearchResults { examples, stats })
    }

    fn rank(&self, term: &str, examples: Vec<Example>, limit: usize) -> Result<Vec<Example>> {
        let backup = self.fallback.as_ref().map(|_| examples.clone());

        let err = match self.ranking.rank(term, examples, limit) {
            Ok(ranked) => return Ok(ranked),
            Err(CorpexError::RankingFailure(msg)) => msg,
            Err(other) => other.to_string(),
        };

        match (&self.fallback, backup) {
            (Some(fallback), Some(examples)) => {
                tracing::warn!(
                    "{} ranking failed ({}), falling back to {}",
                    self.ranking.name(),
                    err,
                    fallback.name()
                );
                fallback.rank(term, examples, limit)
            }
            _ => Err(CorpexError::RankingFailure(err)),
        }
    }
}
