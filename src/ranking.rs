use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::Result;
use crate::example::Example;
use crate::traits::Ranker;

/// How aggregated examples are ordered or subsampled before they are
/// returned. Chosen once, when the [`CorpusExamples`](crate::CorpusExamples)
/// is built.
#[derive(Clone, Default)]
pub enum RankingPolicy {
    /// Longest sentences first. Stable: ties keep aggregation order.
    #[default]
    LengthDescending,

    /// Delegate ordering to an external [`Ranker`], e.g. an embedding model
    /// scoring each sentence against the term.
    SemanticSimilarity(Arc<dyn Ranker>),

    /// Draw `limit` examples uniformly at random without replacement.
    /// With a `seed` every call draws the same sample for the same input.
    UniformSample { seed: Option<u64> },
}

impl RankingPolicy {
    /// Wrap an external ranker.
    pub fn semantic(ranker: impl Ranker + 'static) -> Self {
        Self::SemanticSimilarity(Arc::new(ranker))
    }

    /// Order `examples` for `term` and keep at most `limit` of them.
    ///
    /// ```rust
    /// use corpex::{Example, RankingPolicy};
    ///
    /// let ex = |text: &str, n| Example {
    ///     source: "doc".into(), text: text.into(), word_count: n,
    ///     match_start: 0, match_end: 1,
    /// };
    /// let ranked = RankingPolicy::LengthDescending
    ///     .rank("x", vec![ex("a", 5), ex("b", 9), ex("c", 9), ex("d", 3)], 10)
    ///     .unwrap();
    ///
    /// let order: Vec<_> = ranked.iter().map(|e| e.text.as_str()).collect();
    /// assert_eq!(order, ["b", "c", "a", "d"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Only [`SemanticSimilarity`](Self::SemanticSimilarity) can fail, with
    /// whatever the external ranker returns.
    pub fn rank(
        &self,
        term: &str,
        mut examples: Vec<Example>,
        limit: usize,
    ) -> Result<Vec<Example>> {
        match self {
            Self::LengthDescending => {
                examples.sort_by(|a, b| b.word_count.cmp(&a.word_count));
            }
            Self::SemanticSimilarity(ranker) => {
                examples = ranker.rank(term, examples)?;
            }
            Self::UniformSample { seed } => {
                if examples.len() > limit {
                    let mut rng = match seed {
                        Some(s) => StdRng::seed_from_u64(*s),
                        None => StdRng::from_entropy(),
                    };
                    examples.shuffle(&mut rng);
                }
            }
        }
        examples.truncate(limit);
        Ok(examples)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LengthDescending => "length-descending",
            Self::SemanticSimilarity(_) => "semantic-similarity",
            Self::UniformSample { .. } => "uniform-sample",
        }
    }
}

impl fmt::Debug for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniformSample { seed } => {
                f.debug_struct("UniformSample").field("seed", seed).finish()
            }
            other => f.write_str(other.name()),
        }
    }
}
