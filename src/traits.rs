use std::ops::Range;

use crate::error::Result;
use crate::example::Example;

/// Finds the query term in a single sentence line.
///
/// [`Pattern`](crate::Pattern) is the built-in implementation. Implement this
/// to plug in other matching logic (stemming, fuzzy matching, etc.).
///
/// # Thread Safety
///
/// `Send + Sync` are required — one matcher is shared read-only by every
/// shard worker of a search.
///
/// # Example
///
/// ```rust
/// use std::ops::Range;
/// use corpex::Matcher;
///
/// struct StartsWith(String);
///
/// impl Matcher for StartsWith {
///     fn find(&self, line: &str) -> Option<Range<usize>> {
///         line.starts_with(&self.0).then(|| 0..self.0.len())
///     }
/// }
///
/// assert_eq!(StartsWith("the".into()).find("the cat"), Some(0..3));
/// ```
pub trait Matcher: Send + Sync {
    /// Byte range of the first match in `line`, or `None`.
    fn find(&self, line: &str) -> Option<Range<usize>>;
}

/// Orders examples by relevance to the query term.
///
/// This is the seam for semantic ranking: the scoring model lives outside
/// this crate. Return [`CorpexError::RankingFailure`](crate::CorpexError::RankingFailure)
/// when the model is unavailable so a fallback policy can take over.
///
/// ```rust
/// use corpex::{Example, Ranker, Result};
///
/// /// Prefers sentences where the term appears early.
/// struct EarlyMatch;
///
/// impl Ranker for EarlyMatch {
///     fn rank(&self, _term: &str, mut examples: Vec<Example>) -> Result<Vec<Example>> {
///         examples.sort_by_key(|e| e.match_start);
///         Ok(examples)
///     }
/// }
/// ```
pub trait Ranker: Send + Sync {
    /// Return `examples` ordered best first.
    fn rank(&self, term: &str, examples: Vec<Example>) -> Result<Vec<Example>>;
}
