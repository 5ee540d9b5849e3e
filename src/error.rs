use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::example::Example;

pub type Result<T> = std::result::Result<T, CorpexError>;

#[derive(Error, Debug)]
pub enum CorpexError {
    // Load
    #[error("corpus folder not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid corpus source: {0}")]
    InvalidSource(PathBuf),

    #[error("IO error reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line} of {path} is not valid UTF-8")]
    Decode { path: PathBuf, line: usize },

    /// `path` is the second file mapping to `name`; `None` for in-memory
    /// corpora.
    #[error("document name `{name}` is already taken")]
    DuplicateDocument {
        name: String,
        path: Option<PathBuf>,
    },

    #[error("corpus walk failed: {0}")]
    Walk(String),

    // Config
    #[error("no corpus source provided")]
    MissingSource,

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid worker count: {0}")]
    InvalidWorkerCount(usize),

    #[error("word bounds ({min}, {max}) admit no sentence")]
    InvalidWordBounds { min: usize, max: usize },

    // Runtime
    #[error("thread pool failure: {0}")]
    ThreadPool(String),

    #[error("search failed: {0}")]
    SearchFailure(String),

    #[error("search timed out after {elapsed:?}")]
    SearchTimeout {
        elapsed: Duration,
        /// Examples aggregated before the deadline. Empty unless
        /// `keep_partial_on_timeout(true)` was set on the builder.
        partial: Vec<Example>,
    },

    // Ranking
    #[error("ranking failed: {0}")]
    RankingFailure(String),
}

impl CorpexError {
    /// The file or folder this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound(p)
            | Self::InvalidSource(p)
            | Self::Io { path: p, .. }
            | Self::Decode { path: p, .. }
            | Self::DuplicateDocument { path: Some(p), .. } => Some(p),
            _ => None,
        }
    }

    /// Whether this error was raised while loading the corpus.
    ///
    /// Load errors are fatal at construction. Everything else is scoped to
    /// a single query and leaves the [`CorpusExamples`](crate::CorpusExamples)
    /// usable.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::InvalidSource(_)
                | Self::Io { .. }
                | Self::Decode { .. }
                | Self::DuplicateDocument { .. }
                | Self::Walk(_)
        )
    }

    /// Partial results carried by a [`SearchTimeout`](Self::SearchTimeout).
    pub fn partial_examples(&self) -> Option<&[Example]> {
        match self {
            Self::SearchTimeout { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
