use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crate::corpus::{Corpus, Document};
use crate::error::{CorpexError, Result};
use crate::example::Example;
use crate::results::{collect, Deadline, ScanStats, SearchResults, ShardScan};
use crate::traits::Matcher;

pub const DEFAULT_MIN_WORDS: usize = 4;
pub const DEFAULT_MAX_WORDS: usize = 15;
pub const DEFAULT_WORKERS: usize = 6;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Per-query search parameters.
///
/// Word bounds are exclusive on both sides: a sentence is kept only when
/// `min_words < word_count < max_words`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub min_words: usize,
    pub max_words: usize,
    pub workers: usize,

    /// Give up on the query after this long.
    pub deadline: Option<Duration>,

    /// Carry the examples gathered before the deadline inside
    /// [`CorpexError::SearchTimeout`].
    pub keep_partial_on_timeout: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
            max_words: DEFAULT_MAX_WORDS,
            workers: DEFAULT_WORKERS,
            deadline: None,
            keep_partial_on_timeout: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Sharding
// ---------------------------------------------------------------------------

/// Split `len` documents into at most `workers` contiguous, non-empty
/// shards whose sizes differ by at most one.
///
/// Every index in `0..len` is covered exactly once.
///
/// ```rust
/// use corpex::engine::shard_ranges;
///
/// assert_eq!(shard_ranges(7, 3), vec![0..3, 3..5, 5..7]);
/// assert_eq!(shard_ranges(2, 6), vec![0..1, 1..2]);
/// assert!(shard_ranges(0, 6).is_empty());
/// ```
pub fn shard_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let count = workers.min(len);
    if count == 0 {
        return Vec::new();
    }

    let base = len / count;
    let extra = len % count;
    let mut ranges = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let size = base + usize::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

// ---------------------------------------------------------------------------
// SearchSession
// ---------------------------------------------------------------------------

/// One query's worker pool and result channel.
///
/// A session is built from immutable inputs, spawns a fresh worker per shard,
/// and is consumed by [`run()`](SearchSession::run). Nothing survives
/// between sessions, so a failed or timed-out query cannot affect the next.
pub struct SearchSession {
    corpus: Arc<Corpus>,
    matcher: Arc<dyn Matcher>,
    config: SessionConfig,
}

impl SearchSession {
    pub fn new(corpus: Arc<Corpus>, matcher: Arc<dyn Matcher>, config: SessionConfig) -> Self {
        Self {
            corpus,
            matcher,
            config,
        }
    }

    /// Scan every shard in parallel and aggregate the matches.
    ///
    /// Blocks until all workers finish (or the deadline passes).
    ///
    /// # Errors
    ///
    /// - [`CorpexError::InvalidWorkerCount`] when `workers` is 0
    /// - [`CorpexError::ThreadPool`] when a worker thread cannot be spawned
    /// - [`CorpexError::SearchFailure`] when a worker panics
    /// - [`CorpexError::SearchTimeout`] when the deadline passes
    pub fn run(self) -> Result<SearchResults> {
        let SessionConfig {
            min_words,
            max_words,
            workers,
            deadline,
            keep_partial_on_timeout,
        } = self.config;

        if workers == 0 {
            return Err(CorpexError::InvalidWorkerCount(workers));
        }

        let start = Instant::now();
        let ranges = shard_ranges(self.corpus.len(), workers);
        let shards = ranges.len();

        let (tx, rx) = mpsc::channel::<ShardScan>();
        let cancel = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(shards);

        for (shard, range) in ranges.into_iter().enumerate() {
            let corpus = Arc::clone(&self.corpus);
            let matcher = Arc::clone(&self.matcher);
            let cancel_flag = Arc::clone(&cancel);
            let tx = tx.clone();

            let spawned = thread::Builder::new()
                .name(format!("corpex-shard-{shard}"))
                .spawn(move || {
                    let docs = &corpus.documents()[range];
                    let scan = scan_shard(
                        shard,
                        docs,
                        matcher.as_ref(),
                        min_words,
                        max_words,
                        &cancel_flag,
                    );
                    // The receiver is gone only after a timeout; nothing to report to.
                    let _ = tx.send(scan);
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    cancel.store(true, Ordering::Relaxed);
                    return Err(CorpexError::ThreadPool(e.to_string()));
                }
            }
        }
        drop(tx);

        let deadline = deadline.map(|d| Deadline {
            at: start + d,
            started: start,
            keep_partial: keep_partial_on_timeout,
        });
        let scans = collect(rx, handles, &cancel, deadline)?;

        let mut documents = 0;
        let mut lines = 0;
        let mut examples = Vec::new();
        for scan in scans {
            documents += scan.documents;
            lines += scan.lines;
            examples.extend(scan.examples);
        }

        Ok(SearchResults {
            examples,
            stats: ScanStats::compute(documents, lines, shards, start.elapsed()),
        })
    }
}

/// Run a single search session. Shorthand for
/// `SearchSession::new(corpus, matcher, config).run()`.
pub fn search(
    corpus: Arc<Corpus>,
    matcher: Arc<dyn Matcher>,
    config: SessionConfig,
) -> Result<SearchResults> {
    SearchSession::new(corpus, matcher, config).run()
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

fn scan_shard(
    shard: usize,
    docs: &[Document],
    matcher: &dyn Matcher,
    min_words: usize,
    max_words: usize,
    cancel: &AtomicBool,
) -> ShardScan {
    let mut examples = Vec::new();
    let mut documents = 0;
    let mut lines = 0;

    'docs: for doc in docs {
        documents += 1;
        for line in doc.lines() {
            if cancel.load(Ordering::Relaxed) {
                break 'docs;
            }
            lines += 1;

            let Some(span) = matcher.find(line) else {
                continue;
            };
            let word_count = line.split_whitespace().count();
            if word_count <= min_words || word_count >= max_words {
                continue;
            }

            let match_start = line[..span.start].chars().count();
            let match_end = match_start + line[span].chars().count();
            examples.push(Example {
                source: doc.name().to_owned(),
                text: line.clone(),
                word_count,
                match_start,
                match_end,
            });
        }
    }

    ShardScan {
        shard,
        examples,
        documents,
        lines,
    }
}
