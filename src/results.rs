use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{CorpexError, Result};
use crate::example::Example;

/// The output of a completed search.
pub struct SearchResults {
    /// Matching examples in shard order, then document then line order
    /// within each shard. Apply a [`RankingPolicy`](crate::RankingPolicy)
    /// for any relevance ordering.
    pub examples: Vec<Example>,

    /// Scan performance statistics.
    pub stats: ScanStats,
}

/// Performance statistics for a completed scan.
#[derive(Debug, Clone)]
pub struct ScanStats {
    /// Documents scanned.
    pub documents: usize,

    /// Sentence lines tested against the pattern.
    pub lines: usize,

    /// Number of shard workers that ran.
    pub shards: usize,

    /// Wall-clock time from search start to aggregation.
    pub duration: Duration,

    /// Lines scanned per second, clamped to 0 on zero-duration runs.
    pub lines_per_sec: usize,
}

impl ScanStats {
    pub(crate) fn compute(
        documents: usize,
        lines: usize,
        shards: usize,
        duration: Duration,
    ) -> Self {
        let lps = if duration.as_secs_f64() > 0.0 {
            (lines as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            documents,
            lines,
            shards,
            duration,
            lines_per_sec: lps,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// What one worker sends back for its shard.
pub(crate) struct ShardScan {
    pub shard: usize,
    pub examples: Vec<Example>,
    pub documents: usize,
    pub lines: usize,
}

/// How long to wait and what to do when the wait runs out.
pub(crate) struct Deadline {
    pub at: Instant,
    pub started: Instant,
    pub keep_partial: bool,
}

/// Drain every shard result from `rx`, then join the workers.
///
/// Returns once all workers have finished, ordered by shard index so the
/// outcome does not depend on which worker finished first. No partial
/// results are surfaced on success. A panicked worker turns the whole query into
/// [`CorpexError::SearchFailure`]. When `deadline` passes first, `cancel` is
/// raised, outstanding workers are detached, and
/// [`CorpexError::SearchTimeout`] is returned.
pub(crate) fn collect(
    rx: Receiver<ShardScan>,
    handles: Vec<JoinHandle<()>>,
    cancel: &AtomicBool,
    deadline: Option<Deadline>,
) -> Result<Vec<ShardScan>> {
    let mut scans = Vec::with_capacity(handles.len());

    loop {
        let next = match &deadline {
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(d) => rx.recv_timeout(d.at.saturating_duration_since(Instant::now())),
        };

        match next {
            Ok(scan) => {
                tracing::debug!(
                    shard = scan.shard,
                    examples = scan.examples.len(),
                    lines = scan.lines,
                    "shard finished"
                );
                scans.push(scan);
            }
            // Every sender is gone: each worker either reported or panicked.
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                cancel.store(true, Ordering::Relaxed);
                // Workers poll `cancel` and exit on their own; waiting for
                // them here would defeat the deadline.
                drop(handles);

                let (elapsed, keep_partial) = deadline
                    .map(|d| (d.started.elapsed(), d.keep_partial))
                    .unwrap_or_default();
                tracing::warn!(
                    finished = scans.len(),
                    "search deadline exceeded after {:?}",
                    elapsed
                );

                let partial = if keep_partial {
                    scans.sort_by_key(|s| s.shard);
                    scans.into_iter().flat_map(|s| s.examples).collect()
                } else {
                    Vec::new()
                };
                return Err(CorpexError::SearchTimeout { elapsed, partial });
            }
        }
    }

    let mut failures = Vec::new();
    for handle in handles {
        let name = handle.thread().name().unwrap_or("worker").to_owned();
        if let Err(payload) = handle.join() {
            failures.push(format!("{name} panicked: {}", panic_message(&*payload)));
        }
    }
    if !failures.is_empty() {
        return Err(CorpexError::SearchFailure(failures.join("; ")));
    }

    scans.sort_by_key(|s| s.shard);
    Ok(scans)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
