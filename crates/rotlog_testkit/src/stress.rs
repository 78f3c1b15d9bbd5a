//! Stress helpers for concurrent writers.
//!
//! These drive many threads against one shared log and check that every
//! payload comes back exactly once, in per-thread order.

use rotlog_core::RotatingLog;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Outcome counts of a stress run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressTestResult {
    /// Total writes attempted.
    pub total_ops: usize,
    /// Writes that returned `Ok`.
    pub successful_ops: usize,
    /// Writes that returned an error.
    pub failed_ops: usize,
}

impl StressTestResult {
    /// Creates a result from success and failure counts.
    pub fn new(successful: usize, failed: usize) -> Self {
        Self {
            total_ops: successful + failed,
            successful_ops: successful,
            failed_ops: failed,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of concurrent writer threads.
    pub threads: usize,
    /// Writes issued by each thread.
    pub writes_per_thread: usize,
    /// Extra filler bytes appended to each message.
    pub padding: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            writes_per_thread: 1_000,
            padding: 0,
        }
    }
}

/// Formats the message a stress worker writes.
pub fn worker_message(worker: usize, seq: usize, padding: usize) -> String {
    format!("Worker {worker} | Message {seq}{}", "#".repeat(padding))
}

/// Parses a message produced by [`worker_message`] into `(worker, seq)`.
pub fn parse_worker_message(message: &str) -> Option<(usize, usize)> {
    let rest = message.strip_prefix("Worker ")?;
    let (worker, rest) = rest.split_once(" | Message ")?;
    let seq = rest.trim_end_matches('#');
    Some((worker.parse().ok()?, seq.parse().ok()?))
}

/// Runs `config.threads` writers against one shared log.
pub fn stress_concurrent_writes(log: &Arc<RotatingLog>, config: &StressConfig) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..config.threads)
        .map(|worker| {
            let log = Arc::clone(log);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let writes = config.writes_per_thread;
            let padding = config.padding;

            thread::spawn(move || {
                for seq in 0..writes {
                    match log.write(&worker_message(worker, seq, padding)) {
                        Ok(()) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Writer thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
    )
}

/// Groups read-back messages by worker, keeping each worker's order.
///
/// Returns `None` if any message is not a well-formed worker message.
pub fn group_by_worker(messages: &[String]) -> Option<BTreeMap<usize, Vec<usize>>> {
    let mut grouped: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for message in messages {
        let (worker, seq) = parse_worker_message(message)?;
        grouped.entry(worker).or_default().push(seq);
    }
    Some(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_round_trip() {
        let msg = worker_message(3, 17, 5);
        assert_eq!(msg, "Worker 3 | Message 17#####");
        assert_eq!(parse_worker_message(&msg), Some((3, 17)));
    }

    #[test]
    fn malformed_message_rejected() {
        assert_eq!(parse_worker_message("Worker x | Message 1"), None);
        assert_eq!(parse_worker_message("garbage"), None);
        assert!(group_by_worker(&["Worker 1 | Message".to_string()]).is_none());
    }

    #[test]
    fn result_totals() {
        let result = StressTestResult::new(7, 3);
        assert_eq!(result.total_ops, 10);
        assert_eq!(result.successful_ops, 7);
        assert_eq!(result.failed_ops, 3);
    }

    #[test]
    fn grouping_preserves_order() {
        let messages: Vec<String> = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .iter()
            .map(|&(w, s)| worker_message(w, s, 0))
            .collect();
        let grouped = group_by_worker(&messages).unwrap();
        assert_eq!(grouped[&0], [0, 1]);
        assert_eq!(grouped[&1], [0, 1]);
    }
}
