//! Termination conditions for the exact search.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared counters of a running search.
///
/// Safe to share between the worker threads of one solve.
#[derive(Debug)]
pub struct SearchProgress {
    start: Instant,
    nodes: AtomicU64,
    stopped: AtomicBool,
}

impl SearchProgress {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            nodes: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Counts one explored node and returns the new total.
    #[inline]
    pub fn record_node(&self) -> u64 {
        self.nodes.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn node_count(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Marks the search as cut short.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

/// Trait for determining when to stop searching.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if the search should stop.
    fn is_terminated(&self, progress: &SearchProgress) -> bool;
}

/// Terminates after a time limit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use teamforge_solver::termination::TimeTermination;
///
/// let term = TimeTermination::new(Duration::from_secs(5));
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, progress: &SearchProgress) -> bool {
        progress.elapsed() >= self.limit
    }
}

/// Terminates after a number of explored nodes.
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, progress: &SearchProgress) -> bool {
        progress.node_count() >= self.limit
    }
}

/// Terminates when either child terminates.
#[derive(Debug, Clone)]
pub struct OrTermination<A, B> {
    first: A,
    second: B,
}

impl<A, B> OrTermination<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Termination, B: Termination> Termination for OrTermination<A, B> {
    fn is_terminated(&self, progress: &SearchProgress) -> bool {
        self.first.is_terminated(progress) || self.second.is_terminated(progress)
    }
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, progress: &SearchProgress) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_termination() {
        let progress = SearchProgress::start();
        let term = NodeCountTermination::new(3);

        assert!(!term.is_terminated(&progress));
        progress.record_node();
        progress.record_node();
        assert!(!term.is_terminated(&progress));
        assert_eq!(progress.record_node(), 3);
        assert!(term.is_terminated(&progress));
    }

    #[test]
    fn test_time_termination() {
        let progress = SearchProgress::start();
        assert!(TimeTermination::new(Duration::ZERO).is_terminated(&progress));
        assert!(!TimeTermination::new(Duration::from_secs(3600)).is_terminated(&progress));
    }

    #[test]
    fn test_or_termination() {
        let progress = SearchProgress::start();
        let term = OrTermination::new(
            TimeTermination::new(Duration::from_secs(3600)),
            Some(NodeCountTermination::new(1)),
        );
        assert!(!term.is_terminated(&progress));
        progress.record_node();
        assert!(term.is_terminated(&progress));
    }

    #[test]
    fn test_absent_termination_never_fires() {
        let progress = SearchProgress::start();
        progress.record_node();
        let term: Option<NodeCountTermination> = None;
        assert!(!term.is_terminated(&progress));
    }

    #[test]
    fn test_stop_flag() {
        let progress = SearchProgress::start();
        assert!(!progress.is_stopped());
        progress.stop();
        assert!(progress.is_stopped());
    }
}
