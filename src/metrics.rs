use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime counters for one collector context, updated with relaxed
/// atomics outside the locks.
#[derive(Default)]
pub(crate) struct Metrics {
    pub rounds: AtomicU64,
    pub nodes_reclaimed: AtomicU64,
    pub nodes_allocated: AtomicU64,
    pub events_applied: AtomicU64,
}

impl Metrics {
    pub fn add_rounds(&self, n: u64) {
        self.rounds.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_reclaimed(&self, n: u64) {
        self.nodes_reclaimed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_allocated(&self, n: u64) {
        self.nodes_allocated.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_events(&self, n: u64) {
        self.events_applied.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self, tracked: usize, resident: usize, queue_depth: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            rounds: self.rounds.load(Ordering::Relaxed),
            nodes_reclaimed: self.nodes_reclaimed.load(Ordering::Relaxed),
            nodes_allocated: self.nodes_allocated.load(Ordering::Relaxed),
            events_applied: self.events_applied.load(Ordering::Relaxed),
            tracked,
            resident,
            queue_depth,
        }
    }
}

/// Point-in-time view of collector activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    /// Effective trace-and-reclaim passes completed.
    pub rounds: u64,
    /// Total nodes reclaimed by sweeps.
    pub nodes_reclaimed: u64,
    /// Nodes allocated over the collector's lifetime.
    pub nodes_allocated: u64,
    /// Events applied to the graph store.
    pub events_applied: u64,
    /// Nodes currently in the tracked set.
    pub tracked: usize,
    /// Nodes currently resident in the arena, tracked or not.
    pub resident: usize,
    /// Events waiting in the queue.
    pub queue_depth: usize,
}
