use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::arena::NodeRef;
use crate::error::{GcError, Result};
use crate::event::{Event, EventQueue};
use crate::guard::{self, CollectSection};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::store::GraphStore;

/// Configuration supplied when constructing a [`Collector`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CollectorOptions {
    /// Node slots to preallocate in the arena.
    pub initial_capacity: usize,
}

pub(crate) struct Inner<T> {
    pub(crate) queue: EventQueue,
    store: Mutex<GraphStore<T>>,
    metrics: Metrics,
}

/// A collector context: node arena, event queue, and mark-sweep engine.
///
/// `Collector` is a cheap clone over a shared inner; hand clones to every
/// mutator thread. No thread is dedicated to collection: any thread may
/// drain the queue with [`process_events`](Collector::process_events) or run
/// a full pass with [`collect`](Collector::collect), and both serialize on
/// the collector lock.
///
/// The four event producers ([`add_root`](Collector::add_root),
/// [`remove_root`](Collector::remove_root), [`add_edge`](Collector::add_edge),
/// [`remove_edge`](Collector::remove_edge)) only append to the queue and
/// return; their contracts are enforced when the events are applied.
/// Violations (unbalancing a root count, removing an edge that does not
/// exist, naming a reclaimed node) panic at application time.
pub struct Collector<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Collector<T> {
    /// Creates a collector with default options.
    pub fn new() -> Self {
        Self::with_options(CollectorOptions::default())
    }

    /// Creates a collector with the given options.
    pub fn with_options(options: CollectorOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: EventQueue::new(),
                store: Mutex::new(GraphStore::with_capacity(options.initial_capacity)),
                metrics: Metrics::default(),
            }),
        }
    }

    /// Inserts a payload into the arena and returns its handle.
    ///
    /// The node is not yet tracked: it becomes eligible for sweeping only
    /// once it has been named in an `add_root`. A node that is only ever an
    /// edge target stays allocated for the collector's lifetime.
    pub fn allocate(&self, value: T) -> NodeRef {
        self.inner.metrics.add_allocated(1);
        self.inner.store.lock().allocate(value)
    }

    /// Queues a root acquisition for `node`.
    pub fn add_root(&self, node: NodeRef) {
        self.inner.queue.push(Event::AddRoot(node));
    }

    /// Queues a root release for `node`.
    pub fn remove_root(&self, node: NodeRef) {
        self.inner.queue.push(Event::RemoveRoot(node));
    }

    /// Queues a new `owner -> target` edge. Duplicates stack.
    pub fn add_edge(&self, owner: NodeRef, target: NodeRef) {
        self.inner.queue.push(Event::Connect {
            source: owner,
            target,
        });
    }

    /// Queues removal of one `owner -> target` edge occurrence.
    pub fn remove_edge(&self, owner: NodeRef, target: NodeRef) {
        self.inner.queue.push(Event::Disconnect {
            source: owner,
            target,
        });
    }

    /// Drains the queue and applies every pending event, in submission
    /// order. Never traces; call this from time to time to keep queue depth
    /// bounded without paying for a full pass.
    pub fn process_events(&self) {
        let mut store = self.inner.store.lock();
        self.drain(&mut store);
    }

    /// Drains the queue, then, if any event has been applied since the last
    /// effective pass, runs one full mark-sweep over the graph.
    ///
    /// Reentrant calls from the same thread return immediately without
    /// taking any lock; a sweep-triggered payload drop that reaches back
    /// into the collector is therefore a defined no-op rather than a
    /// deadlock. The caller is otherwise committed to the full pass: there
    /// is no cancellation.
    pub fn collect(&self) {
        let _section = match CollectSection::enter() {
            Some(section) => section,
            None => return,
        };
        let mut store = self.inner.store.lock();
        self.drain(&mut store);
        if let Some(outcome) = store.mark_sweep() {
            self.inner.metrics.add_rounds(1);
            self.inner.metrics.add_reclaimed(outcome.reclaimed as u64);
            debug!(
                round = outcome.round,
                live = outcome.live,
                reclaimed = outcome.reclaimed,
                "collector.sweep"
            );
        }
    }

    /// True when the current thread is inside a `collect` critical section.
    ///
    /// The flag is thread-local and shared by all collector instances in the
    /// process; edge-handle teardown uses it to suppress release events
    /// during sweep-triggered destruction.
    pub fn in_gc(&self) -> bool {
        guard::in_collector()
    }

    /// Whether `node` is still allocated (tracked or not).
    pub fn contains(&self, node: NodeRef) -> bool {
        self.inner.store.lock().contains(node)
    }

    /// The root count of `node` as of the last applied events.
    pub fn root_count(&self, node: NodeRef) -> Result<u32> {
        self.inner
            .store
            .lock()
            .root_count(node)
            .ok_or(GcError::Stale(node))
    }

    /// The outgoing edges of `node` as of the last applied events, in
    /// insertion order, duplicates included.
    pub fn neighbors(&self, node: NodeRef) -> Result<Vec<NodeRef>> {
        self.inner
            .store
            .lock()
            .neighbors(node)
            .ok_or(GcError::Stale(node))
    }

    /// Runs `f` against `node`'s payload under the collector lock.
    ///
    /// The closure may perform handle operations (they only touch the queue
    /// lock) but must not call [`collect`](Collector::collect) or
    /// [`process_events`](Collector::process_events), which would deadlock
    /// on the lock already held.
    pub fn with<R>(&self, node: NodeRef, f: impl FnOnce(&T) -> R) -> Result<R> {
        let store = self.inner.store.lock();
        match store.value(node) {
            Some(value) => Ok(f(value)),
            None => Err(GcError::Stale(node)),
        }
    }

    /// Mutable variant of [`with`](Collector::with); the same restrictions
    /// apply to the closure.
    pub fn with_mut<R>(&self, node: NodeRef, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut store = self.inner.store.lock();
        match store.value_mut(node) {
            Some(value) => Ok(f(value)),
            None => Err(GcError::Stale(node)),
        }
    }

    /// Snapshot of the collector's lifetime counters and current state.
    pub fn metrics(&self) -> MetricsSnapshot {
        let (tracked, resident) = {
            let store = self.inner.store.lock();
            (store.tracked_len(), store.allocated_len())
        };
        self.inner
            .metrics
            .snapshot(tracked, resident, self.inner.queue.len())
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner<T>> {
        Arc::downgrade(&self.inner)
    }

    fn drain(&self, store: &mut GraphStore<T>) {
        let mut applied = 0u64;
        while let Some(event) = self.inner.queue.pop() {
            store.apply(event);
            applied += 1;
        }
        if applied > 0 {
            self.inner.metrics.add_events(applied);
            trace!(applied, "collector.drain");
        }
    }
}
