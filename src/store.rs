use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::arena::{Arena, NodeRef};
use crate::event::Event;

/// Per-node bookkeeping kept alongside the user payload.
struct NodeRecord<T> {
    value: T,
    /// Outgoing edges, multiset semantics: duplicates stack and disconnect
    /// removes one occurrence.
    edges: SmallVec<[NodeRef; 4]>,
    root_count: u32,
    /// Round in which this node was last proven reachable.
    stamp: u64,
}

/// Result of an effective mark-sweep pass.
pub(crate) struct SweepOutcome {
    pub round: u64,
    pub live: usize,
    pub reclaimed: usize,
}

/// The collector's authoritative model of the graph: node arena, tracked
/// set, round counter, and the changed flag.
///
/// Only ever touched by the thread holding the collector lock. Note the
/// tracked set gains members on `AddRoot` alone: a node named only as an
/// edge target stays allocated but is never swept.
pub(crate) struct GraphStore<T> {
    arena: Arena<NodeRecord<T>>,
    tracked: FxHashSet<NodeRef>,
    round: u64,
    graph_changed: bool,
}

impl<T> GraphStore<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            tracked: FxHashSet::default(),
            round: 0,
            graph_changed: false,
        }
    }

    /// Inserts a payload into the arena. The node is not tracked until its
    /// first `AddRoot` is applied.
    pub fn allocate(&mut self, value: T) -> NodeRef {
        self.arena.insert(NodeRecord {
            value,
            edges: SmallVec::new(),
            root_count: 0,
            stamp: 0,
        })
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        self.arena.contains(node)
    }

    pub fn value(&self, node: NodeRef) -> Option<&T> {
        self.arena.get(node).map(|record| &record.value)
    }

    pub fn value_mut(&mut self, node: NodeRef) -> Option<&mut T> {
        self.arena.get_mut(node).map(|record| &mut record.value)
    }

    pub fn root_count(&self, node: NodeRef) -> Option<u32> {
        self.arena.get(node).map(|record| record.root_count)
    }

    pub fn neighbors(&self, node: NodeRef) -> Option<Vec<NodeRef>> {
        self.arena.get(node).map(|record| record.edges.to_vec())
    }

    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    pub fn allocated_len(&self) -> usize {
        self.arena.len()
    }

    /// Applies one event. Invariant violations are programming errors and
    /// terminate with a panic naming the broken contract.
    pub fn apply(&mut self, event: Event) {
        self.graph_changed = true;
        match event {
            Event::AddRoot(node) => {
                self.record_mut(node, "add_root").root_count += 1;
                self.tracked.insert(node);
            }
            Event::RemoveRoot(node) => {
                let record = self.record_mut(node, "remove_root");
                record.root_count = match record.root_count.checked_sub(1) {
                    Some(count) => count,
                    None => panic!("root count underflow on node {node}: unbalanced remove_root"),
                };
            }
            Event::Connect { source, target } => {
                self.record_mut(source, "add_edge").edges.push(target);
            }
            Event::Disconnect { source, target } => {
                let edges = &mut self.record_mut(source, "remove_edge").edges;
                match edges.iter().position(|&t| t == target) {
                    Some(index) => {
                        edges.remove(index);
                    }
                    None => panic!("remove_edge names missing edge {source} -> {target}"),
                }
            }
        }
    }

    /// One full trace-and-reclaim pass. Returns `None` without touching the
    /// round counter when no event has been applied since the last pass.
    pub fn mark_sweep(&mut self) -> Option<SweepOutcome> {
        if !self.graph_changed {
            return None;
        }
        self.round += 1;
        let round = self.round;

        // Mark. Worklist seeded from rooted nodes; the stamp check happens
        // on pop, so pushing an already-stamped target is merely redundant.
        let mut worklist: Vec<NodeRef> = self
            .tracked
            .iter()
            .copied()
            .filter(|&node| self.rooted(node))
            .collect();
        while let Some(node) = worklist.pop() {
            let record = self.record_mut(node, "trace");
            if record.stamp == round {
                continue;
            }
            record.stamp = round;
            worklist.extend(record.edges.iter().copied());
        }

        // Sweep. Partition the tracked set by stamp, then free the losers;
        // slot removal drops the payload, which may tear down edge handles
        // owned by the node (suppressed by the reentrancy guard).
        let mut kept = FxHashSet::default();
        let mut doomed: Vec<NodeRef> = Vec::new();
        for &node in &self.tracked {
            let stamped = self
                .arena
                .get(node)
                .map_or(false, |record| record.stamp == round);
            if stamped {
                kept.insert(node);
            } else {
                doomed.push(node);
            }
        }
        self.tracked = kept;
        let reclaimed = doomed.len();
        for node in doomed {
            self.arena.remove(node);
        }
        self.graph_changed = false;

        Some(SweepOutcome {
            round,
            live: self.tracked.len(),
            reclaimed,
        })
    }

    fn rooted(&self, node: NodeRef) -> bool {
        self.arena
            .get(node)
            .map_or(false, |record| record.root_count > 0)
    }

    fn record_mut(&mut self, node: NodeRef, op: &str) -> &mut NodeRecord<T> {
        match self.arena.get_mut(node) {
            Some(record) => record,
            None => panic!("{op} names stale node reference {node}"),
        }
    }
}
