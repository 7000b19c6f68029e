//! Reference-handle contract tests.
//!
//! `RootRef` and `EdgeRef` must emit exactly one event per logical
//! ownership change, and edge teardown on the sweeping thread must be
//! suppressed so cascading payload drops cannot re-enter the collector.

use marksweep::{Collector, EdgeRef, RootRef};

#[test]
fn root_handle_clone_and_drop_balance_the_count() {
    let gc: Collector<u32> = Collector::new();
    let node = gc.allocate(0);

    let first = RootRef::new(&gc, node);
    let second = first.clone();
    gc.process_events();
    assert_eq!(gc.root_count(node).expect("live"), 2);

    drop(second);
    gc.collect();
    assert_eq!(gc.root_count(node).expect("live"), 1);
    assert!(gc.contains(node));

    drop(first);
    gc.collect();
    assert!(!gc.contains(node));
}

#[test]
fn root_handle_reassignment_releases_the_old_target() {
    let gc: Collector<&str> = Collector::new();
    let a = gc.allocate("a");
    let b = gc.allocate("b");

    let mut root = RootRef::new(&gc, a);
    root.set(b);
    gc.process_events();
    assert_eq!(gc.root_count(a).expect("live"), 0);
    assert_eq!(gc.root_count(b).expect("live"), 1);

    // Reassigning to the current target is a no-op.
    root.set(b);
    gc.process_events();
    assert_eq!(gc.root_count(b).expect("live"), 1);

    root.clear();
    assert_eq!(root.target(), None);
    gc.collect();
    assert!(!gc.contains(a));
    assert!(!gc.contains(b));
}

#[test]
fn empty_root_handle_acquires_on_first_set() {
    let gc: Collector<u32> = Collector::new();
    let node = gc.allocate(0);

    let mut root = RootRef::empty(&gc);
    assert_eq!(root.target(), None);
    root.set(node);
    gc.process_events();
    assert_eq!(gc.root_count(node).expect("live"), 1);
}

#[test]
fn edge_handle_reassignment_swaps_one_adjacency_entry() {
    let gc: Collector<u32> = Collector::new();
    let owner = gc.allocate(0);
    let first = gc.allocate(1);
    let second = gc.allocate(2);

    let mut edge = EdgeRef::new(&gc, owner);
    assert_eq!(edge.owner(), owner);
    edge.set(first);
    gc.process_events();
    assert_eq!(gc.neighbors(owner).expect("live"), vec![first]);

    edge.set(second);
    gc.process_events();
    assert_eq!(gc.neighbors(owner).expect("live"), vec![second]);

    edge.clear();
    gc.process_events();
    assert!(gc.neighbors(owner).expect("live").is_empty());
}

#[test]
fn edge_handle_drop_disconnects_outside_collection() {
    let gc: Collector<u32> = Collector::new();
    let owner = gc.allocate(0);
    let target = gc.allocate(1);

    {
        let _edge = EdgeRef::connected(&gc, owner, target);
        gc.process_events();
        assert_eq!(gc.neighbors(owner).expect("live"), vec![target]);
    }
    gc.process_events();
    assert!(gc.neighbors(owner).expect("live").is_empty());
}

struct Payload {
    #[allow(dead_code)]
    name: &'static str,
    next: Option<EdgeRef<Payload>>,
}

impl Payload {
    fn named(name: &'static str) -> Self {
        Self { name, next: None }
    }
}

#[test]
fn sweep_cascade_does_not_deadlock_or_emit_releases() {
    let gc: Collector<Payload> = Collector::new();
    let c = gc.allocate(Payload::named("c"));
    let b = gc.allocate(Payload::named("b"));
    let a = gc.allocate(Payload::named("a"));

    // Track b and c so the sweep owns their reclamation.
    for node in [b, c] {
        let transient = RootRef::new(&gc, node);
        drop(transient);
    }
    gc.with_mut(a, |p| p.next = Some(EdgeRef::connected(&gc, a, b)))
        .expect("live");
    gc.with_mut(b, |p| p.next = Some(EdgeRef::connected(&gc, b, c)))
        .expect("live");

    let root = RootRef::new(&gc, a);
    gc.collect();
    assert!(gc.contains(a) && gc.contains(b) && gc.contains(c));

    // Dropping the last root dooms the whole chain. Reclaiming a drops its
    // payload, whose EdgeRef would normally enqueue a Disconnect; on the
    // sweeping thread that release is suppressed, so the cascade terminates
    // instead of deadlocking on the locks the sweep holds.
    drop(root);
    gc.collect();

    assert!(!gc.contains(a));
    assert!(!gc.contains(b));
    assert!(!gc.contains(c));
    let snapshot = gc.metrics();
    assert_eq!(snapshot.tracked, 0);
    assert_eq!(snapshot.nodes_reclaimed, 3);
    // The suppressed releases left nothing behind in the queue.
    assert_eq!(snapshot.queue_depth, 0);
}

#[test]
fn kept_nodes_keep_their_adjacency_across_sweeps() {
    let gc: Collector<Payload> = Collector::new();
    let keeper = gc.allocate(Payload::named("keeper"));
    let kept_child = gc.allocate(Payload::named("kept_child"));
    let doomed = gc.allocate(Payload::named("doomed"));

    let _root = RootRef::new(&gc, keeper);
    gc.add_edge(keeper, kept_child);
    {
        let transient = RootRef::new(&gc, doomed);
        drop(transient);
    }
    gc.collect();

    assert!(!gc.contains(doomed));
    assert_eq!(gc.neighbors(keeper).expect("live"), vec![kept_child]);
}

#[test]
fn edge_handle_teardown_after_collector_is_gone_is_a_noop() {
    let gc: Collector<u32> = Collector::new();
    let owner = gc.allocate(0);
    let target = gc.allocate(1);
    let edge = EdgeRef::connected(&gc, owner, target);
    gc.process_events();

    drop(gc);
    // The handle only holds the context weakly; releasing after the context
    // is gone must not panic or block.
    drop(edge);
}

#[test]
fn in_gc_is_false_on_mutator_threads() {
    let gc: Collector<u32> = Collector::new();
    assert!(!gc.in_gc());
    gc.collect();
    assert!(!gc.in_gc());
}
