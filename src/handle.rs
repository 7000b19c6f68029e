use std::sync::Weak;

use crate::arena::NodeRef;
use crate::collector::{Collector, Inner};
use crate::event::Event;
use crate::guard;

/// Scope-bound root reference.
///
/// Every live `RootRef` contributes one increment to its target's root
/// count: construction and `clone` each emit an `AddRoot`, dropping or
/// retargeting emits the matching `RemoveRoot`. Keep mutator-held references
/// in `RootRef`s (never raw `NodeRef`s): a node reachable only through
/// bypassed references is invisible to the trace.
///
/// Root handles belong in mutator scopes, not inside node payloads: their
/// teardown is never suppressed, so a payload-held `RootRef` dropped by a
/// sweep would enqueue a `RemoveRoot` for a node the sweep may be reclaiming.
pub struct RootRef<T> {
    collector: Collector<T>,
    target: Option<NodeRef>,
}

impl<T> RootRef<T> {
    /// Acquires a root reference to `target`.
    pub fn new(collector: &Collector<T>, target: NodeRef) -> Self {
        collector.add_root(target);
        Self {
            collector: collector.clone(),
            target: Some(target),
        }
    }

    /// Creates an empty root reference bound to `collector`.
    pub fn empty(collector: &Collector<T>) -> Self {
        Self {
            collector: collector.clone(),
            target: None,
        }
    }

    /// The current target, if any.
    pub fn target(&self) -> Option<NodeRef> {
        self.target
    }

    /// Retargets the handle: releases the current target first (when
    /// different), then acquires `target`.
    pub fn set(&mut self, target: NodeRef) {
        if self.target == Some(target) {
            return;
        }
        self.release();
        self.collector.add_root(target);
        self.target = Some(target);
    }

    /// Releases the current target without acquiring a new one.
    pub fn clear(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(prev) = self.target.take() {
            self.collector.remove_root(prev);
        }
    }
}

impl<T> Clone for RootRef<T> {
    fn clone(&self) -> Self {
        if let Some(target) = self.target {
            self.collector.add_root(target);
        }
        Self {
            collector: self.collector.clone(),
            target: self.target,
        }
    }
}

impl<T> Drop for RootRef<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Owner-bound edge reference, meant to live inside node payloads.
///
/// `set` emits one `Disconnect` for the previous target (when present) and
/// one `Connect` for the new one; `clear` and `Drop` emit the final
/// `Disconnect`. The release is suppressed when the dropping thread is
/// inside `collect`: sweep-triggered payload teardown must not feed events
/// about edges the sweep is already discarding, and the node being torn down
/// is unreachable anyway. Teardown on other threads proceeds normally.
///
/// The handle holds the collector context weakly: payloads live inside the
/// context's own arena, and a strong handle would keep the context alive
/// through its own nodes. After the context is gone, teardown is a no-op.
pub struct EdgeRef<T> {
    collector: Weak<Inner<T>>,
    owner: NodeRef,
    target: Option<NodeRef>,
}

impl<T> EdgeRef<T> {
    /// Creates an empty edge slot owned by `owner`.
    pub fn new(collector: &Collector<T>, owner: NodeRef) -> Self {
        Self {
            collector: collector.downgrade(),
            owner,
            target: None,
        }
    }

    /// Creates an edge slot owned by `owner` already connected to `target`.
    pub fn connected(collector: &Collector<T>, owner: NodeRef, target: NodeRef) -> Self {
        let mut edge = Self::new(collector, owner);
        edge.set(target);
        edge
    }

    /// The owning node.
    pub fn owner(&self) -> NodeRef {
        self.owner
    }

    /// The current target, if any.
    pub fn target(&self) -> Option<NodeRef> {
        self.target
    }

    /// Retargets the edge: disconnects the current target first (when
    /// different), then connects `target`.
    pub fn set(&mut self, target: NodeRef) {
        if self.target == Some(target) {
            return;
        }
        self.release();
        if let Some(inner) = self.collector.upgrade() {
            inner.queue.push(Event::Connect {
                source: self.owner,
                target,
            });
        }
        self.target = Some(target);
    }

    /// Disconnects the current target without connecting a new one.
    pub fn clear(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(prev) = self.target.take() {
            if guard::in_collector() {
                return;
            }
            if let Some(inner) = self.collector.upgrade() {
                inner.queue.push(Event::Disconnect {
                    source: self.owner,
                    target: prev,
                });
            }
        }
    }
}

impl<T> Drop for EdgeRef<T> {
    fn drop(&mut self) {
        self.release();
    }
}
