use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::arena::NodeRef;

/// A graph-mutation intent recorded by a mutator thread.
///
/// Events carry no validation; they are checked only when applied to the
/// graph store, in submission order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Event {
    AddRoot(NodeRef),
    RemoveRoot(NodeRef),
    Connect { source: NodeRef, target: NodeRef },
    Disconnect { source: NodeRef, target: NodeRef },
}

/// FIFO buffer of pending events shared by all mutator threads.
///
/// Producers hold the queue lock only long enough to append one event, so
/// the application order observed by the collector is exactly the
/// lock-acquisition order at push time. Growth is unbounded; draining often
/// (`process_events`) is what keeps the depth in check.
pub(crate) struct EventQueue {
    events: Mutex<VecDeque<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, event: Event) {
        self.events.lock().push_back(event);
    }

    pub fn pop(&self) -> Option<Event> {
        self.events.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }
}
