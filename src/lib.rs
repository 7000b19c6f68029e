//! A concurrent, mutator-decoupled mark-and-sweep collector for a
//! manually-linked object graph.
//!
//! Mutator threads allocate nodes into a [`Collector`] and describe
//! reference lifetime through two handle types: [`RootRef`] (scope-bound,
//! keeps a node alive regardless of graph shape) and [`EdgeRef`]
//! (owner-bound, records one `owner -> target` edge). Handles never touch
//! the graph directly; they enqueue events which any thread may later apply
//! with [`Collector::process_events`] or [`Collector::collect`]. An
//! effective `collect` traces reachability from every rooted node and
//! reclaims the tracked nodes it could not reach.
//!
//! Nodes become *tracked*, eligible for sweeping, on their first
//! `add_root` only. A node named solely as an edge target stays allocated
//! for the collector's lifetime; this mirrors the semantics of the graphs
//! the collector was built for and is covered by tests rather than papered
//! over.
//!
//! ```
//! use marksweep::{Collector, RootRef};
//!
//! let gc: Collector<&str> = Collector::new();
//! let head = gc.allocate("head");
//! let tail = gc.allocate("tail");
//!
//! let root = RootRef::new(&gc, head);
//! gc.add_edge(head, tail);
//! gc.collect();
//! assert!(gc.contains(head));
//!
//! drop(root);
//! gc.collect();
//! assert!(!gc.contains(head));
//! // Never rooted, so never tracked: the collector leaves it allocated.
//! assert!(gc.contains(tail));
//! ```

mod arena;
mod collector;
mod error;
mod event;
mod guard;
mod handle;
mod metrics;
mod store;

pub use arena::NodeRef;
pub use collector::{Collector, CollectorOptions};
pub use error::{GcError, Result};
pub use handle::{EdgeRef, RootRef};
pub use metrics::MetricsSnapshot;
