use std::cell::Cell;

thread_local! {
    static IN_COLLECTOR: Cell<bool> = Cell::new(false);
}

/// True when the current thread is inside a `collect` critical section.
///
/// The flag is per thread and process-wide, not per collector instance:
/// edge-handle teardown consults it to decide whether a release event may be
/// emitted at all.
pub(crate) fn in_collector() -> bool {
    IN_COLLECTOR.with(|flag| flag.get())
}

/// Scope marker for the collector critical section.
///
/// `enter` returns `None` when the calling thread is already collecting,
/// which is how same-thread reentry degrades to a no-op before any lock is
/// taken. Dropping the marker clears the flag on every exit path, including
/// unwinds out of contract-violation panics.
pub(crate) struct CollectSection(());

impl CollectSection {
    pub fn enter() -> Option<Self> {
        IN_COLLECTOR.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(CollectSection(()))
            }
        })
    }
}

impl Drop for CollectSection {
    fn drop(&mut self) {
        IN_COLLECTOR.with(|flag| flag.set(false));
    }
}
