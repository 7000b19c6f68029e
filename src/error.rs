use thiserror::Error;

use crate::arena::NodeRef;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GcError>;

/// Errors surfaced by the payload-access APIs.
///
/// Contract violations (unbalanced `remove_root`, disconnecting an edge that
/// does not exist, events naming reclaimed nodes) are programming errors and
/// panic instead of returning a value; see the crate docs.
#[derive(Debug, Error)]
pub enum GcError {
    /// The reference names a slot that a sweep has already reclaimed.
    #[error("stale node reference {0}")]
    Stale(NodeRef),
}
