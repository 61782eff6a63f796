use std::fmt;

use thiserror::Error;

use crate::NodeHandle;

/// Why a [`NodeHandle`] was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleFault {
    /// The handle was issued by a different list.
    ForeignList,
    /// The node behind the handle was removed (and possibly recycled).
    Stale,
    /// The operation needs a node that is linked into the sequence.
    NotLinked,
    /// The operation needs a detached node, but this one is still linked.
    AlreadyLinked,
}

impl fmt::Display for HandleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            HandleFault::ForeignList => "handle belongs to another list",
            HandleFault::Stale => "node was already removed",
            HandleFault::NotLinked => "node is not linked into the list",
            HandleFault::AlreadyLinked => "node is already linked into the list",
        };
        f.write_str(reason)
    }
}

/// Errors reported by [`PooledList`](crate::PooledList) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("Invalid node handle {handle:?}: {fault}")]
    InvalidHandle {
        handle: NodeHandle,
        fault: HandleFault,
    },

    #[error("List is empty")]
    EmptyList,
}

impl ListError {
    pub(crate) fn invalid(handle: NodeHandle, fault: HandleFault) -> Self {
        ListError::InvalidHandle { handle, fault }
    }
}
