//! Error types.

use thiserror::Error;

/// Why an insertion failed.
///
/// Either way the queue is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    /// No free node slot in storage.
    #[error("node storage is full")]
    StorageFull,
    /// The copy of the value could not be allocated.
    #[error("failed to allocate {0} bytes for value")]
    ValueAlloc(usize),
}

/// A broken structural invariant, reported by `check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// Exactly one of head, tail, or len says "empty".
    #[error("head/tail emptiness disagrees with len {len}")]
    EmptyMismatch {
        /// Recorded length.
        len: usize,
    },
    /// Walking from head did not terminate after `len` nodes.
    #[error("walked {walked} nodes from head but len is {len}")]
    LengthMismatch {
        /// Nodes reached before the terminator (capped at `len + 1`).
        walked: usize,
        /// Recorded length.
        len: usize,
    },
    /// The last node reached from head is not the recorded tail.
    #[error("last reachable node is not the tail")]
    TailMismatch,
    /// A link points at a vacant slot.
    #[error("link at position {position} points at a vacant slot")]
    DanglingLink {
        /// Zero-based position of the dangling link in the walk.
        position: usize,
    },
}
