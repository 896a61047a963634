//! Error types shared by the map and the priority queue.

use alloc::string::String;
use thiserror::Error;

/// Result type alias for fallible operations in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for tree and queue operations.
///
/// Every variant is a local, recoverable condition reported to the caller;
/// none indicates corruption. Internal programming errors (such as a rotation
/// requested on a node without the pivot child) panic instead, because they
/// mean the rebalancing logic itself is broken rather than the input.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The requested key or item is not present.
    #[error("key not found")]
    KeyNotFound,

    /// A neighbor query walked off the end of the ordering: the maximum key
    /// has no successor and the minimum key has no predecessor.
    #[error("no neighbor in that direction")]
    NoNeighbor,

    /// The structure holds no entries.
    #[error("empty")]
    Empty,

    /// An insert-style operation that forbids overwrite found the item
    /// already present.
    #[error("item already present")]
    DuplicateItem,

    /// A diagnostic validation pass found a broken invariant. The message
    /// names the violated property and, where known, the offending key.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
