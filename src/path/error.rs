// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::IntersectionId;

/// Error conditions which may occur during a [PathFinder](crate::PathFinder) search.
///
/// An unreachable destination is not an error - it results in an empty path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The origin or destination doesn't exist in the network.
    #[error("invalid intersection: {0}")]
    InvalidReference(IntersectionId),

    /// The search was cancelled through its [CancelToken](crate::CancelToken).
    #[error("path search cancelled")]
    Cancelled,

    /// The background thread of a [PathFindingWorker](crate::PathFindingWorker) panicked.
    #[error("path finding worker panicked")]
    WorkerPanicked,
}

/// Error returned when parsing an [Algorithm](crate::Algorithm) or its parts from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown label structure: {0:?} (expected list, heap, heap:<d> or buckets)")]
    UnknownStructure(String),

    #[error("invalid heap arity: {0:?} (expected an integer >= 2)")]
    InvalidArity(String),

    #[error("unknown candidate policy: {0:?} (expected oldest or newest)")]
    UnknownPolicy(String),
}
