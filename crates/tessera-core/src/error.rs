//! Error type shared by the arena and every store.
//!
//! All failures are immediate and leave the arena unchanged: writes are
//! validated in full before any byte is touched.

use std::error::Error;
use std::fmt;

use crate::id::Ptr;
use crate::region::Region;

/// Errors that can occur during arena or store operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// An allocation would run past the end of the buffer.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left between the allocation offset and capacity.
        remaining: usize,
        /// Total buffer size in bytes.
        capacity: usize,
        /// Allocation offset at the time of the request.
        offset: usize,
    },
    /// A read or write touched bytes outside `[0, allocated)`.
    InvalidAddress {
        /// The address that was accessed.
        address: i64,
        /// Width of the access in bytes.
        bytes_needed: usize,
        /// Current allocation boundary.
        allocated: usize,
        /// Total buffer size in bytes.
        capacity: usize,
    },
    /// A stored link is neither null nor a complete record.
    InvalidPointer {
        /// The offending pointer.
        pointer: Ptr,
        /// Size of the record the pointer should reference.
        record_size: u32,
    },
    /// An element index fell outside `[0, length)`.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of elements in the sequence.
        length: usize,
    },
    /// A new region intersects one that is already registered.
    RegionOverlap {
        /// The existing region that was hit.
        conflicting: Region,
    },
    /// A typed array access is wider than the array's element stride.
    ElementWidth {
        /// Element size the array was created with.
        element_size: u32,
        /// Width of the attempted access.
        width: u32,
    },
    /// An array was accessed at a base with no recorded element size.
    UntrackedArray {
        /// Base pointer of the access.
        base: Ptr,
    },
    /// A constructor or configuration parameter was rejected.
    InvalidConfig {
        /// Why the value is invalid.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                remaining,
                capacity,
                offset,
            } => {
                write!(
                    f,
                    "out of memory: requested {requested} bytes, {remaining} remaining \
                     (capacity {capacity}, offset {offset})"
                )
            }
            Self::InvalidAddress {
                address,
                bytes_needed,
                allocated,
                capacity,
            } => {
                write!(
                    f,
                    "invalid address {address}: need {bytes_needed} bytes within \
                     allocated boundary {allocated} (capacity {capacity})"
                )
            }
            Self::InvalidPointer {
                pointer,
                record_size,
            } => {
                write!(
                    f,
                    "invalid pointer {pointer}: not null and not a complete {record_size}-byte record"
                )
            }
            Self::IndexOutOfRange { index, length } => {
                write!(f, "index {index} out of range [0, {length})")
            }
            Self::RegionOverlap { conflicting } => {
                write!(f, "region overlaps with existing region: {conflicting}")
            }
            Self::ElementWidth {
                element_size,
                width,
            } => {
                write!(
                    f,
                    "{width}-byte access does not fit {element_size}-byte array elements"
                )
            }
            Self::UntrackedArray { base } => {
                write!(f, "no array with a recorded element size at {base}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for ArenaError {}
