//! Errors reported by the type-erased entry points.

use std::error::Error;
use std::fmt;

/// Errors that can occur when sorting a type-erased buffer.
///
/// Argument errors are reported before the buffer is touched. `ScratchAlloc` is reported
/// mid-sort, the buffer then holds a permutation of its input in unspecified order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortError {
    /// The element size is zero.
    ZeroElementSize,
    /// `count * size` overflows or does not match the buffer length.
    BufferSizeMismatch {
        /// Number of elements the caller claimed.
        count: usize,
        /// Claimed size of one element in bytes.
        size: usize,
        /// Actual buffer length in bytes.
        len: usize,
    },
    /// A null base pointer was passed together with a non-zero element count.
    NullBuffer,
    /// A null predicate or comparator was passed to a C entry point.
    NullPredicate,
    /// The heapsort fallback could not allocate its single-element scratch slot.
    ScratchAlloc {
        /// Size of the requested slot in bytes.
        size: usize,
    },
}

impl SortError {
    /// Maps the error to the negative errno value returned by the C entry points.
    pub fn errno(&self) -> i32 {
        const EINVAL: i32 = 22;
        const ENOMEM: i32 = 12;

        match self {
            Self::ScratchAlloc { .. } => -ENOMEM,
            Self::ZeroElementSize
            | Self::BufferSizeMismatch { .. }
            | Self::NullBuffer
            | Self::NullPredicate => -EINVAL,
        }
    }
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroElementSize => write!(f, "element size must be at least one byte"),
            Self::BufferSizeMismatch { count, size, len } => {
                write!(
                    f,
                    "buffer of {len} bytes cannot hold {count} elements of {size} bytes"
                )
            }
            Self::NullBuffer => write!(f, "null buffer with non-zero element count"),
            Self::NullPredicate => write!(f, "null ordering function"),
            Self::ScratchAlloc { size } => {
                write!(f, "failed to allocate {size} byte heapsort scratch slot")
            }
        }
    }
}

impl Error for SortError {}
