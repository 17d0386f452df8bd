//! Error types for the datakit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a construction parameter is invalid
//!   (e.g. zero heap capacity).
//! - [`StructError`]: Returned by deque / hash-queue / LRU structural
//!   operations whose preconditions are violated (empty structure, stale or
//!   foreign node handle, double link, 32-bit count overflow).
//! - [`HeapError`]: Returned by heap operations on an empty or full heap.
//! - [`DecodeError`]: Returned by the base-N codecs for malformed text
//!   input; carries the offending character and its position.
//!
//! None of these are retried or recovered internally. Every failure is a
//! contract violation surfaced synchronously to the caller; nothing is
//! swallowed or logged.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when a construction parameter is invalid.
///
/// Produced by fallible constructors such as
/// [`FixedHeap::try_new`](crate::ds::FixedHeap::try_new). Carries a
/// human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use datakit::ds::MinHeap;
///
/// let err = MinHeap::<u64>::try_min(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// StructError
// ---------------------------------------------------------------------------

/// Error returned by structural operations on the deque-backed containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructError {
    /// The operation requires a non-empty structure.
    Empty,
    /// The node handle is stale, freed, unlinked where a linked node is
    /// required, or was issued by another deque instance. The cases are
    /// deliberately indistinguishable: a handle that cannot be validated in
    /// O(1) is simply not owned here.
    NotOwned,
    /// The node is still linked and cannot be linked a second time.
    AlreadyLinked,
    /// The structure's length exceeds the range of the 32-bit count
    /// accessor. The full length is available via `len()`.
    CountOverflow {
        /// Actual length of the structure.
        len: usize,
    },
}

impl fmt::Display for StructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("operation requires a non-empty structure"),
            Self::NotOwned => f.write_str("node is not owned by this deque"),
            Self::AlreadyLinked => f.write_str("node is already linked into the deque"),
            Self::CountOverflow { len } => {
                write!(f, "length {len} exceeds the 32-bit count range")
            },
        }
    }
}

impl std::error::Error for StructError {}

// ---------------------------------------------------------------------------
// HeapError
// ---------------------------------------------------------------------------

/// Error returned by heap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The heap has no elements.
    Empty,
    /// The heap is at capacity and cannot accept another element.
    Full {
        /// Fixed capacity of the heap.
        capacity: usize,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("heap is empty"),
            Self::Full { capacity } => write!(f, "heap is full (capacity {capacity})"),
        }
    }
}

impl std::error::Error for HeapError {}

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Error returned by the base-N text codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Hex input must contain an even number of digits.
    OddLength {
        /// Length of the rejected input.
        len: usize,
    },
    /// The input length cannot be produced by the encoder (e.g. a base64
    /// tail of a single surplus character).
    InvalidLength {
        /// Length of the rejected input, excluding stripped padding.
        len: usize,
    },
    /// A character outside the codec's alphabet.
    InvalidChar {
        /// The offending character.
        ch: char,
        /// Byte offset of the character in the input.
        index: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength { len } => write!(f, "hex input has odd length {len}"),
            Self::InvalidLength { len } => {
                write!(f, "input length {len} is not a valid encoding length")
            },
            Self::InvalidChar { ch, index } => {
                write!(f, "invalid character {ch:?} at index {index}")
            },
        }
    }
}

impl std::error::Error for DecodeError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
