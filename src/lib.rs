//! datakit: handle-addressable deque, hash-indexed queue, LRU cache,
//! fixed binary heaps, and base-N text codecs.

pub mod cache;
pub mod codec;
pub mod ds;
pub mod error;
pub mod prelude;
