pub use crate::cache::LruCache;
pub use crate::ds::{
    Deque, FixedHeap, HashQueue, HeapProperty, MaxByKey, MaxFirst, MaxHeap, MinByKey, MinFirst,
    MinHeap, NodeId,
};
pub use crate::error::{ConfigError, DecodeError, HeapError, StructError};

#[cfg(feature = "concurrency")]
pub use crate::cache::ConcurrentLruCache;

pub use crate::codec::{base16, base32, base64};
