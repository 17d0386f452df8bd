pub mod deque;
pub mod fixed_heap;
pub mod hash_queue;

pub use deque::{Deque, NodeId};
pub use fixed_heap::{
    FixedHeap, HeapProperty, MaxByKey, MaxFirst, MaxHeap, MinByKey, MinFirst, MinHeap,
};
pub use hash_queue::HashQueue;
