//! Cross-structure behavioral tests: recency bookkeeping in the LRU
//! cache, heap ordering under mixed insert/append workloads, hash-queue
//! duplicate handling, and a model check of the deque against
//! `VecDeque`.

use std::collections::VecDeque;

use proptest::prelude::*;

use datakit::cache::LruCache;
use datakit::ds::{Deque, HashQueue, MaxHeap, MinHeap};
use datakit::error::{HeapError, StructError};

#[test]
fn lru_honors_zero_capacity() {
    let mut cache: LruCache<u64, u64> = LruCache::new(0);
    for key in 0..10 {
        assert_eq!(cache.insert(key, key), None);
    }
    assert!(cache.is_empty());
    assert_eq!(cache.pop_lru(), None);
    cache.debug_validate_invariants();
}

#[test]
fn lru_eviction_follows_access_history() {
    let mut cache = LruCache::new(5);
    for key in 0u32..5 {
        cache.insert(key, key * 100);
    }
    // Refresh 0 and 2; they must outlive the second wave.
    cache.get(&0);
    cache.touch(&2);

    for key in 5u32..8 {
        cache.insert(key, key * 100);
    }

    assert!(cache.contains_key(&0));
    assert!(cache.contains_key(&2));
    for key in [1, 3, 4] {
        assert!(!cache.contains_key(&key));
    }
    cache.debug_validate_invariants();
}

#[test]
fn lru_drains_in_recency_order() {
    let mut cache = LruCache::new(4);
    for key in ["a", "b", "c", "d"] {
        cache.insert(key, ());
    }
    cache.get(&"b");
    cache.get(&"a");

    let order: Vec<_> = std::iter::from_fn(|| cache.pop_lru().map(|(k, _)| k)).collect();
    assert_eq!(order, vec!["c", "d", "b", "a"]);
}

#[test]
fn lru_heavy_churn_stays_consistent() {
    let mut cache = LruCache::new(64);
    for round in 0u64..1_000 {
        cache.insert(round % 100, round);
        if round % 3 == 0 {
            cache.get(&(round % 50));
        }
        if round % 7 == 0 {
            cache.remove(&(round % 25));
        }
    }
    assert!(cache.len() <= 64);
    cache.debug_validate_invariants();
}

#[test]
fn min_and_max_heaps_drain_sorted() {
    let values = [42u32, 7, 99, 7, 0, 63, 18];

    let mut min = MinHeap::try_min(16).unwrap();
    let mut max = MaxHeap::try_max(16).unwrap();
    for value in values {
        min.append(value).unwrap();
        max.insert(value).unwrap();
    }

    let mut ascending = Vec::new();
    while let Ok(value) = min.pop() {
        ascending.push(value);
    }
    let mut descending = Vec::new();
    while let Ok(value) = max.pop() {
        descending.push(value);
    }

    let mut expected = values.to_vec();
    expected.sort_unstable();
    assert_eq!(ascending, expected);
    expected.reverse();
    assert_eq!(descending, expected);
}

#[test]
fn heap_capacity_is_a_hard_limit() {
    let mut heap = MinHeap::try_min(2).unwrap();
    heap.insert(1).unwrap();
    heap.append(2).unwrap();
    assert_eq!(heap.insert(3), Err(HeapError::Full { capacity: 2 }));
    assert_eq!(heap.append(3), Err(HeapError::Full { capacity: 2 }));
    assert_eq!(heap.pop(), Ok(1));
    heap.insert(0).unwrap();
    assert_eq!(heap.pop(), Ok(0));
}

#[test]
fn displace_keeps_heap_ordered() {
    let mut heap = MinHeap::try_min(8).unwrap();
    for value in [10u32, 20, 30, 40] {
        heap.append(value).unwrap();
    }
    assert_eq!(heap.displace(25), Ok(10));
    assert_eq!(heap.displace(5), Ok(20));

    let mut drained = Vec::new();
    while let Ok(value) = heap.pop() {
        drained.push(value);
    }
    assert_eq!(drained, vec![5, 25, 30, 40]);
}

#[test]
fn hash_queue_interleaved_operations() {
    let mut queue = HashQueue::new();
    queue.enqueue("a");
    queue.enqueue("b");
    queue.enqueue("a");
    queue.enqueue("c");

    assert_eq!(queue.remove(&"a"), Ok(true));
    assert_eq!(queue.dequeue(), Ok("b"));
    assert!(queue.contains(&"a"));
    queue.enqueue("b");

    let order: Vec<_> = queue.iter().copied().collect();
    assert_eq!(order, vec!["a", "c", "b"]);
    queue.debug_validate_invariants();
}

#[test]
fn deque_handles_survive_unrelated_churn() {
    let mut deque = Deque::new();
    let keeper = deque.push_back(0u32);
    for value in 1..100 {
        let id = deque.push_back(value);
        if value % 2 == 0 {
            deque.remove(id).unwrap();
        }
    }
    assert_eq!(deque.get(keeper), Some(&0));
    deque.move_to_back(keeper).unwrap();
    assert_eq!(deque.back(), Ok(&0));
    deque.debug_validate_invariants();
}

#[test]
fn deque_count_and_len_agree() {
    let mut deque = Deque::new();
    for value in 0..1_000u32 {
        deque.push_front(value);
    }
    assert_eq!(deque.len(), 1_000);
    assert_eq!(deque.count(), Ok(1_000));
    assert_eq!(
        StructError::CountOverflow { len: 5 }.to_string(),
        "length 5 exceeds the 32-bit count range"
    );
}

proptest! {
    // The deque must agree with VecDeque under a random sequence of
    // push/pop operations at both ends.
    #[test]
    fn deque_matches_vecdeque_model(ops in prop::collection::vec(0u8..4, 1..200)) {
        let mut deque = Deque::new();
        let mut model: VecDeque<u8> = VecDeque::new();

        for (step, op) in ops.iter().enumerate() {
            let value = step as u8;
            match op {
                0 => {
                    deque.push_back(value);
                    model.push_back(value);
                },
                1 => {
                    deque.push_front(value);
                    model.push_front(value);
                },
                2 => {
                    prop_assert_eq!(deque.pop_front().ok(), model.pop_front());
                },
                _ => {
                    prop_assert_eq!(deque.pop_back().ok(), model.pop_back());
                },
            }
            prop_assert_eq!(deque.len(), model.len());
        }
        let collected: Vec<u8> = deque.iter().copied().collect();
        let expected: Vec<u8> = model.iter().copied().collect();
        prop_assert_eq!(collected, expected);
        deque.debug_validate_invariants();
    }

    #[test]
    fn min_heap_matches_sorted_model(values in prop::collection::vec(any::<u16>(), 0..128)) {
        let mut heap = MinHeap::try_min(128.max(1)).unwrap();
        for &value in &values {
            heap.append(value).unwrap();
        }
        let mut drained = Vec::new();
        while let Ok(value) = heap.pop() {
            drained.push(value);
        }
        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(drained, expected);
    }
}
