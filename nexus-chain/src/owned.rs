//! StrQueue - a text queue that owns its storage.
//!
//! Bundles a [`Queue`] with a growable [`SlabQueueStorage`], the pivot RNG
//! for quicksort, and the configured [`SortStrategy`]. Use the raw [`Queue`]
//! over a [`BoxedQueueStorage`](crate::BoxedQueueStorage) when several
//! queues should draw nodes from one fixed pool.

use core::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_core::RngCore;

use crate::queue::{Drain, Iter};
use crate::{InsertError, InvariantError, Queue, SlabQueueStorage, SortStrategy};

/// A singly-linked queue of text values that owns its node storage.
///
/// Storage grows on demand, so insertion fails only when the value copy
/// cannot be allocated ([`InsertError::ValueAlloc`]). A failed insert
/// leaves the queue unchanged.
///
/// # Example
///
/// ```
/// use nexus_chain::{SortStrategy, StrQueue};
///
/// let mut queue = StrQueue::new().with_strategy(SortStrategy::Quick);
/// queue.insert_tail("b").unwrap();
/// queue.insert_tail("a").unwrap();
/// queue.insert_tail("c").unwrap();
///
/// queue.sort();
/// assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
///
/// queue.reverse();
/// assert_eq!(queue.pop_front().as_deref(), Some("c"));
/// assert_eq!(queue.len(), 2);
/// ```
pub struct StrQueue<R: RngCore = SmallRng> {
    storage: SlabQueueStorage,
    queue: Queue<SlabQueueStorage, usize>,
    strategy: SortStrategy,
    rng: R,
}

impl StrQueue<SmallRng> {
    /// Creates an empty queue.
    ///
    /// The quicksort pivot RNG is seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Creates an empty queue with room for `capacity` values before the
    /// node storage reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(SlabQueueStorage::with_capacity(capacity), SmallRng::from_os_rng())
    }

    /// Creates a queue holding `values` in order.
    ///
    /// # Errors
    ///
    /// Returns the first insertion failure. The partial queue is dropped.
    pub fn try_from_iter<'a, I>(values: I) -> Result<Self, InsertError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut queue = Self::new();
        for value in values {
            queue.insert_tail(value)?;
        }
        Ok(queue)
    }
}

impl Default for StrQueue<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> StrQueue<R> {
    /// Creates an empty queue drawing quicksort pivots from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self::from_parts(SlabQueueStorage::new(), rng)
    }

    fn from_parts(storage: SlabQueueStorage, rng: R) -> Self {
        Self {
            storage,
            queue: Queue::new(),
            strategy: SortStrategy::default(),
            rng,
        }
    }

    /// Sets the algorithm used by [`sort`](Self::sort).
    pub fn with_strategy(mut self, strategy: SortStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the configured sort strategy.
    #[inline]
    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    /// Changes the sort strategy.
    #[inline]
    pub fn set_strategy(&mut self, strategy: SortStrategy) {
        self.strategy = strategy;
    }

    /// Returns the number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns how many values fit before the node storage reallocates.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Copies `value` in at the head.
    ///
    /// # Errors
    ///
    /// See [`Queue::insert_head`].
    #[inline]
    pub fn insert_head(&mut self, value: &str) -> Result<(), InsertError> {
        self.queue.insert_head(&mut self.storage, value).map(drop)
    }

    /// Copies `value` in at the tail.
    ///
    /// # Errors
    ///
    /// See [`Queue::insert_tail`].
    #[inline]
    pub fn insert_tail(&mut self, value: &str) -> Result<(), InsertError> {
        self.queue.insert_tail(&mut self.storage, value).map(drop)
    }

    /// Removes and returns the head value.
    #[inline]
    pub fn pop_front(&mut self) -> Option<Box<str>> {
        self.queue.pop_front(&mut self.storage)
    }

    /// Removes the head value, copying it truncated into `out`.
    ///
    /// See [`Queue::remove_head`].
    #[inline]
    pub fn remove_head(&mut self, out: Option<&mut [u8]>) -> bool {
        self.queue.remove_head(&mut self.storage, out)
    }

    /// Returns the head value.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.queue.front(&self.storage)
    }

    /// Returns the tail value.
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.queue.back(&self.storage)
    }

    /// Returns an iterator over values, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, SlabQueueStorage, usize> {
        self.queue.iter(&self.storage)
    }

    /// Empties the queue, yielding owned values head first.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, SlabQueueStorage, usize> {
        self.queue.drain(&mut self.storage)
    }

    /// Destroys every value.
    #[inline]
    pub fn clear(&mut self) {
        self.queue.clear(&mut self.storage);
    }

    /// Reverses the queue in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.queue.reverse(&mut self.storage);
    }

    /// Sorts ascending by bytes with the configured strategy.
    #[inline]
    pub fn sort(&mut self) {
        self.queue.sort(&mut self.storage, self.strategy, &mut self.rng);
    }

    /// Sorts with stable merge sort, whatever the configured strategy.
    #[inline]
    pub fn sort_merge(&mut self) {
        self.queue.sort_merge(&mut self.storage);
    }

    /// Sorts with randomized quicksort, whatever the configured strategy.
    #[inline]
    pub fn sort_quick(&mut self) {
        self.queue.sort_quick(&mut self.storage, &mut self.rng);
    }

    /// Verifies the structural invariants. See [`Queue::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.queue.check_invariants(&self.storage)
    }
}

impl<R: RngCore> Drop for StrQueue<R> {
    fn drop(&mut self) {
        self.queue.clear(&mut self.storage);
    }
}

impl<R: RngCore> fmt::Debug for StrQueue<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, R: RngCore> IntoIterator for &'a StrQueue<R> {
    type Item = &'a str;
    type IntoIter = Iter<'a, SlabQueueStorage, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> StrQueue<SmallRng> {
        StrQueue::with_rng(SmallRng::seed_from_u64(11))
    }

    #[test]
    fn defaults() {
        let queue = StrQueue::new();
        assert_eq!(queue.strategy(), SortStrategy::Merge);
        assert!(queue.is_empty());
        assert_eq!(format!("{queue:?}"), "[]");

        let queue = StrQueue::with_capacity(5);
        assert!(queue.capacity() >= 5);
        assert!(queue.is_empty());
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut queue = StrQueue::with_capacity(2);
        for i in 0..100 {
            queue.insert_tail(&i.to_string()).unwrap();
        }
        assert_eq!(queue.len(), 100);
        for i in 0..100 {
            assert_eq!(queue.pop_front().as_deref(), Some(i.to_string().as_str()));
        }
        queue.check_invariants().unwrap();
    }

    #[test]
    fn head_and_tail_inserts() {
        let mut queue = seeded();
        queue.insert_tail("a").unwrap();
        queue.insert_head("b").unwrap();
        queue.insert_tail("c").unwrap();
        assert_eq!(format!("{queue:?}"), r#"["b", "a", "c"]"#);
        queue.check_invariants().unwrap();
    }

    #[test]
    fn sort_uses_configured_strategy() {
        for strategy in [SortStrategy::Merge, SortStrategy::Quick] {
            let mut queue = seeded().with_strategy(strategy);
            for value in ["pear", "apple", "fig", "apple", "kiwi"] {
                queue.insert_tail(value).unwrap();
            }
            queue.sort();
            let values: Vec<&str> = queue.iter().collect();
            assert_eq!(values, ["apple", "apple", "fig", "kiwi", "pear"]);
            queue.check_invariants().unwrap();
        }
    }

    #[test]
    fn explicit_sorts_ignore_strategy() {
        let mut queue = seeded();
        queue.set_strategy(SortStrategy::Quick);
        for value in ["c", "a", "b"] {
            queue.insert_head(value).unwrap();
        }
        queue.sort_merge();
        assert_eq!(queue.front(), Some("a"));
        queue.reverse();
        queue.sort_quick();
        assert_eq!(queue.back(), Some("c"));
    }

    #[test]
    fn try_from_iter_collects_in_order() {
        let queue = StrQueue::try_from_iter(["w", "x", "y", "z"]).unwrap();
        assert_eq!(queue.iter().collect::<Vec<_>>(), ["w", "x", "y", "z"]);

        let empty = StrQueue::try_from_iter(core::iter::empty()).unwrap();
        assert!(empty.is_empty());
        empty.check_invariants().unwrap();
    }

    #[test]
    fn drain_and_into_iter() {
        let mut queue = StrQueue::try_from_iter(["1", "2", "3"]).unwrap();
        let mut seen = Vec::new();
        for value in &queue {
            seen.push(value.to_string());
        }
        assert_eq!(seen, ["1", "2", "3"]);

        let drained: Vec<Box<str>> = queue.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(queue.is_empty());
        queue.check_invariants().unwrap();
    }

    #[test]
    fn remove_head_copies_into_buffer() {
        let mut queue = StrQueue::try_from_iter(["hello"]).unwrap();
        let mut buf = [0u8; 3];
        assert!(queue.remove_head(Some(&mut buf)));
        assert_eq!(&buf, b"he\0");
        assert!(!queue.remove_head(Some(&mut buf)));
    }

    #[test]
    fn clear_then_reuse() {
        let mut queue = seeded();
        queue.insert_tail("a").unwrap();
        queue.insert_tail("b").unwrap();
        queue.clear();
        assert!(queue.is_empty());
        queue.insert_tail("c").unwrap();
        assert_eq!(queue.front(), Some("c"));
        drop(queue);
    }
}
