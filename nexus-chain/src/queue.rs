//! Singly-linked text queue over external storage.
//!
//! The queue records head, tail and length. Nodes live in caller-provided
//! storage and link to their successor by key.
//!
//! # Storage Invariant
//!
//! A queue must always be used with the same storage instance. Passing a
//! different storage is undefined behavior. This is the caller's
//! responsibility (same discipline as the `slab` crate). [`StrQueue`]
//! bundles the two when sharing is not needed.
//!
//! # Example
//!
//! ```
//! use nexus_chain::{BoxedQueueStorage, Queue};
//!
//! let mut storage: BoxedQueueStorage = BoxedQueueStorage::with_capacity(16);
//! let mut queue: Queue<BoxedQueueStorage> = Queue::new();
//!
//! queue.insert_tail(&mut storage, "b").unwrap();
//! queue.insert_tail(&mut storage, "a").unwrap();
//! queue.insert_head(&mut storage, "c").unwrap();
//! assert_eq!(queue.iter(&storage).collect::<Vec<_>>(), ["c", "b", "a"]);
//!
//! queue.sort_merge(&mut storage);
//! assert_eq!(queue.iter(&storage).collect::<Vec<_>>(), ["a", "b", "c"]);
//!
//! let mut buf = [0u8; 8];
//! assert!(queue.remove_head(&mut storage, Some(&mut buf)));
//! assert_eq!(&buf[..2], b"a\0");
//! assert_eq!(queue.len(), 2);
//! ```
//!
//! [`StrQueue`]: crate::StrQueue

use std::iter::FusedIterator;
use std::marker::PhantomData;

use rand_core::RngCore;
use tracing::{debug, trace};

use crate::chain::{Chain, next_of, value_of};
use crate::node::{create_node, destroy_node};
use crate::sort::{merge_sort, quick_sort};
use crate::{BoxedStorage, InsertError, InvariantError, Key, QueueNode, SortStrategy, Storage};

/// Fixed-capacity node storage for a [`Queue`].
pub type BoxedQueueStorage<K = u32> = BoxedStorage<QueueNode<K>, K>;

/// Growable node storage for a [`Queue`] backed by `slab::Slab`.
pub type SlabQueueStorage = slab::Slab<QueueNode<usize>>;

/// A singly-linked queue of text values over external storage.
///
/// # Type Parameters
///
/// - `S`: node storage (e.g. [`BoxedQueueStorage`])
/// - `K`: key type (default `u32`)
#[derive(Debug)]
pub struct Queue<S, K: Key = u32>
where
    S: Storage<QueueNode<K>, Key = K>,
{
    chain: Chain<K>,
    _marker: PhantomData<S>,
}

impl<S, K: Key> Default for Queue<S, K>
where
    S: Storage<QueueNode<K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, K: Key> Queue<S, K>
where
    S: Storage<QueueNode<K>, Key = K>,
{
    /// Creates an empty queue.
    #[inline]
    pub const fn new() -> Self {
        Self {
            chain: Chain::empty(),
            _marker: PhantomData,
        }
    }

    /// Returns the number of values in the queue.
    #[inline]
    pub const fn len(&self) -> usize {
        self.chain.len
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns the head node's key, or `None` if empty.
    #[inline]
    pub fn front_key(&self) -> Option<K> {
        self.chain.head.to_option()
    }

    /// Returns the tail node's key, or `None` if empty.
    #[inline]
    pub fn back_key(&self) -> Option<K> {
        self.chain.tail.to_option()
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Copies `value` into a new node linked before the head. O(1).
    ///
    /// # Errors
    ///
    /// Returns [`InsertError`] if the node or its value cannot be
    /// allocated. The queue is unchanged.
    #[inline]
    pub fn insert_head(&mut self, storage: &mut S, value: &str) -> Result<K, InsertError> {
        let key = self.acquire(storage, value)?;
        self.chain.push_front(storage, key);
        Ok(key)
    }

    /// Copies `value` into a new node linked after the tail. O(1).
    ///
    /// # Errors
    ///
    /// Returns [`InsertError`] if the node or its value cannot be
    /// allocated. The queue is unchanged.
    #[inline]
    pub fn insert_tail(&mut self, storage: &mut S, value: &str) -> Result<K, InsertError> {
        let key = self.acquire(storage, value)?;
        self.chain.push_back(storage, key);
        Ok(key)
    }

    fn acquire(&self, storage: &mut S, value: &str) -> Result<K, InsertError> {
        let node = create_node(value).inspect_err(|err| {
            debug!(%err, len = self.chain.len, "node creation failed");
        })?;

        // A rejected node comes back inside the error and is dropped here
        storage.try_insert(node).map_err(|_| {
            debug!(len = self.chain.len, bytes = value.len(), "node storage exhausted");
            InsertError::StorageFull
        })
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Removes the head node and returns its value.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn pop_front(&mut self, storage: &mut S) -> Option<Box<str>> {
        let key = self.chain.pop_front(storage)?;
        storage.remove(key).map(QueueNode::into_value)
    }

    /// Removes the head node, optionally copying its value into `out`.
    ///
    /// At most `out.len() - 1` bytes are copied, followed by a `0`
    /// terminator (see [`copy_truncated`]). Returns `false` and leaves `out`
    /// untouched if the queue is empty.
    #[inline]
    pub fn remove_head(&mut self, storage: &mut S, out: Option<&mut [u8]>) -> bool {
        let Some(value) = self.pop_front(storage) else {
            return false;
        };
        if let Some(buf) = out {
            copy_truncated(&value, buf);
        }
        true
    }

    /// Destroys every node, head to tail.
    pub fn clear(&mut self, storage: &mut S) {
        if self.is_empty() {
            return;
        }
        trace!(len = self.chain.len, "clearing queue");

        let mut chain = self.chain.take();
        while let Some(key) = chain.pop_front(storage) {
            if let Some(node) = storage.remove(key) {
                destroy_node(node);
            }
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the head value.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a str> {
        let key = self.chain.head.to_option()?;
        Some(value_of(storage, key))
    }

    /// Returns the tail value.
    #[inline]
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a str> {
        let key = self.chain.tail.to_option()?;
        Some(value_of(storage, key))
    }

    /// Returns an iterator over values, head to tail.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, S, K> {
        Iter {
            storage,
            current: self.chain.head,
            remaining: self.chain.len,
        }
    }

    /// Empties the queue, returning an iterator over the owned values.
    ///
    /// Nodes are destroyed as the iterator advances. Values not consumed
    /// are destroyed when the iterator is dropped.
    #[inline]
    pub fn drain<'a>(&'a mut self, storage: &'a mut S) -> Drain<'a, S, K> {
        Drain {
            storage,
            chain: self.chain.take(),
        }
    }

    // ========================================================================
    // Reorder
    // ========================================================================

    /// Reverses the queue in place by relinking. O(n), no allocation.
    pub fn reverse(&mut self, storage: &mut S) {
        if self.chain.len <= 1 {
            return;
        }
        trace!(len = self.chain.len, "reversing queue");
        self.chain.reverse(storage);
    }

    /// Sorts ascending by bytes using `strategy`.
    ///
    /// `rng` supplies pivots for [`SortStrategy::Quick`] and is unused by
    /// [`SortStrategy::Merge`].
    pub fn sort<R: RngCore>(&mut self, storage: &mut S, strategy: SortStrategy, rng: &mut R) {
        match strategy {
            SortStrategy::Merge => self.sort_merge(storage),
            SortStrategy::Quick => self.sort_quick(storage, rng),
        }
    }

    /// Stable merge sort. O(n log n).
    pub fn sort_merge(&mut self, storage: &mut S) {
        if self.chain.len <= 1 {
            return;
        }
        trace!(len = self.chain.len, "merge sorting queue");
        let chain = self.chain.take();
        self.chain = merge_sort(storage, chain);
    }

    /// Randomized-pivot quicksort. O(n log n) expected.
    pub fn sort_quick<R: RngCore>(&mut self, storage: &mut S, rng: &mut R) {
        if self.chain.len <= 1 {
            return;
        }
        trace!(len = self.chain.len, "quicksorting queue");
        let chain = self.chain.take();
        self.chain = quick_sort(storage, chain, rng);
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Walks the chain and verifies the structural invariants.
    ///
    /// - `len == 0` iff head is empty iff tail is empty
    /// - head reaches tail in exactly `len - 1` hops, and tail ends the chain
    /// - every link points at an occupied slot
    pub fn check_invariants(&self, storage: &S) -> Result<(), InvariantError> {
        let Chain { head, tail, len } = self.chain;

        let empty = len == 0;
        if head.is_none() != empty || tail.is_none() != empty {
            return Err(InvariantError::EmptyMismatch { len });
        }

        let mut walked = 0;
        let mut last = K::NONE;
        let mut key = head;
        while key.is_some() {
            if walked == len {
                return Err(InvariantError::LengthMismatch {
                    walked: len + 1,
                    len,
                });
            }
            let node = storage
                .get(key)
                .ok_or(InvariantError::DanglingLink { position: walked })?;
            walked += 1;
            last = key;
            key = node.next;
        }

        if walked != len {
            return Err(InvariantError::LengthMismatch { walked, len });
        }
        if last != tail {
            return Err(InvariantError::TailMismatch);
        }
        Ok(())
    }
}

/// Copies `value` into `buf` as a terminated byte string.
///
/// Copies `min(value.len(), buf.len() - 1)` bytes and writes a `0` after
/// them. Returns the number of value bytes copied. An empty `buf` is left
/// alone.
///
/// # Example
///
/// ```
/// use nexus_chain::copy_truncated;
///
/// let mut buf = [0xffu8; 4];
/// assert_eq!(copy_truncated("abcdef", &mut buf), 3);
/// assert_eq!(&buf, b"abc\0");
/// ```
pub fn copy_truncated(value: &str, buf: &mut [u8]) -> usize {
    let Some(room) = buf.len().checked_sub(1) else {
        return 0;
    };
    let n = value.len().min(room);
    buf[..n].copy_from_slice(&value.as_bytes()[..n]);
    buf[n] = 0;
    n
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over queue values, head to tail.
pub struct Iter<'a, S, K: Key> {
    storage: &'a S,
    current: K,
    remaining: usize,
}

impl<'a, S, K: Key> Iterator for Iter<'a, S, K>
where
    S: Storage<QueueNode<K>, Key = K>,
{
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.current.to_option()?;
        let storage = self.storage;
        self.current = next_of(storage, key);
        self.remaining -= 1;
        Some(value_of(storage, key))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S, K: Key> ExactSizeIterator for Iter<'_, S, K> where S: Storage<QueueNode<K>, Key = K> {}

impl<S, K: Key> FusedIterator for Iter<'_, S, K> where S: Storage<QueueNode<K>, Key = K> {}

/// Iterator that removes values from a queue, head first.
pub struct Drain<'a, S, K: Key>
where
    S: Storage<QueueNode<K>, Key = K>,
{
    storage: &'a mut S,
    chain: Chain<K>,
}

impl<S, K: Key> Iterator for Drain<'_, S, K>
where
    S: Storage<QueueNode<K>, Key = K>,
{
    type Item = Box<str>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.chain.pop_front(self.storage)?;
        self.storage.remove(key).map(QueueNode::into_value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<S, K: Key> Drop for Drain<'_, S, K>
where
    S: Storage<QueueNode<K>, Key = K>,
{
    fn drop(&mut self) {
        self.by_ref().for_each(drop);
    }
}
