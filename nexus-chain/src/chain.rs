//! Sub-chain handles.
//!
//! A [`Chain`] is a head/tail/len triple over nodes in storage. Queues hold
//! one, and the sorts cut a queue's chain into many and splice them back.
//! A chain is moved, never copied, so a node belongs to one chain at a time.

use crate::{Key, QueueNode, Storage};

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Chain<K: Key> {
    pub(crate) head: K,
    pub(crate) tail: K,
    pub(crate) len: usize,
}

impl<K: Key> Chain<K> {
    pub(crate) const fn empty() -> Self {
        Self {
            head: K::NONE,
            tail: K::NONE,
            len: 0,
        }
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves the contents out, leaving `self` empty.
    #[inline]
    pub(crate) fn take(&mut self) -> Self {
        core::mem::replace(self, Self::empty())
    }

    /// Links a detached node after the tail. O(1).
    #[inline]
    pub(crate) fn push_back<S>(&mut self, storage: &mut S, key: K)
    where
        S: Storage<QueueNode<K>, Key = K>,
    {
        set_next(storage, key, K::NONE);
        if self.tail.is_some() {
            set_next(storage, self.tail, key);
        } else {
            self.head = key;
        }
        self.tail = key;
        self.len += 1;
    }

    /// Links a detached node before the head. O(1).
    #[inline]
    pub(crate) fn push_front<S>(&mut self, storage: &mut S, key: K)
    where
        S: Storage<QueueNode<K>, Key = K>,
    {
        set_next(storage, key, self.head);
        if self.head.is_none() {
            self.tail = key;
        }
        self.head = key;
        self.len += 1;
    }

    /// Detaches the head node and returns its key.
    #[inline]
    pub(crate) fn pop_front<S>(&mut self, storage: &mut S) -> Option<K>
    where
        S: Storage<QueueNode<K>, Key = K>,
    {
        let key = self.head.to_option()?;
        self.head = next_of(storage, key);
        set_next(storage, key, K::NONE);
        self.len -= 1;
        if self.len == 0 {
            self.tail = K::NONE;
        }
        Some(key)
    }

    /// Returns `self ++ other`. O(1).
    ///
    /// An empty side yields the other side unchanged.
    #[inline]
    pub(crate) fn concat<S>(self, storage: &mut S, other: Self) -> Self
    where
        S: Storage<QueueNode<K>, Key = K>,
    {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }

        set_next(storage, self.tail, other.head);
        Self {
            head: self.head,
            tail: other.tail,
            len: self.len + other.len,
        }
    }

    /// Severs the chain after its first `len / 2` nodes.
    ///
    /// The front half has `floor(len/2)` nodes, the back `ceil(len/2)`.
    /// Requires `len >= 2`.
    pub(crate) fn split_half<S>(self, storage: &mut S) -> (Self, Self)
    where
        S: Storage<QueueNode<K>, Key = K>,
    {
        debug_assert!(self.len >= 2, "split_half needs two nodes");

        let front_len = self.len / 2;
        let mid = self.nth_key(storage, front_len - 1);
        let back_head = next_of(storage, mid);
        set_next(storage, mid, K::NONE);

        let front = Self {
            head: self.head,
            tail: mid,
            len: front_len,
        };
        let back = Self {
            head: back_head,
            tail: self.tail,
            len: self.len - front_len,
        };
        (front, back)
    }

    /// Returns the key `n` hops from head. Requires `n < len`.
    pub(crate) fn nth_key<S>(&self, storage: &S, n: usize) -> K
    where
        S: Storage<QueueNode<K>, Key = K>,
    {
        debug_assert!(n < self.len);
        let mut key = self.head;
        for _ in 0..n {
            key = next_of(storage, key);
        }
        key
    }

    /// Points every link at its predecessor and swaps head with tail.
    pub(crate) fn reverse<S>(&mut self, storage: &mut S)
    where
        S: Storage<QueueNode<K>, Key = K>,
    {
        let mut prev = K::NONE;
        let mut curr = self.head;
        while curr.is_some() {
            let next = next_of(storage, curr);
            set_next(storage, curr, prev);
            prev = curr;
            curr = next;
        }
        core::mem::swap(&mut self.head, &mut self.tail);
    }
}

// Every key handed to these comes from walking a chain over the same storage,
// so it is occupied.

#[inline]
pub(crate) fn next_of<K, S>(storage: &S, key: K) -> K
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
{
    // Safety: key is a chain member (see above)
    unsafe { storage.get_unchecked(key) }.next
}

#[inline]
pub(crate) fn set_next<K, S>(storage: &mut S, key: K, next: K)
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
{
    // Safety: key is a chain member (see above)
    unsafe { storage.get_unchecked_mut(key) }.next = next;
}

#[inline]
pub(crate) fn value_of<K, S>(storage: &S, key: K) -> &str
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
{
    // Safety: key is a chain member (see above)
    unsafe { storage.get_unchecked(key) }.value()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::BoxedStorage;
    use crate::node::create_node;

    pub(crate) type TestStorage = BoxedStorage<QueueNode<u32>, u32>;

    /// Builds a chain holding `values` in order.
    pub(crate) fn chain_of(storage: &mut TestStorage, values: &[&str]) -> Chain<u32> {
        let mut chain = Chain::empty();
        for value in values {
            let key = storage.try_insert(create_node(value).unwrap()).unwrap();
            chain.push_back(storage, key);
        }
        chain
    }

    /// Collects values by walking links from head, checking len and tail.
    pub(crate) fn values(storage: &TestStorage, chain: &Chain<u32>) -> Vec<String> {
        let mut out = Vec::new();
        let mut last = u32::NONE;
        let mut key = chain.head;
        while key.is_some() {
            out.push(value_of(storage, key).to_string());
            last = key;
            key = next_of(storage, key);
        }
        assert_eq!(out.len(), chain.len);
        assert_eq!(last, chain.tail);
        out
    }

    #[test]
    fn push_back_and_front() {
        let mut storage = TestStorage::with_capacity(8);
        let mut chain = chain_of(&mut storage, &["b", "c"]);
        let a = storage.try_insert(create_node("a").unwrap()).unwrap();
        chain.push_front(&mut storage, a);
        assert_eq!(values(&storage, &chain), ["a", "b", "c"]);
    }

    #[test]
    fn pop_front_to_empty() {
        let mut storage = TestStorage::with_capacity(4);
        let mut chain = chain_of(&mut storage, &["a", "b"]);

        let a = chain.pop_front(&mut storage).unwrap();
        assert_eq!(value_of(&storage, a), "a");
        assert!(next_of(&storage, a).is_none());
        assert_eq!(values(&storage, &chain), ["b"]);

        chain.pop_front(&mut storage).unwrap();
        assert_eq!(chain, Chain::empty());
        assert_eq!(chain.pop_front(&mut storage), None);
    }

    #[test]
    fn concat_with_empty_sides() {
        let mut storage = TestStorage::with_capacity(8);
        let chain = chain_of(&mut storage, &["a", "b"]);
        let (head, tail) = (chain.head, chain.tail);

        let chain = chain.concat(&mut storage, Chain::empty());
        assert_eq!((chain.head, chain.tail, chain.len), (head, tail, 2));

        let chain = Chain::empty().concat(&mut storage, chain);
        assert_eq!((chain.head, chain.tail, chain.len), (head, tail, 2));
    }

    #[test]
    fn concat_two_chains() {
        let mut storage = TestStorage::with_capacity(8);
        let left = chain_of(&mut storage, &["a", "b"]);
        let right = chain_of(&mut storage, &["c"]);
        let joined = left.concat(&mut storage, right);
        assert_eq!(values(&storage, &joined), ["a", "b", "c"]);
    }

    #[test]
    fn split_half_sizes() {
        for n in 2..9 {
            let mut storage = TestStorage::with_capacity(16);
            let names: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let chain = chain_of(&mut storage, &refs);

            let (front, back) = chain.split_half(&mut storage);
            assert_eq!(front.len, n / 2);
            assert_eq!(back.len, n - n / 2);
            assert_eq!(values(&storage, &front), refs[..n / 2]);
            assert_eq!(values(&storage, &back), refs[n / 2..]);
        }
    }

    #[test]
    fn reverse_relinks() {
        let mut storage = TestStorage::with_capacity(8);
        let mut chain = chain_of(&mut storage, &["a", "b", "c"]);
        let (head, tail) = (chain.head, chain.tail);

        chain.reverse(&mut storage);
        assert_eq!(values(&storage, &chain), ["c", "b", "a"]);
        assert_eq!((chain.head, chain.tail), (tail, head));
        assert_eq!(storage.len(), 3);
    }
}
