//! Chain sorting by relinking.
//!
//! Both sorts order values by their bytes and move nodes between chains
//! without allocating, copying values, or touching storage occupancy.
//!
//! | Strategy | Time | Stack depth | Stable |
//! |----------|------|-------------|--------|
//! | [`SortStrategy::Merge`] | O(n log n) | ⌈log2 n⌉ | yes |
//! | [`SortStrategy::Quick`] | O(n log n) expected, O(n²) worst | ≤ log2 n | no |

use core::cmp::Ordering;

use rand::Rng;
use rand_core::RngCore;

use crate::chain::{Chain, value_of};
use crate::{Key, QueueNode, Storage};

/// Which algorithm `sort` runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortStrategy {
    /// Counted-midpoint split with a stable merge.
    #[default]
    Merge,
    /// Three-way partition around a uniformly random pivot.
    Quick,
}

#[inline]
fn compare<K, S>(storage: &S, a: K, b: K) -> Ordering
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
{
    value_of(storage, a)
        .as_bytes()
        .cmp(value_of(storage, b).as_bytes())
}

// =============================================================================
// Merge sort
// =============================================================================

pub(crate) fn merge_sort<K, S>(storage: &mut S, chain: Chain<K>) -> Chain<K>
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
{
    if chain.len <= 1 {
        return chain;
    }

    let (front, back) = chain.split_half(storage);
    let front = merge_sort(storage, front);
    let back = merge_sort(storage, back);
    merge(storage, front, back)
}

/// Merges two sorted chains. Ties take from `left`.
fn merge<K, S>(storage: &mut S, mut left: Chain<K>, mut right: Chain<K>) -> Chain<K>
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
{
    let mut out = Chain::empty();

    while !left.is_empty() && !right.is_empty() {
        let from = if compare(storage, left.head, right.head) != Ordering::Greater {
            &mut left
        } else {
            &mut right
        };
        if let Some(key) = from.pop_front(storage) {
            out.push_back(storage, key);
        }
    }

    // At most one side is left over, already sorted
    out.concat(storage, left).concat(storage, right)
}

// =============================================================================
// Quicksort
// =============================================================================

pub(crate) fn quick_sort<K, S, R>(storage: &mut S, chain: Chain<K>, rng: &mut R) -> Chain<K>
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
    R: RngCore,
{
    sort_between(storage, Chain::empty(), chain, Chain::empty(), rng)
}

/// Returns `prefix ++ sorted(chain) ++ suffix`.
///
/// Recurses into the smaller partition and loops on the larger, folding
/// finished pieces into `prefix` or `suffix`. Depth stays under log2 n.
fn sort_between<K, S, R>(
    storage: &mut S,
    mut prefix: Chain<K>,
    mut chain: Chain<K>,
    mut suffix: Chain<K>,
    rng: &mut R,
) -> Chain<K>
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
    R: RngCore,
{
    loop {
        if chain.len <= 1 {
            return prefix.concat(storage, chain).concat(storage, suffix);
        }

        let Partition {
            less,
            equal,
            greater,
        } = partition(storage, chain, rng);

        if less.len <= greater.len {
            let sorted = sort_between(storage, prefix, less, Chain::empty(), rng);
            prefix = sorted.concat(storage, equal);
            chain = greater;
        } else {
            let sorted = sort_between(storage, Chain::empty(), greater, suffix, rng);
            suffix = equal.concat(storage, sorted);
            chain = less;
        }
    }
}

struct Partition<K: Key> {
    less: Chain<K>,
    /// Pivot first, then its duplicates.
    equal: Chain<K>,
    greater: Chain<K>,
}

/// Detaches a random pivot and distributes every other node around it.
fn partition<K, S, R>(storage: &mut S, mut chain: Chain<K>, rng: &mut R) -> Partition<K>
where
    K: Key,
    S: Storage<QueueNode<K>, Key = K>,
    R: RngCore,
{
    let pivot = chain.nth_key(storage, rng.random_range(0..chain.len));

    let mut less = Chain::empty();
    let mut equal = Chain::empty();
    let mut greater = Chain::empty();

    while let Some(key) = chain.pop_front(storage) {
        if key == pivot {
            equal.push_front(storage, key);
            continue;
        }
        match compare(storage, key, pivot) {
            Ordering::Less => less.push_back(storage, key),
            Ordering::Equal => equal.push_back(storage, key),
            Ordering::Greater => greater.push_back(storage, key),
        }
    }

    Partition {
        less,
        equal,
        greater,
    }
}
