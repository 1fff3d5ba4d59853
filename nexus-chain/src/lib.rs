//! Singly-linked text queues with relinking sorts.
//!
//! A queue is a chain of nodes, each owning one copy of a text value and the
//! key of its successor. Nodes live in slab storage and the queue only
//! tracks head, tail and length. Every reordering operation (reverse, merge
//! sort, quicksort) works by rewriting links; values are never copied or
//! moved once stored.
//!
//! # Design
//!
//! ```text
//! Storage (Slab)  - owns nodes, hands out stable keys
//! Queue           - head/tail/len over keys, relinks nodes
//! StrQueue        - Queue + its own growable storage + pivot RNG
//! ```
//!
//! Links are keys rather than owning pointers, so a node is destroyed
//! exactly once (when its slot is freed) and tearing down a long chain
//! never recurses.
//!
//! # Quick Start
//!
//! ```
//! use nexus_chain::StrQueue;
//!
//! let mut queue = StrQueue::new();
//! queue.insert_tail("b").unwrap();
//! queue.insert_tail("a").unwrap();
//! queue.insert_tail("c").unwrap();
//!
//! queue.sort();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
//! assert_eq!(queue.len(), 3);
//! ```
//!
//! # Shared Storage
//!
//! Several [`Queue`]s can draw from one storage pool. All operations on a
//! queue must use the same storage instance; passing another one is
//! undefined behavior (same discipline as the `slab` crate).
//!
//! ```
//! use nexus_chain::{BoxedQueueStorage, Queue};
//!
//! let mut pool: BoxedQueueStorage = BoxedQueueStorage::with_capacity(64);
//! let mut inbox: Queue<BoxedQueueStorage> = Queue::new();
//! let mut outbox: Queue<BoxedQueueStorage> = Queue::new();
//!
//! inbox.insert_tail(&mut pool, "ping").unwrap();
//! outbox.insert_tail(&mut pool, "pong").unwrap();
//! assert_eq!(pool.len(), 2);
//!
//! inbox.clear(&mut pool);
//! outbox.clear(&mut pool);
//! assert!(pool.is_empty());
//! ```
//!
//! # Sorting
//!
//! | Strategy | Time | Stack depth | Stable |
//! |----------|------|-------------|--------|
//! | [`SortStrategy::Merge`] (default) | O(n log n) | ⌈log2 n⌉ | yes |
//! | [`SortStrategy::Quick`] | O(n log n) expected | ≤ log2 n | no |
//!
//! Values compare by their bytes. Neither sort allocates.
//!
//! # Failure
//!
//! [`StrQueue`] grows on demand, so its inserts fail only when the value
//! copy cannot be allocated. A [`Queue`] over a fixed [`BoxedQueueStorage`]
//! pool also fails once every slot is taken. Either way the error is an
//! [`InsertError`] and the queue is left unchanged. Removing from an empty
//! queue returns `None`/`false`.

#![warn(missing_docs)]

mod chain;
pub mod error;
pub mod handle;
pub mod key;
pub mod node;
pub mod owned;
pub mod queue;
pub mod sort;
pub mod storage;

pub use error::{InsertError, InvariantError};
pub use key::Key;
pub use node::QueueNode;
pub use owned::StrQueue;
pub use queue::{BoxedQueueStorage, Queue, SlabQueueStorage, copy_truncated};
pub use sort::SortStrategy;
pub use storage::{BoxedStorage, Full, Storage};
