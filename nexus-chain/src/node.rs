//! Queue nodes.
//!
//! A node owns a private copy of one text value and the key of its
//! successor. Because the successor is a key and not an owning pointer,
//! destroying a node never cascades down the chain: the owner tears a
//! chain down one node at a time.

use crate::{InsertError, Key};

/// A node in a singly-linked chain.
///
/// The value is fixed at construction. Only `next` changes afterwards.
#[derive(Debug)]
pub struct QueueNode<K: Key = u32> {
    value: Box<str>,
    pub(crate) next: K,
}

impl<K: Key> QueueNode<K> {
    /// Returns the stored text.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the successor's key, or `None` if this node ends its chain.
    #[inline]
    pub fn next(&self) -> Option<K> {
        self.next.to_option()
    }

    #[inline]
    pub(crate) fn into_value(self) -> Box<str> {
        self.value
    }
}

/// Copies `value` into a new unlinked node.
///
/// The copy is reserved fallibly, so exhaustion is reported as
/// [`InsertError::ValueAlloc`] rather than aborting.
///
/// # Example
///
/// ```
/// use nexus_chain::node::create_node;
///
/// let node = create_node::<u32>("hello").unwrap();
/// assert_eq!(node.value(), "hello");
/// assert_eq!(node.next(), None);
/// ```
pub fn create_node<K: Key>(value: &str) -> Result<QueueNode<K>, InsertError> {
    #[cfg(test)]
    {
        if alloc_failure::armed() {
            return Err(InsertError::ValueAlloc(value.len()));
        }
    }

    let mut owned = String::new();
    owned
        .try_reserve_exact(value.len())
        .map_err(|_| InsertError::ValueAlloc(value.len()))?;
    owned.push_str(value);

    Ok(QueueNode {
        value: owned.into_boxed_str(),
        next: K::NONE,
    })
}

/// Releases a node and its value.
///
/// Only this node is released, whatever its successor link holds.
#[inline]
pub fn destroy_node<K: Key>(node: QueueNode<K>) {
    drop(node);
}
