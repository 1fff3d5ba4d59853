//! Handle-style operations that tolerate an absent queue.
//!
//! Drivers that hold a queue as `Option<StrQueue>` call these directly.
//! An absent queue is a normal case: mutating calls report `false` or do
//! nothing, and [`size`] reports 0.
//!
//! ```
//! use nexus_chain::handle;
//!
//! let mut q = handle::new_queue();
//! assert!(handle::insert_tail(q.as_mut(), "b"));
//! assert!(handle::insert_tail(q.as_mut(), "a"));
//! handle::sort(q.as_mut());
//!
//! let mut buf = [0u8; 4];
//! assert!(handle::remove_head(q.as_mut(), Some(&mut buf)));
//! assert_eq!(&buf[..2], b"a\0");
//! assert_eq!(handle::size(q.as_ref()), 1);
//!
//! handle::destroy_queue(q.take());
//! assert!(!handle::insert_head(q.as_mut(), "x"));
//! assert_eq!(handle::size(q.as_ref()), 0);
//! ```

use crate::StrQueue;

/// Creates an empty queue.
///
/// An empty queue allocates nothing, so this always returns `Some`.
pub fn new_queue() -> Option<StrQueue> {
    Some(StrQueue::new())
}

/// Destroys every node and then the queue itself. No-op on `None`.
pub fn destroy_queue(queue: Option<StrQueue>) {
    drop(queue);
}

/// Inserts a copy of `value` at the head.
///
/// Returns `false` if the queue is absent or the value cannot be allocated.
pub fn insert_head(queue: Option<&mut StrQueue>, value: &str) -> bool {
    queue.is_some_and(|q| q.insert_head(value).is_ok())
}

/// Inserts a copy of `value` at the tail.
///
/// Returns `false` if the queue is absent or the value cannot be allocated.
pub fn insert_tail(queue: Option<&mut StrQueue>, value: &str) -> bool {
    queue.is_some_and(|q| q.insert_tail(value).is_ok())
}

/// Removes the head, copying its value truncated into `out` if given.
///
/// Returns `false` if the queue is absent or empty.
pub fn remove_head(queue: Option<&mut StrQueue>, out: Option<&mut [u8]>) -> bool {
    queue.is_some_and(|q| q.remove_head(out))
}

/// Returns the number of values, or 0 for an absent queue.
pub fn size(queue: Option<&StrQueue>) -> usize {
    queue.map_or(0, |q| q.len())
}

/// Reverses the queue. No-op on an absent queue.
pub fn reverse(queue: Option<&mut StrQueue>) {
    if let Some(q) = queue {
        q.reverse();
    }
}

/// Sorts the queue with its configured strategy. No-op on an absent queue.
pub fn sort(queue: Option<&mut StrQueue>) {
    if let Some(q) = queue {
        q.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_queue_is_tolerated() {
        assert!(!insert_head(None, "a"));
        assert!(!insert_tail(None, "a"));
        let mut buf = [9u8; 2];
        assert!(!remove_head(None, Some(&mut buf)));
        assert_eq!(buf, [9, 9]);
        assert_eq!(size(None), 0);
        reverse(None);
        sort(None);
        destroy_queue(None);
    }

    #[test]
    fn empty_queue_remove_fails() {
        let mut q = new_queue();
        assert!(q.is_some());
        assert!(!remove_head(q.as_mut(), None));
        assert_eq!(size(q.as_ref()), 0);
    }

    #[test]
    fn inserts_are_unbounded_and_fifo() {
        let mut q = new_queue();
        let inserted = (0..1000)
            .filter(|i| insert_tail(q.as_mut(), &i.to_string()))
            .count();
        assert_eq!(inserted, 1000);
        assert_eq!(size(q.as_ref()), 1000);

        let mut buf = [0u8; 8];
        for i in 0..1000 {
            assert!(remove_head(q.as_mut(), Some(&mut buf)));
            let expected = i.to_string();
            assert_eq!(&buf[..expected.len()], expected.as_bytes());
            assert_eq!(buf[expected.len()], 0);
        }
        assert_eq!(size(q.as_ref()), 0);
    }

    #[test]
    fn failed_value_copy_reports_false() {
        let mut q = new_queue();
        assert!(insert_tail(q.as_mut(), "keep"));
        {
            let _guard = crate::node::alloc_failure::arm();
            assert!(!insert_head(q.as_mut(), "lost"));
            assert!(!insert_tail(q.as_mut(), "lost"));
        }
        assert_eq!(size(q.as_ref()), 1);

        let mut buf = [0u8; 8];
        assert!(remove_head(q.as_mut(), Some(&mut buf)));
        assert_eq!(&buf[..5], b"keep\0");
        assert!(!remove_head(q.as_mut(), None));
    }

    #[test]
    fn head_insert_then_reverse() {
        let mut q = new_queue();
        insert_head(q.as_mut(), "x");
        insert_head(q.as_mut(), "y");
        reverse(q.as_mut());

        let mut buf = [0u8; 2];
        assert!(remove_head(q.as_mut(), Some(&mut buf)));
        assert_eq!(&buf, b"x\0");
        assert!(remove_head(q.as_mut(), Some(&mut buf)));
        assert_eq!(&buf, b"y\0");
        destroy_queue(q);
    }
}
