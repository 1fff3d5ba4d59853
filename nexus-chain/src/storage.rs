//! Slab storage for queue nodes.
//!
//! Storage hands out stable keys on insert and gives the value back on
//! remove. Queues and chains link nodes by key, so a node is created
//! exactly once (on insert) and destroyed exactly once (on remove).

use core::mem::MaybeUninit;
use core::ptr::NonNull;
use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::marker::PhantomData;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// - **Stable keys**: a key stays valid until its value is removed
/// - **O(1)** insert, remove, get
/// - **Slot reuse**: removed slots are handed out again
///
/// # Implementations
///
/// - [`BoxedStorage`] - fixed capacity, one allocation (in this crate)
/// - `slab::Slab<T>` - growable
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Error returned when a value cannot be stored.
    ///
    /// - [`Full<T>`] for fixed-capacity storage
    /// - `Infallible` for growable storage
    type Error;

    /// Stores a value, returning its key.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Self::Error>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns a reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be in bounds and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be in bounds and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;
}

/// Error returned when fixed-capacity storage has no free slot.
///
/// Carries the rejected value back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be stored.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage
// =============================================================================

/// Fixed-capacity slab in a single heap allocation.
///
/// The allocation holds three regions:
///
/// ```text
/// [ entries: MaybeUninit<T> x cap ][ occupancy bitmap ][ free stack: K x cap ]
/// ```
///
/// Capacity is rounded up to a power of two. Keys are handed out lowest
/// first and freed slots are reused LIFO.
///
/// # Example
///
/// ```
/// use nexus_chain::{BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<&str> = BoxedStorage::with_capacity(3);
/// assert_eq!(storage.capacity(), 4);
///
/// let key = storage.try_insert("a").unwrap();
/// assert_eq!(storage.get(key), Some(&"a"));
/// assert_eq!(storage.remove(key), Some("a"));
/// ```
pub struct BoxedStorage<T, K: Key = u32> {
    ptr: NonNull<u8>,
    capacity: usize,
    free_len: usize,
    layout: Layout,
    bitmap_offset: usize,
    free_stack_offset: usize,
    _marker: PhantomData<(T, K)>,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage with at least `min_capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `min_capacity` is 0 or exceeds the key type's range.
    /// Aborts via [`handle_alloc_error`] if the allocation fails.
    pub fn with_capacity(min_capacity: usize) -> Self {
        assert!(min_capacity > 0, "capacity must be > 0");
        let capacity = min_capacity.next_power_of_two();
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        let Some(regions) = Regions::new::<T, K>(capacity) else {
            panic!("capacity overflow");
        };
        match Self::allocate(capacity, regions) {
            Ok(storage) => storage,
            Err(layout) => handle_alloc_error(layout),
        }
    }

    fn allocate(capacity: usize, regions: Regions) -> Result<Self, Layout> {
        let Regions {
            layout,
            bitmap_offset,
            free_stack_offset,
        } = regions;

        // Safety: layout has non-zero size (bitmap holds at least one word)
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            return Err(layout);
        };

        let storage = Self {
            ptr,
            capacity,
            free_len: capacity,
            layout,
            bitmap_offset,
            free_stack_offset,
            _marker: PhantomData,
        };

        // Safety: both regions lie inside the fresh allocation
        unsafe {
            core::ptr::write_bytes(storage.bitmap_ptr(), 0, bitmap_words(capacity));
            let stack = storage.free_stack_ptr();
            for i in 0..capacity {
                // Top of stack is slot 0
                stack.add(i).write(K::from_usize(capacity - 1 - i));
            }
        }

        Ok(storage)
    }

    /// Returns the number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.capacity - self.free_len
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.free_len == self.capacity
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.free_len == 0
    }

    #[inline]
    fn entries_ptr(&self) -> *mut MaybeUninit<T> {
        self.ptr.as_ptr() as *mut MaybeUninit<T>
    }

    #[inline]
    fn bitmap_ptr(&self) -> *mut u64 {
        unsafe { self.ptr.as_ptr().add(self.bitmap_offset) as *mut u64 }
    }

    #[inline]
    fn free_stack_ptr(&self) -> *mut K {
        unsafe { self.ptr.as_ptr().add(self.free_stack_offset) as *mut K }
    }

    #[inline]
    fn is_occupied(&self, slot: usize) -> bool {
        let word = unsafe { *self.bitmap_ptr().add(slot / 64) };
        word & (1 << (slot % 64)) != 0
    }

    #[inline]
    fn set_occupied(&mut self, slot: usize, occupied: bool) {
        let mask = 1u64 << (slot % 64);
        unsafe {
            let word = self.bitmap_ptr().add(slot / 64);
            if occupied {
                *word |= mask;
            } else {
                *word &= !mask;
            }
        }
    }

    #[inline]
    fn occupied(&self, key: K) -> Option<usize> {
        let slot = key.as_usize();
        (slot < self.capacity && self.is_occupied(slot)).then_some(slot)
    }
}

/// Offsets of the bitmap and free stack inside one allocation.
struct Regions {
    layout: Layout,
    bitmap_offset: usize,
    free_stack_offset: usize,
}

impl Regions {
    fn new<T, K>(capacity: usize) -> Option<Self> {
        let entries = Layout::array::<MaybeUninit<T>>(capacity).ok()?;
        let bitmap = Layout::array::<u64>(bitmap_words(capacity)).ok()?;
        let free_stack = Layout::array::<K>(capacity).ok()?;

        let (layout, bitmap_offset) = entries.extend(bitmap).ok()?;
        let (layout, free_stack_offset) = layout.extend(free_stack).ok()?;

        Some(Self {
            layout: layout.pad_to_align(),
            bitmap_offset,
            free_stack_offset,
        })
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;
    type Error = Full<T>;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.free_len == 0 {
            return Err(Full(value));
        }

        self.free_len -= 1;
        // Safety: free_len < capacity
        let key = unsafe { self.free_stack_ptr().add(self.free_len).read() };
        let slot = key.as_usize();

        unsafe { self.entries_ptr().add(slot).write(MaybeUninit::new(value)) };
        self.set_occupied(slot, true);

        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.occupied(key)?;

        self.set_occupied(slot, false);
        // Safety: slot was occupied, bit is now cleared so it is read once
        let value = unsafe { self.entries_ptr().add(slot).read().assume_init() };
        unsafe { self.free_stack_ptr().add(self.free_len).write(key) };
        self.free_len += 1;

        Some(value)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        let slot = self.occupied(key)?;
        Some(unsafe { (*self.entries_ptr().add(slot)).assume_init_ref() })
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let slot = self.occupied(key)?;
        Some(unsafe { (*self.entries_ptr().add(slot)).assume_init_mut() })
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        debug_assert!(self.occupied(key).is_some(), "vacant key");
        unsafe { (*self.entries_ptr().add(key.as_usize())).assume_init_ref() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        debug_assert!(self.occupied(key).is_some(), "vacant key");
        unsafe { (*self.entries_ptr().add(key.as_usize())).assume_init_mut() }
    }
}

impl<T, K: Key> Drop for BoxedStorage<T, K> {
    fn drop(&mut self) {
        for slot in 0..self.capacity {
            if self.is_occupied(slot) {
                unsafe { self.entries_ptr().add(slot).read().assume_init_drop() };
            }
        }
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

// Safety: BoxedStorage owns its values
unsafe impl<T: Send, K: Key + Send> Send for BoxedStorage<T, K> {}

// =============================================================================
// slab::Slab
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;
    type Error = core::convert::Infallible;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Self::Error> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        unsafe { slab::Slab::get_unchecked(self, key) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { slab::Slab::get_unchecked_mut(self, key) }
    }
}

#[inline]
const fn bitmap_words(capacity: usize) -> usize {
    capacity.div_ceil(64)
}
