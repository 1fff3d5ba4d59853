//! Key trait for node slots.
//!
//! Chain links are slot keys rather than pointers. A link holding
//! [`Key::NONE`] terminates the chain.

/// Index type addressing a node slot in storage.
///
/// Provides the `NONE` sentinel used for empty links and conversion
/// to/from `usize` for slab indexing.
///
/// # Example
///
/// ```
/// use nexus_chain::Key;
///
/// let key: u32 = 7;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::from_usize(7), key);
/// ```
pub trait Key: Copy + Eq + 'static {
    /// Sentinel for "no node". Terminates a chain.
    const NONE: Self;

    /// Creates a key from a slot index.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot index.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this addresses a node.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Converts the sentinel to `None`.
    #[inline]
    fn to_option(self) -> Option<Self> {
        if self.is_none() { None } else { Some(self) }
    }
}

macro_rules! impl_key {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as $ty
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key!(u16, u32, usize);
