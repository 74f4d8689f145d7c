//! Node keys with a sentinel "none" value.
//!
//! Links between nodes are storage keys rather than pointers. A reserved
//! sentinel (`MAX` for the integer types) stands in for "no next node",
//! which keeps a link the same size as the key itself instead of paying for
//! an `Option` discriminant in every node.

/// Key type used to address nodes in [`Storage`](crate::Storage).
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
pub trait Key: Copy + Eq + core::fmt::Debug {
    /// Sentinel value meaning "no node".
    ///
    /// Never handed out by storage; the number of live nodes is therefore
    /// bounded by `NONE.as_usize()`.
    const NONE: Self;

    /// Creates a key from a slot position.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot position this key addresses.
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
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_key_sentinel {
        ($($ty:ty => $name:ident),*) => {
            $(
                #[test]
                fn $name() {
                    assert!(<$ty>::NONE.is_none());
                    assert!(!<$ty>::NONE.is_some());
                    assert!((0 as $ty).is_some());
                    assert!((<$ty>::MAX - 1).is_some());
                }
            )*
        };
    }

    test_key_sentinel!(
        u16 => u16_sentinel,
        u32 => u32_sentinel,
        u64 => u64_sentinel,
        usize => usize_sentinel
    );

    #[test]
    fn slot_positions_survive_conversion() {
        for i in [0usize, 1, 255, 4096, u16::MAX as usize - 1] {
            assert_eq!(u32::from_usize(i).as_usize(), i);
            assert_eq!(u16::from_usize(i).as_usize(), i);
        }
    }
}
