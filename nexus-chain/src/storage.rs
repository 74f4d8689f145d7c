//! Slot storage with stable keys.
//!
//! Nodes of a [`Queue`](crate::Queue) live in a [`Storage`] and refer to
//! each other by key. A key stays valid until its node is removed, so
//! relinking nodes (reverse, merge sort) only ever rewrites keys and never
//! moves or copies the nodes themselves.

use core::mem;

use log::trace;

use crate::{Key, QueueError};

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - [`Arena<T>`] - growable, fallible growth (in this crate)
/// - `slab::Slab<T>` - growable, aborts on allocation failure (feature `slab`)
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Error type for failed insertions.
    ///
    /// - [`QueueError`] for [`Arena`]
    /// - `Infallible` for storage that cannot report allocation failure
    type Error;

    /// Inserts a value, returning its stable key.
    ///
    /// On error the value is dropped and the storage is unchanged.
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
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserves room for at least `additional` more values.
    fn try_reserve(&mut self, additional: usize) -> Result<(), Self::Error>;
}

// =============================================================================
// Arena - growable vector of slots with an intrusive free list
// =============================================================================

#[derive(Debug)]
enum Slot<T, K> {
    Occupied(T),
    Vacant { next_free: K },
}

/// Growable storage with an intrusive free list.
///
/// Vacant slots chain to each other through their own key field, so freeing
/// a slot never allocates. Freed slots are reused most-recently-freed first.
/// Growth goes through [`Vec::try_reserve`], so running out of memory comes
/// back as [`QueueError::Alloc`] instead of aborting.
///
/// # Example
///
/// ```
/// use nexus_chain::{Arena, Storage};
///
/// let mut arena: Arena<&str> = Arena::with_capacity(4);
/// let a = arena.try_insert("a").unwrap();
/// let b = arena.try_insert("b").unwrap();
///
/// assert_eq!(arena.remove(a), Some("a"));
/// assert_eq!(arena.get(b), Some(&"b"));
///
/// // Slot of `a` is reused
/// let c = arena.try_insert("c").unwrap();
/// assert_eq!(c, a);
/// ```
#[derive(Debug)]
pub struct Arena<T, K: Key = u32> {
    slots: Vec<Slot<T, K>>,
    free_head: K,
    len: usize,
}

impl<T, K: Key> Arena<T, K> {
    /// Creates an empty arena without allocating.
    #[inline]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: K::NONE,
            len: 0,
        }
    }

    /// Creates an arena with room for `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails. Use [`Storage::try_reserve`] on an
    /// empty arena to get an error instead.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: K::NONE,
            len: 0,
        }
    }

    /// Returns the number of slots available without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every value and forgets all keys. Capacity is retained.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = K::NONE;
        self.len = 0;
    }
}

impl<T, K: Key> Default for Arena<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> Storage<T> for Arena<T, K> {
    type Key = K;
    type Error = QueueError;

    fn try_insert(&mut self, value: T) -> Result<K, QueueError> {
        if self.free_head.is_some() {
            let key = self.free_head;
            let slot = &mut self.slots[key.as_usize()];
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => unreachable!("free list reached an occupied slot"),
            }
            self.len += 1;
            return Ok(key);
        }

        let pos = self.slots.len();
        if pos >= K::NONE.as_usize() {
            return Err(QueueError::Exhausted(pos));
        }

        if pos == self.slots.capacity() {
            trace!("arena growing past {pos} slots");
        }
        self.slots.try_reserve(1)?;
        self.slots.push(Slot::Occupied(value));
        self.len += 1;
        Ok(K::from_usize(pos))
    }

    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.as_usize())?;
        match mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        ) {
            Slot::Occupied(value) => {
                self.free_head = key;
                self.len -= 1;
                Some(value)
            }
            vacant => {
                *slot = vacant;
                None
            }
        }
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        // Safety: caller guarantees `key` is in bounds and occupied
        match unsafe { self.slots.get_unchecked(key.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant { .. } => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        // Safety: caller guarantees `key` is in bounds and occupied
        match unsafe { self.slots.get_unchecked_mut(key.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant { .. } => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn try_reserve(&mut self, additional: usize) -> Result<(), QueueError> {
        self.slots.try_reserve(additional)?;
        Ok(())
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
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
        unsafe { slab::Slab::get(self, key).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { slab::Slab::get_mut(self, key).unwrap_unchecked() }
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    fn try_reserve(&mut self, additional: usize) -> Result<(), Self::Error> {
        self.reserve(additional);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let arena: Arena<u64> = Arena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.capacity(), 0);
    }

    #[test]
    fn insert_get_remove() {
        let mut arena: Arena<u64> = Arena::with_capacity(4);

        let a = arena.try_insert(10).unwrap();
        let b = arena.try_insert(20).unwrap();
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&10));
        assert_eq!(arena.get(b), Some(&20));

        *arena.get_mut(a).unwrap() = 11;
        assert_eq!(arena.remove(a), Some(11));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn double_remove_returns_none() {
        let mut arena: Arena<u64> = Arena::new();
        let a = arena.try_insert(1).unwrap();

        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.len(), 0);

        // free list still intact after the rejected remove
        let b = arena.try_insert(2).unwrap();
        assert_eq!(b, a);
        let c = arena.try_insert(3).unwrap();
        assert_ne!(c, a);
    }

    #[test]
    fn out_of_bounds_is_none() {
        let mut arena: Arena<u64> = Arena::new();
        assert_eq!(arena.get(5), None);
        assert_eq!(arena.get_mut(5), None);
        assert_eq!(arena.remove(5), None);
    }

    #[test]
    fn slots_reused_lifo() {
        let mut arena: Arena<u64> = Arena::new();
        let keys: Vec<u32> = (0..4).map(|i| arena.try_insert(i).unwrap()).collect();

        arena.remove(keys[1]);
        arena.remove(keys[3]);

        assert_eq!(arena.try_insert(30).unwrap(), keys[3]);
        assert_eq!(arena.try_insert(10).unwrap(), keys[1]);
        assert_eq!(arena.try_insert(40).unwrap(), 4);
    }

    #[test]
    fn key_space_exhausted() {
        let mut arena: Arena<u8, u16> = Arena::new();
        for i in 0..u16::MAX as usize {
            arena.try_insert(i as u8).unwrap();
        }

        let err = arena.try_insert(0).unwrap_err();
        assert_eq!(err, QueueError::Exhausted(u16::MAX as usize));
        assert_eq!(arena.len(), u16::MAX as usize);

        // a freed slot is usable again
        arena.remove(17);
        assert_eq!(arena.try_insert(1).unwrap(), 17);
    }

    #[test]
    fn reserve_too_much_fails() {
        let mut arena: Arena<u64> = Arena::new();
        let err = arena.try_reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, QueueError::Alloc(_)));
        assert!(arena.is_empty());
    }

    #[test]
    fn clear_resets() {
        let mut arena: Arena<String> = Arena::new();
        arena.try_insert("a".into()).unwrap();
        let b = arena.try_insert("b".into()).unwrap();
        arena.remove(b);

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.try_insert("c".into()).unwrap(), 0);
    }

    #[test]
    fn drops_values() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        {
            let mut arena: Arena<Rc<()>> = Arena::new();
            let a = arena.try_insert(Rc::clone(&tracker)).unwrap();
            arena.try_insert(Rc::clone(&tracker)).unwrap();
            assert_eq!(Rc::strong_count(&tracker), 3);

            drop(arena.remove(a));
            assert_eq!(Rc::strong_count(&tracker), 2);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }
}
