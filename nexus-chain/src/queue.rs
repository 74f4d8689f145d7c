//! Singly-linked text queue over slot storage.
//!
//! The queue tracks head, tail, and length. Nodes live in a [`Storage`]
//! owned by the queue and link forward by key, so reversal and sorting
//! relink nodes in place without moving, copying, or reallocating them.
//!
//! # Example
//!
//! ```
//! use nexus_chain::Queue;
//!
//! let mut queue = Queue::new();
//! queue.try_push_back("banana").unwrap();
//! queue.try_push_back("apple").unwrap();
//! queue.try_push_front("cherry").unwrap();
//!
//! queue.sort();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["apple", "banana", "cherry"]);
//!
//! queue.reverse();
//! assert_eq!(queue.pop_front().as_deref(), Some("cherry"));
//! assert_eq!(queue.len(), 2);
//! ```
//!
//! # Bounded copy on removal
//!
//! [`Queue::remove_head`] writes the removed value into a caller buffer as a
//! zero-terminated byte string, truncated to fit:
//!
//! ```
//! use nexus_chain::Queue;
//!
//! let mut queue = Queue::new();
//! queue.try_push_back("hello").unwrap();
//!
//! let mut buf = [0xffu8; 4];
//! assert_eq!(queue.remove_head(Some(&mut buf)).unwrap(), 3);
//! assert_eq!(&buf, b"hel\0");
//! assert!(queue.is_empty());
//! ```

use core::fmt;
use core::iter::FusedIterator;
use core::mem;

use log::{debug, warn};

use crate::{Arena, Key, Node, QueueError, Storage, chain};

/// Default queue storage: an [`Arena`] of nodes.
pub type ArenaQueueStorage<K = u32> = Arena<Node<K>, K>;

/// Queue storage backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabQueueStorage = slab::Slab<Node<usize>>;

/// Queue over `slab::Slab` storage.
#[cfg(feature = "slab")]
pub type SlabQueue = Queue<SlabQueueStorage, usize>;

/// A singly-linked queue of owned text values.
///
/// # Type Parameters
///
/// - `S`: Storage type (default [`ArenaQueueStorage`])
/// - `K`: Key type (default `u32`)
///
/// Each inserted value is copied into a node the queue owns. Insertion
/// returns the node's key, which stays valid (and keeps naming the same
/// value) through [`reverse`](Queue::reverse) and [`sort`](Queue::sort)
/// until the node is removed.
///
/// # Example
///
/// ```
/// use nexus_chain::Queue;
///
/// let mut queue = Queue::new();
/// queue.try_push_front("b").unwrap();
/// let a = queue.try_push_front("a").unwrap();
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.front(), Some("a"));
/// assert_eq!(queue.back(), Some("b"));
/// assert_eq!(queue.get(a), Some("a"));
/// ```
pub struct Queue<S = ArenaQueueStorage, K: Key = u32>
where
    S: Storage<Node<K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
}

impl Queue {
    /// Creates an empty queue. Does not allocate.
    pub fn new() -> Self {
        Self::from_storage(Arena::new())
    }

    /// Creates an empty queue with room for `capacity` nodes.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_storage(Arena::with_capacity(capacity))
    }

    /// Creates an empty queue with room for `capacity` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Alloc`] if the allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, QueueError> {
        let mut storage: ArenaQueueStorage = Arena::new();
        storage.try_reserve(capacity)?;
        Ok(Self::from_storage(storage))
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, K: Key> Queue<S, K>
where
    S: Storage<Node<K>, Key = K>,
    QueueError: From<S::Error>,
{
    /// Creates an empty queue over the given storage.
    ///
    /// # Panics
    ///
    /// Panics if `storage` already holds nodes.
    pub fn from_storage(storage: S) -> Self {
        assert!(storage.is_empty(), "queue storage must start empty");
        Self {
            storage,
            head: K::NONE,
            tail: K::NONE,
            len: 0,
        }
    }

    /// Returns the number of elements. O(1).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the backing storage.
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the head node's key, or `None` if empty.
    #[inline]
    pub fn front_key(&self) -> Option<K> {
        if self.head.is_none() {
            None
        } else {
            Some(self.head)
        }
    }

    /// Returns the tail node's key, or `None` if empty.
    #[inline]
    pub fn back_key(&self) -> Option<K> {
        if self.tail.is_none() {
            None
        } else {
            Some(self.tail)
        }
    }

    // ========================================================================
    // Insert operations
    // ========================================================================

    /// Inserts a copy of `text` at the head of the queue.
    ///
    /// Returns the new node's key.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Alloc`] or [`QueueError::Exhausted`] if the
    /// node cannot be created. The queue is unchanged on error.
    pub fn try_push_front(&mut self, text: &str) -> Result<K, QueueError> {
        let key = self.alloc(text)?;

        // Safety: key was just returned by try_insert
        unsafe { self.storage.get_unchecked_mut(key) }.next = self.head;
        if self.tail.is_none() {
            self.tail = key;
        }

        self.head = key;
        self.len += 1;
        Ok(key)
    }

    /// Inserts a copy of `text` at the tail of the queue.
    ///
    /// Returns the new node's key.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Alloc`] or [`QueueError::Exhausted`] if the
    /// node cannot be created. The queue is unchanged on error.
    pub fn try_push_back(&mut self, text: &str) -> Result<K, QueueError> {
        let key = self.alloc(text)?;

        if self.tail.is_some() {
            // Safety: tail is valid when is_some()
            unsafe { self.storage.get_unchecked_mut(self.tail) }.next = key;
        } else {
            self.head = key;
        }

        self.tail = key;
        self.len += 1;
        Ok(key)
    }

    /// Copies `text` into a fresh, unlinked node.
    fn alloc(&mut self, text: &str) -> Result<K, QueueError> {
        let result = Node::try_new(text)
            .map_err(QueueError::Alloc)
            .and_then(|node| self.storage.try_insert(node).map_err(QueueError::from));

        if let Err(err) = &result {
            warn!("insert of {}-byte value failed: {err}", text.len());
        }
        result
    }

    // ========================================================================
    // Remove operations
    // ========================================================================

    /// Removes the head element and returns its text.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn pop_front(&mut self) -> Option<String> {
        self.unlink_head().map(Node::into_value)
    }

    /// Removes the head element, copying its text into `out`.
    ///
    /// When `out` is given and non-empty, at most `out.len() - 1` bytes of
    /// the value are copied followed by a zero byte. Truncation is byte-wise
    /// and may split a multi-byte character. Returns the number of value
    /// bytes copied (0 when `out` is `None` or empty).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to remove; `out` is
    /// left untouched.
    pub fn remove_head(&mut self, out: Option<&mut [u8]>) -> Result<usize, QueueError> {
        let node = self.unlink_head().ok_or(QueueError::Empty)?;
        Ok(out.map_or(0, |buf| copy_terminated(node.value(), buf)))
    }

    fn unlink_head(&mut self) -> Option<Node<K>> {
        if self.head.is_none() {
            return None;
        }

        let node = self.storage.remove(self.head)?;
        self.head = node.next;
        if self.head.is_none() {
            self.tail = K::NONE;
        }

        self.len -= 1;
        Some(node)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        let mut key = self.head;
        while key.is_some() {
            match self.storage.remove(key) {
                Some(node) => key = node.next,
                None => break,
            }
        }

        if self.len > 0 {
            debug!("cleared {} nodes", self.len);
        }
        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the text at the given key, if it names a live node.
    #[inline]
    pub fn get(&self, key: K) -> Option<&str> {
        self.storage.get(key).map(Node::value)
    }

    /// Returns the head element's text.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        if self.head.is_none() {
            None
        } else {
            // Safety: head is valid when is_some()
            Some(unsafe { self.storage.get_unchecked(self.head) }.value())
        }
    }

    /// Returns the tail element's text.
    #[inline]
    pub fn back(&self) -> Option<&str> {
        if self.tail.is_none() {
            None
        } else {
            // Safety: tail is valid when is_some()
            Some(unsafe { self.storage.get_unchecked(self.tail) }.value())
        }
    }

    // ========================================================================
    // Reordering
    // ========================================================================

    /// Reverses the queue in place.
    ///
    /// Only links are rewritten; nodes keep their keys and values.
    pub fn reverse(&mut self) {
        if self.len < 2 {
            return;
        }

        // Safety: head starts the queue's chain
        let new_head = unsafe { chain::reverse(&mut self.storage, self.head) };
        debug_assert!(new_head == self.tail);

        mem::swap(&mut self.head, &mut self.tail);
        debug!("reversed {} nodes", self.len);
    }

    /// Sorts the queue into ascending byte-wise order of values.
    ///
    /// Stable merge sort: equal values keep their relative order. Only
    /// links are rewritten; nodes keep their keys and values.
    pub fn sort(&mut self) {
        if self.len < 2 {
            return;
        }

        // Safety: head starts the queue's chain, and the sorted chain holds
        // the same nodes
        unsafe {
            self.head = chain::merge_sort(&mut self.storage, self.head);
            self.tail = chain::last(&self.storage, self.head);
        }
        debug!("sorted {} nodes", self.len);
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over values, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, S, K> {
        Iter {
            storage: &self.storage,
            current: self.head,
            remaining: self.len,
        }
    }

    /// Returns an iterator over node keys, head to tail.
    #[inline]
    pub fn keys(&self) -> Keys<'_, S, K> {
        Keys {
            storage: &self.storage,
            current: self.head,
            remaining: self.len,
        }
    }
}

/// Copies `src` into `buf` as a zero-terminated byte string.
fn copy_terminated(src: &str, buf: &mut [u8]) -> usize {
    let Some(room) = buf.len().checked_sub(1) else {
        return 0;
    };
    let n = src.len().min(room);
    buf[..n].copy_from_slice(&src.as_bytes()[..n]);
    buf[n] = 0;
    n
}

impl<S, K: Key> fmt::Debug for Queue<S, K>
where
    S: Storage<Node<K>, Key = K>,
    QueueError: From<S::Error>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, S, K: Key> IntoIterator for &'a Queue<S, K>
where
    S: Storage<Node<K>, Key = K>,
    QueueError: From<S::Error>,
{
    type Item = &'a str;
    type IntoIter = Iter<'a, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over queue values.
pub struct Iter<'a, S, K: Key> {
    storage: &'a S,
    current: K,
    remaining: usize,
}

impl<'a, S, K: Key + 'a> Iterator for Iter<'a, S, K>
where
    S: Storage<Node<K>, Key = K>,
{
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        // Safety: current came from list traversal
        let node = unsafe { self.storage.get_unchecked(self.current) };
        self.current = node.next;
        self.remaining -= 1;
        Some(node.value())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, S, K: Key + 'a> ExactSizeIterator for Iter<'a, S, K> where S: Storage<Node<K>, Key = K> {}

impl<'a, S, K: Key + 'a> FusedIterator for Iter<'a, S, K> where S: Storage<Node<K>, Key = K> {}

/// Iterator over queue node keys.
pub struct Keys<'a, S, K: Key> {
    storage: &'a S,
    current: K,
    remaining: usize,
}

impl<'a, S, K: Key> Iterator for Keys<'a, S, K>
where
    S: Storage<Node<K>, Key = K>,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        let key = self.current;
        // Safety: current came from list traversal
        self.current = unsafe { self.storage.get_unchecked(key) }.next;
        self.remaining -= 1;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S, K: Key> ExactSizeIterator for Keys<'_, S, K> where S: Storage<Node<K>, Key = K> {}

impl<S, K: Key> FusedIterator for Keys<'_, S, K> where S: Storage<Node<K>, Key = K> {}
