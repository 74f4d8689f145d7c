//! Operations on a possibly-absent queue.
//!
//! Each function takes the queue as an `Option` and flattens failure to
//! `false`, `0`, or `None`, so callers that track "no queue" as a state can
//! drive the queue without matching on [`QueueError`](crate::QueueError).
//! Absent text is stored the same as empty text.
//!
//! ```
//! use nexus_chain::handle;
//!
//! let mut queue = handle::create();
//! assert!(handle::insert_tail(queue.as_mut(), Some("b")));
//! assert!(handle::insert_head(queue.as_mut(), Some("a")));
//! assert_eq!(handle::size(queue.as_ref()), 2);
//!
//! let mut buf = [0u8; 8];
//! assert!(handle::remove_head(queue.as_mut(), Some(&mut buf)));
//! assert_eq!(&buf[..2], b"a\0");
//!
//! handle::destroy(queue);
//!
//! // Absent queue: every operation fails softly
//! assert!(!handle::insert_head(None, Some("x")));
//! assert_eq!(handle::size(None), 0);
//! ```

use crate::Queue;

/// Creates an empty queue, or `None` if it cannot be allocated.
pub fn create() -> Option<Queue> {
    Queue::try_with_capacity(0).ok()
}

/// Releases the queue and every node still in it. Accepts `None`.
pub fn destroy(queue: Option<Queue>) {
    if let Some(mut queue) = queue {
        queue.clear();
    }
}

/// Inserts a copy of `text` at the head. Returns `false` if the queue is
/// absent or the node cannot be allocated.
pub fn insert_head(queue: Option<&mut Queue>, text: Option<&str>) -> bool {
    queue.is_some_and(|queue| queue.try_push_front(text.unwrap_or_default()).is_ok())
}

/// Inserts a copy of `text` at the tail. Returns `false` if the queue is
/// absent or the node cannot be allocated.
pub fn insert_tail(queue: Option<&mut Queue>, text: Option<&str>) -> bool {
    queue.is_some_and(|queue| queue.try_push_back(text.unwrap_or_default()).is_ok())
}

/// Removes the head element, copying its text into `out` as a
/// zero-terminated byte string of at most `out.len() - 1` bytes.
///
/// Returns `false` if the queue is absent or empty, in which case `out` is
/// not written.
pub fn remove_head(queue: Option<&mut Queue>, out: Option<&mut [u8]>) -> bool {
    queue.is_some_and(|queue| queue.remove_head(out).is_ok())
}

/// Returns the number of elements, or 0 for an absent queue.
pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::len)
}

/// Reverses the queue in place. No-op for an absent queue.
pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// Sorts the queue ascending, stably. No-op for an absent queue.
pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}
