//! Queue node: an owned text value and a forward link.

use std::collections::TryReserveError;

use crate::Key;

/// A node in the chain.
///
/// Holds its own copy of the inserted text and the key of the next node, or
/// `K::NONE` if it is the last one. Users only see nodes through the
/// queue's accessors; the link is an implementation detail.
#[derive(Debug)]
pub struct Node<K: Key = u32> {
    pub(crate) value: String,
    pub(crate) next: K,
}

impl<K: Key> Node<K> {
    /// Creates an unlinked node holding a copy of `text`.
    ///
    /// Empty text does not allocate. Fails if the copy cannot be allocated.
    pub(crate) fn try_new(text: &str) -> Result<Self, TryReserveError> {
        let mut value = String::new();
        if !text.is_empty() {
            value.try_reserve_exact(text.len())?;
            value.push_str(text);
        }
        Ok(Self {
            value,
            next: K::NONE,
        })
    }

    /// Returns the node's text.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the node, returning its text.
    #[inline]
    pub(crate) fn into_value(self) -> String {
        self.value
    }
}
