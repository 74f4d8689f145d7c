//! In-place relinking of node chains.
//!
//! A chain is a run of nodes in one storage joined by `next` keys and ended
//! by `K::NONE`. Everything here rewrites keys only: no node is allocated,
//! freed, or copied, and every node keeps its storage key.
//!
//! All functions are `unsafe` because they follow `next` keys without
//! checking occupancy. Callers must pass the head of a well-formed chain:
//! every reachable key occupied in `storage`, no cycles.

use crate::{Key, Node, Storage};

/// Reverses a chain, returning the new head (the old last node).
///
/// # Safety
///
/// `head` must be `K::NONE` or start a well-formed chain in `storage`.
pub(crate) unsafe fn reverse<S, K>(storage: &mut S, head: K) -> K
where
    S: Storage<Node<K>, Key = K>,
    K: Key,
{
    let mut prev = K::NONE;
    let mut curr = head;
    while curr.is_some() {
        // Safety: curr is reachable from head
        let node = unsafe { storage.get_unchecked_mut(curr) };
        let next = node.next;
        node.next = prev;
        prev = curr;
        curr = next;
    }
    prev
}

/// Returns the last node of a chain.
///
/// # Safety
///
/// `head` must be `K::NONE` or start a well-formed chain in `storage`.
pub(crate) unsafe fn last<S, K>(storage: &S, head: K) -> K
where
    S: Storage<Node<K>, Key = K>,
    K: Key,
{
    let mut curr = head;
    while curr.is_some() {
        // Safety: curr is reachable from head
        let next = unsafe { storage.get_unchecked(curr) }.next;
        if next.is_none() {
            break;
        }
        curr = next;
    }
    curr
}

/// Sorts a chain by byte-wise value order, returning the new head.
///
/// Merge sort: equal values keep their relative order. Recursion depth is
/// `log2(len)`; merging is iterative.
///
/// # Safety
///
/// `head` must be `K::NONE` or start a well-formed chain in `storage`.
pub(crate) unsafe fn merge_sort<S, K>(storage: &mut S, head: K) -> K
where
    S: Storage<Node<K>, Key = K>,
    K: Key,
{
    // Safety: head is occupied when is_some()
    if head.is_none() || unsafe { storage.get_unchecked(head) }.next.is_none() {
        return head;
    }

    unsafe {
        let second = split(storage, head);
        let left = merge_sort(storage, head);
        let right = merge_sort(storage, second);
        merge(storage, left, right)
    }
}

/// Cuts a chain of two or more nodes at its midpoint, returning the head of
/// the second half. For odd lengths the first half gets the extra node.
///
/// `slow` steps once per round and `fast` twice; when `fast` runs off the
/// end, `slow` is the last node of the first half.
///
/// # Safety
///
/// `head` must start a well-formed chain of at least two nodes.
unsafe fn split<S, K>(storage: &mut S, head: K) -> K
where
    S: Storage<Node<K>, Key = K>,
    K: Key,
{
    let mut slow = head;
    // Safety (all accesses below): slow and fast only ever hold keys
    // reachable from head
    let mut fast = unsafe { storage.get_unchecked(head) }.next;

    while fast.is_some() {
        fast = unsafe { storage.get_unchecked(fast) }.next;
        if fast.is_none() {
            break;
        }
        fast = unsafe { storage.get_unchecked(fast) }.next;
        slow = unsafe { storage.get_unchecked(slow) }.next;
    }

    let mid = unsafe { storage.get_unchecked_mut(slow) };
    let second = mid.next;
    mid.next = K::NONE;
    second
}

/// Merges two sorted chains into one, returning its head.
///
/// On equal values the node from `left` goes first.
///
/// # Safety
///
/// `left` and `right` must each be `K::NONE` or start disjoint well-formed
/// chains in `storage`.
unsafe fn merge<S, K>(storage: &mut S, mut left: K, mut right: K) -> K
where
    S: Storage<Node<K>, Key = K>,
    K: Key,
{
    let mut head = K::NONE;
    let mut tail = K::NONE;

    while left.is_some() && right.is_some() {
        // Safety (all accesses below): keys are fronts of the input chains
        // or already-merged nodes
        let take_left = unsafe {
            storage.get_unchecked(left).value.as_bytes()
                <= storage.get_unchecked(right).value.as_bytes()
        };

        let picked = if take_left {
            let key = left;
            left = unsafe { storage.get_unchecked(key) }.next;
            key
        } else {
            let key = right;
            right = unsafe { storage.get_unchecked(key) }.next;
            key
        };

        if tail.is_some() {
            unsafe { storage.get_unchecked_mut(tail) }.next = picked;
        } else {
            head = picked;
        }
        tail = picked;
    }

    // Splice whatever is left
    let rest = if left.is_some() { left } else { right };
    if tail.is_some() {
        unsafe { storage.get_unchecked_mut(tail) }.next = rest;
    } else {
        head = rest;
    }

    head
}
