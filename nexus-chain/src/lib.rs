//! Singly-linked text queue with in-place reverse and stable merge sort.
//!
//! Nodes live in index-keyed slot storage owned by the queue and link to
//! each other by key instead of by pointer:
//!
//! ```text
//! Storage (Arena)  - owns nodes, hands out stable keys, reuses freed slots
//! Queue            - head/tail keys + length, relinks nodes by key
//! ```
//!
//! Benefits:
//! - **No raw pointers**: reversal and merge sort only rewrite keys
//! - **Stable keys**: a node's key names the same value through reorders
//! - **O(1) push/pop/len**: length is tracked, never counted
//! - **Fallible allocation**: out-of-memory is an error value, not an abort
//!
//! # Quick Start
//!
//! ```
//! use nexus_chain::Queue;
//!
//! let mut queue = Queue::new();
//! queue.try_push_back("banana").unwrap();
//! queue.try_push_back("apple").unwrap();
//! queue.try_push_back("cherry").unwrap();
//!
//! queue.sort();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["apple", "banana", "cherry"]);
//! assert_eq!(queue.len(), 3);
//!
//! queue.reverse();
//! assert_eq!(queue.front(), Some("cherry"));
//! ```
//!
//! # Stable Sort
//!
//! Keys returned on insertion follow their nodes, so ties can be told apart:
//!
//! ```
//! use nexus_chain::Queue;
//!
//! let mut queue = Queue::new();
//! let first = queue.try_push_back("same").unwrap();
//! queue.try_push_back("earlier").unwrap();
//! let second = queue.try_push_back("same").unwrap();
//!
//! queue.sort();
//! let keys: Vec<_> = queue.keys().collect();
//! assert_eq!(&keys[1..], [first, second]);
//! ```
//!
//! # Storage Options
//!
//! | Storage | Growth | Allocation failure | Key |
//! |---------|--------|--------------------|-----|
//! | [`Arena`] | Growable | `Err(QueueError::Alloc)` | `u16`/`u32`/`u64`/`usize` |
//! | `slab::Slab` | Growable | Aborts | `usize` |
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`
//!
//! # Logging
//!
//! Uses the [`log`] facade: `warn` when an insertion fails, `debug` for
//! O(n) operations, `trace` for arena growth. No logger is installed.

#![warn(missing_docs)]

mod chain;
pub mod error;
pub mod handle;
pub mod key;
pub mod node;
pub mod queue;
pub mod storage;

pub use error::{QueueError, Result};
pub use key::Key;
pub use node::Node;
pub use queue::{ArenaQueueStorage, Iter, Keys, Queue};
pub use storage::{Arena, Storage};

#[cfg(feature = "slab")]
pub use queue::{SlabQueue, SlabQueueStorage};
