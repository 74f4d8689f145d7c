//! Error types for queue operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Failure of a queue or storage operation.
///
/// A failed operation never leaves a partial mutation behind: the queue is
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Allocating a node slot or copying the text failed.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// Every non-sentinel key is in use.
    #[error("key space exhausted at {0} nodes")]
    Exhausted(usize),

    /// The queue has no elements to remove.
    #[error("queue is empty")]
    Empty,
}

impl From<core::convert::Infallible> for QueueError {
    fn from(never: core::convert::Infallible) -> Self {
        match never {}
    }
}

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(QueueError::Empty.to_string(), "queue is empty");
        assert_eq!(
            QueueError::Exhausted(65535).to_string(),
            "key space exhausted at 65535 nodes"
        );
    }

    #[test]
    fn reserve_failure_converts() {
        let err = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err: QueueError = err.into();
        assert!(matches!(err, QueueError::Alloc(_)));
        assert!(err.to_string().starts_with("allocation failed"));
    }
}
