//! Cooperative cancellation shared between a caller and long-running training.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::NnError;

/// A cloneable cancellation flag.
///
/// Training polls the token only between units of work (window candidates,
/// constituent groups), never inside a distance computation, so a cancelled
/// operation leaves no half-built state behind.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Return true if cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fail with [`NnError::Cancelled`] if cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::Cancelled`] once [`cancel`][Self::cancel] has been called.
    pub fn check(&self) -> Result<(), NnError> {
        if self.is_cancelled() {
            return Err(NnError::Cancelled);
        }
        Ok(())
    }
}
