//! Cancellation flag shared between a component and its async continuations

use alloc::rc::Rc;
use core::cell::Cell;

/// Cloneable cancellation flag
///
/// Flipped once by the owning component when it begins unmounting. Every
/// pending async continuation checks it after each await before acquiring
/// resources or mutating state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the token cancelled; idempotent
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Check whether the owner has begun unmounting
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_visible_through_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());

        token.cancel();
        assert!(observer.is_cancelled());

        // Idempotent
        token.cancel();
        assert!(token.is_cancelled());
    }
}
