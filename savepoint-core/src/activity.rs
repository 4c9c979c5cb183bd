//! Shared activity flags with scoped acquisition.
//!
//! The rendering subsystem polls [`ActivityFlag::is_active`] on the render
//! pause flag and skips frames while a bulk mutation is in progress; the UI does
//! the same with the loading flag. Flags count nested holders, so a flag stays
//! raised until the outermost guard is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A reference-counted, shareable on/off flag.
#[derive(Debug, Clone, Default)]
pub struct ActivityFlag {
    holders: Arc<AtomicUsize>,
}

impl ActivityFlag {
    /// Create a lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag until the returned guard is dropped.
    #[must_use = "the flag is lowered again as soon as the guard is dropped"]
    pub fn acquire(&self) -> ActivityGuard {
        self.holders.fetch_add(1, Ordering::AcqRel);
        ActivityGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    /// Whether any guard is currently held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.holders.load(Ordering::Acquire) > 0
    }
}

/// Keeps an [`ActivityFlag`] raised while alive.
#[derive(Debug)]
pub struct ActivityGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::AcqRel);
    }
}
