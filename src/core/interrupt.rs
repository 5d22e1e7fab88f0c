//! Cooperative interruption for callers waiting on the record lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared interrupt flag.
///
/// Clones share one flag: any clone may raise it and every accessor call
/// waiting with that flag gives up with [`AccessError::Interrupted`]. The flag
/// stays raised until [`Interrupt::clear`] is called.
///
/// [`AccessError::Interrupted`]: crate::core::AccessError::Interrupted
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// Create a flag in the lowered state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether the flag is raised.
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Lower the flag so the handle can be reused.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}
