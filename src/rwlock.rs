//! Reader-writer lock discipline
//!
//! The accessor guards its store with a single `parking_lot` reader-writer lock
//! that allows multiple concurrent readers or a single writer. This module adds
//! the acquisition policy on top of it: optional bounded waits and cooperative
//! interruption through an [`Interrupt`] flag.
//!
//! # Policy
//!
//! - A fresh shared acquisition parks behind a queued writer, so a writer only
//!   waits for the reads already in flight and a steady stream of new readers
//!   cannot lock it out.
//! - Shared acquisition is reentrant per thread: each thread counts the read
//!   guards it holds on each lock, and a thread that already holds one takes
//!   the recursive read path, which does not park behind a queued writer.
//! - Exclusive acquisition is not reentrant. Taking a write guard while holding
//!   any guard on the same lock deadlocks.
//! - Among waiters, ordering is whatever `parking_lot` provides: eventual
//!   fairness, with no strict FIFO ordering among waiting writers.
//! - An interruptible wait leaves the queue between slices so it can check its
//!   flag. Each missed slice doubles the next one, up to
//!   [`MAX_SLICE_GROWTH`] poll intervals, so a writer eventually outlasts
//!   reads that each run longer than one poll interval.
//! - No poisoning: a panic while holding a guard releases the lock.
//!
//! # Examples
//!
//! ```
//! use user_rwlock_service::rwlock::{acquire_read, acquire_write, RwLock, WaitPolicy};
//! use std::time::Duration;
//!
//! let lock = RwLock::new(5);
//! let policy = WaitPolicy::bounded(Duration::from_millis(50));
//!
//! {
//!     let r1 = acquire_read(&lock, &policy, None).unwrap();
//!     let r2 = acquire_read(&lock, &policy, None).unwrap();
//!     assert_eq!(*r1 + *r2, 10);
//!     // Writers time out while readers are active.
//!     assert!(acquire_write(&lock, &policy, None).is_err());
//! }
//!
//! *acquire_write(&lock, &policy, None).unwrap() += 1;
//! assert_eq!(*lock.read(), 6);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::time::{Duration, Instant};

pub use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::{AccessError, Interrupt};

/// Default slice between interrupt checks while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Largest interrupt-check slice, as a multiple of the poll interval.
pub const MAX_SLICE_GROWTH: u32 = 16;

/// How long, and how attentively, a caller waits for the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Upper bound on the wait; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// First slice between interrupt checks; later slices grow up to
    /// [`MAX_SLICE_GROWTH`] times this.
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitPolicy {
    /// Wait at most `timeout` for the lock.
    pub const fn bounded(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the interrupt polling slice.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

thread_local! {
    /// Read guards held by this thread, keyed by lock address.
    static READ_HOLDS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
}

fn lock_key<T>(lock: &RwLock<T>) -> usize {
    std::ptr::from_ref(lock).cast::<()>() as usize
}

fn held_reads(key: usize) -> usize {
    READ_HOLDS.with(|holds| holds.borrow().get(&key).copied().unwrap_or(0))
}

fn record_read(key: usize) {
    READ_HOLDS.with(|holds| *holds.borrow_mut().entry(key).or_insert(0) += 1);
}

fn release_read(key: usize) {
    READ_HOLDS.with(|holds| {
        let mut holds = holds.borrow_mut();
        if let Some(count) = holds.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                holds.remove(&key);
            }
        }
    });
}

/// Shared guard that keeps this thread's per-lock read count current.
///
/// Like the underlying `parking_lot` guard it is not `Send`, so it is always
/// released on the thread that counted it.
#[derive(Debug)]
pub struct ReadGuard<'a, T> {
    guard: RwLockReadGuard<'a, T>,
    key: usize,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        release_read(self.key);
    }
}

/// Acquire `lock` in shared mode under `policy`.
///
/// A thread's first read guard on `lock` waits behind any queued writer;
/// further guards taken while it still holds one are granted recursively.
/// Returns [`AccessError::Interrupted`] if `interrupt` is raised before the
/// guard is granted and [`AccessError::Timeout`] once the bound elapses.
pub fn acquire_read<'a, T>(
    lock: &'a RwLock<T>,
    policy: &WaitPolicy,
    interrupt: Option<&Interrupt>,
) -> Result<ReadGuard<'a, T>, AccessError> {
    let key = lock_key(lock);
    let guard = if held_reads(key) > 0 {
        acquire(
            policy,
            interrupt,
            |slice| lock.try_read_recursive_for(slice),
            || lock.read_recursive(),
        )?
    } else {
        acquire(
            policy,
            interrupt,
            |slice| lock.try_read_for(slice),
            || lock.read(),
        )?
    };
    record_read(key);
    Ok(ReadGuard { guard, key })
}

/// Number of read guards the current thread holds on `lock`.
pub fn held_read_guards<T>(lock: &RwLock<T>) -> usize {
    held_reads(lock_key(lock))
}

/// Acquire `lock` in exclusive mode under `policy`.
///
/// Same failure modes as [`acquire_read`].
pub fn acquire_write<'a, T>(
    lock: &'a RwLock<T>,
    policy: &WaitPolicy,
    interrupt: Option<&Interrupt>,
) -> Result<RwLockWriteGuard<'a, T>, AccessError> {
    acquire(
        policy,
        interrupt,
        |slice| lock.try_write_for(slice),
        || lock.write(),
    )
}

fn acquire<G>(
    policy: &WaitPolicy,
    interrupt: Option<&Interrupt>,
    mut try_for: impl FnMut(Duration) -> Option<G>,
    block: impl FnOnce() -> G,
) -> Result<G, AccessError> {
    if interrupt.is_none() && policy.timeout.is_none() {
        return Ok(block());
    }

    let start = Instant::now();
    let max_slice = policy.poll_interval.saturating_mul(MAX_SLICE_GROWTH);
    let mut poll = policy.poll_interval;
    loop {
        if interrupt.is_some_and(Interrupt::is_interrupted) {
            return Err(AccessError::Interrupted);
        }

        let slice = match policy.timeout {
            Some(timeout) => {
                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    return Err(AccessError::Timeout(timeout));
                }
                let remaining = timeout - elapsed;
                if interrupt.is_some() {
                    remaining.min(poll)
                } else {
                    remaining
                }
            }
            None => poll,
        };

        if let Some(guard) = try_for(slice) {
            return Ok(guard);
        }
        poll = poll.saturating_mul(2).min(max_slice);
    }
}
