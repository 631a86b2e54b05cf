//! Blocking latch
//!
//! A single-slot cell bridging one asynchronous, callback-delivered
//! result to one synchronous waiter. This deliberately blocks the
//! calling thread: confine it to bootstrap sequencing and tests, and
//! never wait on it from the execution context that will deliver its
//! own completion.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;

/// The latch deadline elapsed before any completion arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Timed out waiting for completion")]
pub struct WaitTimeout;

#[derive(Debug)]
struct Inner<T> {
    slot: Mutex<Slot<T>>,
    completed: Condvar,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    done: bool,
}

/// A single-producer, single-consumer synchronization cell.
///
/// Exactly one [`Latch::complete`] call is permitted per latch; a
/// second call is a programming error and panics. Waiting after
/// completion returns the stored value immediately.
#[derive(Debug)]
pub struct Latch<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Latch<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Latch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Latch<T> {
    /// Creates an empty latch.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot {
                    value: None,
                    done: false,
                }),
                completed: Condvar::new(),
            }),
        }
    }

    /// Stores the result and wakes the waiter.
    ///
    /// Panics if the latch was already completed: double completion is
    /// a defect in the calling code, not a runtime condition.
    pub fn complete(&self, value: T) {
        let mut slot = self.inner.slot.lock().unwrap();
        assert!(!slot.done, "latch completed twice");
        slot.value = Some(value);
        slot.done = true;
        self.inner.completed.notify_all();
    }
}

impl<T: Clone> Latch<T> {
    /// Blocks until a result is stored or the timeout elapses.
    ///
    /// Returns the stored value (a clone, so waiting again after
    /// completion also succeeds) or [`WaitTimeout`] when the deadline
    /// passes first.
    pub fn wait(&self, timeout: Duration) -> Result<T, WaitTimeout> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.inner.slot.lock().unwrap();
        while !slot.done {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(WaitTimeout);
            }
            let (guard, result) = self
                .inner
                .completed
                .wait_timeout(slot, remaining)
                .unwrap();
            slot = guard;
            if result.timed_out() && !slot.done {
                return Err(WaitTimeout);
            }
        }
        Ok(slot.value.as_ref().expect("completed latch holds a value").clone())
    }

    /// Adapts a one-shot callback-style operation into a synchronous
    /// call: hands a latch clone to `start`, which must arrange for
    /// exactly one eventual `complete`, then waits.
    pub fn wait_for<F>(start: F, timeout: Duration) -> Result<T, WaitTimeout>
    where
        F: FnOnce(Latch<T>),
    {
        let latch = Latch::new();
        start(latch.clone());
        latch.wait(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wait_returns_completed_value() {
        let latch = Latch::new();
        let producer = latch.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            producer.complete(42i32);
        });
        assert_eq!(latch.wait(Duration::from_secs(2)), Ok(42));
    }

    #[test]
    fn test_wait_after_completion_is_immediate() {
        let latch = Latch::new();
        latch.complete("done".to_string());

        let started = Instant::now();
        assert_eq!(latch.wait(Duration::from_secs(5)).unwrap(), "done");
        assert!(started.elapsed() < Duration::from_millis(100));

        // A second wait still observes the stored value
        assert_eq!(latch.wait(Duration::from_secs(5)).unwrap(), "done");
    }

    #[test]
    fn test_timeout_is_bounded() {
        let latch: Latch<i32> = Latch::new();
        let started = Instant::now();
        assert_eq!(latch.wait(Duration::from_millis(50)), Err(WaitTimeout));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    #[should_panic(expected = "latch completed twice")]
    fn test_double_complete_panics() {
        let latch = Latch::new();
        latch.complete(1i32);
        latch.complete(2i32);
    }

    #[test]
    fn test_wait_for_adapts_callback_operations() {
        let result = Latch::wait_for(
            |latch| {
                thread::spawn(move || latch.complete(Ok::<i32, String>(7)));
            },
            Duration::from_secs(2),
        );
        assert_eq!(result.unwrap(), Ok(7));
    }
}
