//! Monotonic sequence counter
//!
//! A mutex-guarded, strictly increasing id source used wherever a
//! stable, concurrency-safe sequence number is needed (request ids).

use std::sync::Mutex;

/// A concurrency-safe source of strictly increasing identifiers.
///
/// Returns 1, 2, 3, …; at `i64::MAX` the next call wraps to 1, never 0
/// (0 stays reserved as "uninitialized") and never overflows silently.
/// All mutations serialize through a single mutex; contention waits,
/// it does not retry.
#[derive(Debug, Default)]
pub struct Sequence {
    last: Mutex<i64>,
}

impl Sequence {
    /// Creates a sequence whose first value is 1.
    pub fn new() -> Self {
        Self {
            last: Mutex::new(0),
        }
    }

    /// Returns the next identifier, safe from any thread.
    pub fn increment_and_get(&self) -> i64 {
        let mut last = self.last.lock().unwrap();
        *last = if *last == i64::MAX { 1 } else { *last + 1 };
        *last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_starts_at_one() {
        let seq = Sequence::new();
        assert_eq!(seq.increment_and_get(), 1);
        assert_eq!(seq.increment_and_get(), 2);
        assert_eq!(seq.increment_and_get(), 3);
    }

    #[test]
    fn test_wraps_to_one_at_max() {
        let seq = Sequence {
            last: Mutex::new(i64::MAX - 1),
        };
        assert_eq!(seq.increment_and_get(), i64::MAX);
        assert_eq!(seq.increment_and_get(), 1);
        assert_eq!(seq.increment_and_get(), 2);
    }

    #[test]
    fn test_concurrent_increments_have_no_duplicates_or_gaps() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 500;

        let seq = Arc::new(Sequence::new());
        let mut handles = Vec::new();
        for _ in 0..THREADS {
            let seq = Arc::clone(&seq);
            handles.push(std::thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|_| seq.increment_and_get())
                    .collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }

        let total = (THREADS * PER_THREAD) as i64;
        assert_eq!(seen.len() as i64, total);
        assert_eq!(*seen.iter().min().unwrap(), 1);
        assert_eq!(*seen.iter().max().unwrap(), total);
    }
}
