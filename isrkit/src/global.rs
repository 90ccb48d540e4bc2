//! The process-wide queue and the shortcut macros that act on it.
//!
//! The queue is a `static` built by a `const fn`, so it exists before
//! `main` runs and no interrupt can observe it half-initialized. Code that
//! wants its own capacity or a heap store should declare its own static
//! and pass `&'static` references around instead.

use crate::consts::GLOBAL_QUEUE_CAPACITY;
use crate::defer_queue::{DeferQueue, InlineDeferQueue};

pub type GlobalQueue = InlineDeferQueue<GLOBAL_QUEUE_CAPACITY>;

static GLOBAL_QUEUE: GlobalQueue = DeferQueue::new();

pub fn queue() -> &'static GlobalQueue {
    &GLOBAL_QUEUE
}

/// Queues a plain function on the global queue. Evaluates to
/// `Result<(), DeferError>`.
///
/// ```ignore
/// let _ = isrkit::run_later!(|| defmt::info!("runs in the main loop"));
/// ```
#[macro_export]
macro_rules! run_later {
    ($func:expr) => {
        $crate::global::queue().run_later($func)
    };
}

/// Runs everything pending on the global queue.
#[macro_export]
macro_rules! run_all {
    () => {
        $crate::global::queue().drain_all()
    };
}

/// Runs at most `n` callbacks from the global queue.
#[macro_export]
macro_rules! run_n {
    ($n:expr) => {
        $crate::global::queue().drain_up_to($n)
    };
}

#[macro_export]
macro_rules! run_one {
    () => {
        $crate::global::queue().drain_one()
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::DeferError;

    static RUNS: AtomicUsize = AtomicUsize::new(0);

    fn count_run() {
        RUNS.fetch_add(1, Ordering::SeqCst);
    }

    // The global queue is shared by the whole test binary, so every check
    // against it lives in this one test.
    #[test]
    fn test_global_shortcuts() {
        assert_eq!(queue().capacity(), Some(GLOBAL_QUEUE_CAPACITY));
        assert!(core::ptr::eq(queue(), queue()));

        for _ in 0..5 {
            crate::run_later!(count_run).unwrap();
        }
        assert_eq!(queue().pending_count(), 5);

        assert!(crate::run_one!());
        assert_eq!(RUNS.load(Ordering::SeqCst), 1);
        assert_eq!(crate::run_n!(2), 2);
        assert_eq!(RUNS.load(Ordering::SeqCst), 3);
        assert_eq!(crate::run_all!(), 2);
        assert_eq!(RUNS.load(Ordering::SeqCst), 5);
        assert!(!crate::run_one!());

        for _ in 0..GLOBAL_QUEUE_CAPACITY {
            crate::run_later!(count_run).unwrap();
        }
        assert_eq!(crate::run_later!(count_run), Err(DeferError::QueueFull));
        assert_eq!(queue().dropped_count(), 1);
        assert_eq!(crate::run_all!(), GLOBAL_QUEUE_CAPACITY);
    }
}
