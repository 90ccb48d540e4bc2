//! Deferred execution from interrupt handlers into the main loop.
//!
//! Producers (interrupt handlers, or normal code) [`submit`](DeferQueue::submit)
//! callbacks; the main loop drains them. Every access to the pending store
//! happens inside `critical_section::with`, which is short and never waits,
//! so it is valid from any interrupt priority. Callbacks always run after
//! the critical section has been left.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::callback::Callback;
use crate::error::DeferError;
use crate::fifo::FifoInterface;
#[cfg(feature = "alloc")]
use crate::fifo::Fifo;

/// Queue over a fixed number of inline slots. Never allocates.
pub type InlineDeferQueue<const N: usize> = DeferQueue<heapless::Deque<Callback, N>>;

/// Queue whose slots live on the heap.
#[cfg(feature = "alloc")]
pub type HeapDeferQueue = DeferQueue<Fifo<Callback>>;

struct QueueState<S> {
    pending: S,
    dropped: u32,
}

pub struct DeferQueue<S> {
    state: Mutex<RefCell<QueueState<S>>>,
}

impl<const N: usize> DeferQueue<heapless::Deque<Callback, N>> {
    pub const fn new() -> Self {
        Self::from_store(heapless::Deque::new())
    }
}

impl<const N: usize> Default for DeferQueue<heapless::Deque<Callback, N>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "alloc")]
impl DeferQueue<Fifo<Callback>> {
    /// Grows until the heap runs out.
    pub const fn unbounded() -> Self {
        Self::from_store(Fifo::unbounded())
    }

    pub const fn with_limit(limit: usize) -> Self {
        Self::from_store(Fifo::with_limit(limit))
    }
}

impl<S> DeferQueue<S> {
    pub const fn from_store(store: S) -> Self {
        DeferQueue {
            state: Mutex::new(RefCell::new(QueueState { pending: store, dropped: 0 })),
        }
    }
}

impl<S: FifoInterface<Callback>> DeferQueue<S> {
    /// Queues `callback` to run on the next drain.
    ///
    /// Safe to call from interrupt context. Any allocation the store needs
    /// is made before entering the critical section, which then only links
    /// the prepared slot. On failure the callback is dropped without
    /// running and the dropped counter goes up; what to do about the lost
    /// work is up to the caller.
    pub fn submit(&self, callback: Callback) -> Result<(), DeferError> {
        let slot = match S::make_slot(callback) {
            Ok(slot) => slot,
            Err(rejected) => {
                self.count_dropped();
                warn!("defer_queue::submit() rejected: {}", rejected.reason);
                return Err(rejected.reason);
            }
        };

        let result = critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            let result = state.pending.push_slot(slot);
            if result.is_err() {
                state.dropped = state.dropped.saturating_add(1);
            }
            result
        });

        // The rejected callback is released here, outside the critical section.
        result.map_err(|rejected| {
            warn!("defer_queue::submit() rejected: {}", rejected.reason);
            rejected.reason
        })
    }

    fn count_dropped(&self) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            state.dropped = state.dropped.saturating_add(1);
        });
    }

    /// Shorthand for submitting a plain function.
    pub fn run_later(&self, func: fn()) -> Result<(), DeferError> {
        self.submit(Callback::from_fn(func))
    }

    fn pop(&self) -> Option<Callback> {
        critical_section::with(|cs| self.state.borrow(cs).borrow_mut().pending.dequeue())
    }

    /// Runs pending callbacks in submission order until the queue is seen
    /// empty. Items submitted while draining are picked up in the same call.
    /// Call from the main loop only. Returns the number of callbacks run.
    pub fn drain_all(&self) -> usize {
        let mut executed = 0;
        while let Some(callback) = self.pop() {
            callback.invoke();
            executed += 1;
        }
        if executed > 0 {
            trace!("defer_queue::drain_all() ran {}", executed);
        }
        executed
    }

    /// Like [`drain_all`](Self::drain_all) but runs at most `max` callbacks,
    /// bounding the time spent in one main loop iteration.
    pub fn drain_up_to(&self, max: usize) -> usize {
        let mut executed = 0;
        while executed < max {
            match self.pop() {
                Some(callback) => {
                    callback.invoke();
                    executed += 1;
                }
                None => break,
            }
        }
        executed
    }

    /// Runs the oldest pending callback, if any.
    pub fn drain_one(&self) -> bool {
        self.drain_up_to(1) == 1
    }

    pub fn pending_count(&self) -> usize {
        critical_section::with(|cs| self.state.borrow(cs).borrow().pending.len())
    }

    pub fn is_empty(&self) -> bool {
        self.pending_count() == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        critical_section::with(|cs| self.state.borrow(cs).borrow().pending.capacity())
    }

    /// Number of submits refused since construction, saturating at `u32::MAX`.
    pub fn dropped_count(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).borrow().dropped)
    }

    /// Throws away the callbacks pending at the time of the call without
    /// running them and returns how many were discarded.
    ///
    /// Callbacks are taken out one at a time and dropped after the critical
    /// section is left, since dropping a boxed closure runs arbitrary code.
    pub fn clear(&self) -> usize {
        let pending = self.pending_count();
        let mut discarded = 0;
        while discarded < pending {
            match self.pop() {
                Some(callback) => {
                    drop(callback);
                    discarded += 1;
                }
                None => break,
            }
        }
        if discarded > 0 {
            info!("defer_queue::clear() discarded {} pending callbacks", discarded);
        }
        discarded
    }
}
