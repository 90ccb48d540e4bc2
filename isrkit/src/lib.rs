//! Interrupt-to-mainloop support layer.
//!
//! Interrupt handlers hand work off to a [`DeferQueue`] and return quickly;
//! the main loop later drains the queue and runs the work on its own stack.
//!
//! ```ignore
//! static QUEUE: InlineDeferQueue<16> = DeferQueue::new();
//!
//! #[interrupt]
//! fn IO_IRQ_BANK0() {
//!     let _ = QUEUE.run_later(|| defmt::info!("button pressed"));
//! }
//!
//! loop {
//!     QUEUE.drain_up_to(4);
//! }
//! ```
//!
//! Feature flags:
//! - `alloc` (default): boxed closures and the heap-backed [`Fifo`] store.
//! - `defmt`: log through defmt.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod fmt;

pub mod callback;
pub mod consts;
pub mod defer_queue;
pub mod error;
pub mod fifo;
pub mod global;
pub mod i2c_util;
pub mod led;
#[cfg(test)]
mod test_heap;
pub mod vector;

pub use callback::Callback;
pub use defer_queue::{DeferQueue, InlineDeferQueue};
pub use error::DeferError;
pub use fifo::{FifoInterface, Rejected};

#[cfg(feature = "alloc")]
pub use defer_queue::HeapDeferQueue;
#[cfg(feature = "alloc")]
pub use fifo::{Fifo, FifoSlot};
