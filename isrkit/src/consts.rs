use fugit::HertzU32;

/// Slots in the process-wide queue behind [`crate::global::queue`].
pub const GLOBAL_QUEUE_CAPACITY: usize = 32;

/// Limit applied by [`crate::fifo::Fifo::new`].
pub const DEFAULT_FIFO_LIMIT: usize = 256;

pub const DEFAULT_BLINK_FREQ: HertzU32 = HertzU32::from_raw(1);
