use core::fmt::{Display, Formatter};

/// Reasons a deferred callback could not be accepted.
///
/// Both variants mean the work was not queued; the caller decides whether
/// to drop it, run it inline or try again later.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeferError {
    /// A fixed-capacity store has no free slot.
    QueueFull,
    /// The heap could not grow to hold another item.
    AllocationFailed,
}

impl Display for DeferError {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match self {
            DeferError::QueueFull => write!(f, "The deferred queue is full"),
            DeferError::AllocationFailed => write!(f, "Allocation for a deferred item failed"),
        }
    }
}
