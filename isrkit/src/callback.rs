#[cfg(feature = "alloc")]
use alloc::boxed::Box;

/// A deferred unit of work: takes nothing, returns nothing, runs once.
///
/// The plain-function forms never touch the heap and are safe to build
/// inside any interrupt handler. [`Callback::boxed`] captures arbitrary
/// state but allocates, so only use it on targets whose allocator may be
/// entered from interrupt context.
pub struct Callback(Inner);

enum Inner {
    Fn(fn()),
    WithContext(fn(usize), usize),
    #[cfg(feature = "alloc")]
    Boxed(Box<dyn FnOnce() + Send>),
}

impl Callback {
    pub const fn from_fn(func: fn()) -> Self {
        Callback(Inner::Fn(func))
    }

    /// Wraps a function that receives one word of state captured at
    /// construction time, e.g. the pin that fired or a raw sample.
    pub const fn with_context(func: fn(usize), context: usize) -> Self {
        Callback(Inner::WithContext(func, context))
    }

    #[cfg(feature = "alloc")]
    pub fn boxed<F>(func: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Callback(Inner::Boxed(Box::new(func)))
    }

    /// Runs the callback, consuming it.
    pub fn invoke(self) {
        match self.0 {
            Inner::Fn(func) => func(),
            Inner::WithContext(func, context) => func(context),
            #[cfg(feature = "alloc")]
            Inner::Boxed(func) => func(),
        }
    }

    /// True if building this callback needed no heap allocation.
    pub fn is_inline(&self) -> bool {
        match self.0 {
            Inner::Fn(_) | Inner::WithContext(..) => true,
            #[cfg(feature = "alloc")]
            Inner::Boxed(_) => false,
        }
    }
}

impl From<fn()> for Callback {
    fn from(func: fn()) -> Self {
        Callback::from_fn(func)
    }
}

impl core::fmt::Debug for Callback {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Inner::Fn(_) => f.write_str("Callback(fn)"),
            Inner::WithContext(_, context) => write!(f, "Callback(fn, {})", context),
            #[cfg(feature = "alloc")]
            Inner::Boxed(_) => f.write_str("Callback(boxed)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static HITS: AtomicUsize = AtomicUsize::new(0);
    static LAST_CONTEXT: AtomicUsize = AtomicUsize::new(0);

    fn bump() {
        HITS.fetch_add(1, Ordering::SeqCst);
    }

    fn record(context: usize) {
        LAST_CONTEXT.store(context, Ordering::SeqCst);
    }

    #[test]
    fn test_plain_fn() {
        let before = HITS.load(Ordering::SeqCst);
        let cb = Callback::from(bump as fn());
        assert!(cb.is_inline());
        cb.invoke();
        assert_eq!(HITS.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn test_with_context() {
        let cb = Callback::with_context(record, 42);
        assert!(cb.is_inline());
        assert_eq!(format!("{:?}", cb), "Callback(fn, 42)");
        cb.invoke();
        assert_eq!(LAST_CONTEXT.load(Ordering::SeqCst), 42);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_boxed_closure_captures_state() {
        let counter = std::sync::Arc::new(AtomicUsize::new(0));
        let captured = counter.clone();
        let cb = Callback::boxed(move || {
            captured.fetch_add(5, Ordering::SeqCst);
        });
        assert!(!cb.is_inline());
        cb.invoke();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
