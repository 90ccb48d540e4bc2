//! Test-only global allocator that can be told to run out of memory.
//!
//! The switch is per thread, so tests running in parallel keep their heap.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static EXHAUSTED: Cell<bool> = const { Cell::new(false) };
}

struct SwitchableHeap;

unsafe impl GlobalAlloc for SwitchableHeap {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if EXHAUSTED.try_with(Cell::get).unwrap_or(false) {
            return core::ptr::null_mut();
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static HEAP: SwitchableHeap = SwitchableHeap;

struct Restore;

impl Drop for Restore {
    fn drop(&mut self) {
        EXHAUSTED.with(|exhausted| exhausted.set(false));
    }
}

/// Runs `f` with every allocation on this thread failing. Freeing still works.
pub fn without_heap<R>(f: impl FnOnce() -> R) -> R {
    EXHAUSTED.with(|exhausted| exhausted.set(true));
    let _restore = Restore;
    f()
}
