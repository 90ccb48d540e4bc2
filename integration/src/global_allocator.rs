use core::mem::MaybeUninit;

use alloc_cortex_m::CortexMHeap;

// The allocator masks interrupts while it works, so boxing a callback from
// an interrupt handler is allowed on this target.
#[global_allocator]
static ALLOCATOR: CortexMHeap = CortexMHeap::empty();

const HEAP_SIZE: usize = 16 * 1024;

pub fn init_allocator() {
    static mut HEAP: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    unsafe { ALLOCATOR.init(core::ptr::addr_of_mut!(HEAP) as usize, HEAP_SIZE) }
}

pub fn free_bytes() -> usize {
    ALLOCATOR.free()
}
