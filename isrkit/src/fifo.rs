//! FIFO stores for pending work.
//!
//! [`heapless::Deque`] is the fixed-capacity store and never allocates.
//! [`Fifo`] is a singly linked list on the heap, bounded by a runtime limit.
//!
//! Inserting is split in two steps so a store can be locked only for the
//! cheap one: [`FifoInterface::make_slot`] does whatever allocation the
//! store needs, then [`FifoInterface::push_slot`] links the result in O(1)
//! without touching the allocator.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "alloc")]
use core::{alloc::Layout, marker::PhantomData, ptr};

#[cfg(feature = "alloc")]
use crate::consts::DEFAULT_FIFO_LIMIT;
use crate::error::DeferError;

/// An item a store refused, handed back with the reason.
#[derive(Debug)]
pub struct Rejected<T> {
    pub reason: DeferError,
    pub item: T,
}

impl<T> Rejected<T> {
    pub fn new(reason: DeferError, item: T) -> Self {
        Rejected { reason, item }
    }

    pub fn into_item(self) -> T {
        self.item
    }
}

/// Insert at tail, remove at head.
pub trait FifoInterface<T> {
    /// An item made ready for insertion.
    type Slot;

    /// Prepares `item` for [`push_slot`](Self::push_slot). May allocate.
    fn make_slot(item: T) -> Result<Self::Slot, Rejected<T>>;

    /// Links a prepared slot at the tail. Constant time, never allocates.
    fn push_slot(&mut self, slot: Self::Slot) -> Result<(), Rejected<Self::Slot>>;

    fn dequeue(&mut self) -> Option<T>;
    fn len(&self) -> usize;

    /// Maximum number of items, `None` when only memory bounds the store.
    fn capacity(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const N: usize> FifoInterface<T> for heapless::Deque<T, N> {
    type Slot = T;

    fn make_slot(item: T) -> Result<T, Rejected<T>> {
        Ok(item)
    }

    fn push_slot(&mut self, item: T) -> Result<(), Rejected<T>> {
        self.push_back(item).map_err(|item| Rejected::new(DeferError::QueueFull, item))
    }

    fn dequeue(&mut self) -> Option<T> {
        self.pop_front()
    }

    fn len(&self) -> usize {
        heapless::Deque::len(self)
    }

    fn capacity(&self) -> Option<usize> {
        Some(N)
    }
}

#[cfg(feature = "alloc")]
struct Node<T> {
    item: T,
    next: *mut Node<T>,
}

/// One item in its own heap node, waiting to be linked into a [`Fifo`].
#[cfg(feature = "alloc")]
pub struct FifoSlot<T>(Box<Node<T>>);

#[cfg(feature = "alloc")]
unsafe impl<T: Send> Send for FifoSlot<T> {}

#[cfg(feature = "alloc")]
impl<T> FifoSlot<T> {
    /// Allocates the node. An exhausted heap is reported as
    /// `AllocationFailed` and the item comes back.
    pub fn new(item: T) -> Result<Self, Rejected<T>> {
        try_box(Node { item, next: ptr::null_mut() })
            .map(FifoSlot)
            .map_err(|node| Rejected::new(DeferError::AllocationFailed, node.item))
    }

    pub fn into_item(self) -> T {
        self.0.item
    }
}

/// `Box::new` that hands the value back instead of aborting when the
/// allocator returns null.
#[cfg(feature = "alloc")]
fn try_box<T>(value: T) -> Result<Box<T>, T> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }
    // SAFETY: `layout` has a non-zero size.
    let raw = unsafe { alloc::alloc::alloc(layout) }.cast::<T>();
    if raw.is_null() {
        return Err(value);
    }
    // SAFETY: `raw` is a fresh global allocation with the layout of `T`.
    unsafe {
        raw.write(value);
        Ok(Box::from_raw(raw))
    }
}

/// Heap-backed queue with an adjustable limit on its length.
///
/// Every item lives in its own node, so appending never moves the items
/// already queued.
#[cfg(feature = "alloc")]
pub struct Fifo<T> {
    head: *mut Node<T>,
    tail: *mut Node<T>,
    len: usize,
    limit: Option<usize>,
    _owns: PhantomData<Box<Node<T>>>,
}

#[cfg(feature = "alloc")]
unsafe impl<T: Send> Send for Fifo<T> {}
#[cfg(feature = "alloc")]
unsafe impl<T: Sync> Sync for Fifo<T> {}

#[cfg(feature = "alloc")]
impl<T> Fifo<T> {
    /// A queue holding at most [`DEFAULT_FIFO_LIMIT`] items.
    pub const fn new() -> Self {
        Self::with_limit(DEFAULT_FIFO_LIMIT)
    }

    pub const fn with_limit(limit: usize) -> Self {
        Self::from_limit(Some(limit))
    }

    pub const fn unbounded() -> Self {
        Self::from_limit(None)
    }

    const fn from_limit(limit: Option<usize>) -> Self {
        Fifo {
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
            len: 0,
            limit,
            _owns: PhantomData,
        }
    }

    /// Appends `item`. Fails with `QueueFull` once the limit is reached and
    /// with `AllocationFailed` when the heap is exhausted; either way the
    /// item comes back to the caller.
    pub fn enqueue(&mut self, item: T) -> Result<(), Rejected<T>> {
        if !self.has_space() {
            return Err(Rejected::new(DeferError::QueueFull, item));
        }
        let slot = FifoSlot::new(item)?;
        self.push_slot(slot).map_err(|rejected| Rejected::new(rejected.reason, rejected.item.into_item()))
    }

    /// Links an allocated node at the tail.
    pub fn push_slot(&mut self, slot: FifoSlot<T>) -> Result<(), Rejected<FifoSlot<T>>> {
        if !self.has_space() {
            return Err(Rejected::new(DeferError::QueueFull, slot));
        }
        let node = Box::into_raw(slot.0);
        if self.tail.is_null() {
            self.head = node;
        } else {
            // SAFETY: a non-null `tail` is the last node owned by this queue.
            unsafe { (*self.tail).next = node };
        }
        self.tail = node;
        self.len += 1;
        Ok(())
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.head.is_null() {
            return None;
        }
        // SAFETY: `head` came from `Box::into_raw` in `push_slot` and is
        // unlinked before the box is dropped.
        let node = unsafe { Box::from_raw(self.head) };
        self.head = node.next;
        if self.head.is_null() {
            self.tail = ptr::null_mut();
        }
        self.len -= 1;
        Some(node.item)
    }

    pub fn peek(&self) -> Option<&T> {
        // SAFETY: a non-null `head` points to a node owned by this queue.
        unsafe { self.head.as_ref() }.map(|node| &node.item)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has_space(&self) -> bool {
        match self.limit {
            Some(limit) => self.len < limit,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Changes the limit. Items already queued beyond a lowered limit stay;
    /// only later enqueues are refused.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    pub fn clear(&mut self) {
        while self.dequeue().is_some() {}
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { next: self.head, _queue: PhantomData }
    }
}

#[cfg(feature = "alloc")]
impl<T> Drop for Fifo<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(feature = "alloc")]
impl<T> Default for Fifo<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "alloc")]
pub struct Iter<'a, T> {
    next: *const Node<T>,
    _queue: PhantomData<&'a Fifo<T>>,
}

#[cfg(feature = "alloc")]
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        // SAFETY: the nodes are owned by a queue borrowed for `'a`.
        let node = unsafe { self.next.as_ref() }?;
        self.next = node.next;
        Some(&node.item)
    }
}

#[cfg(feature = "alloc")]
impl<T> FifoInterface<T> for Fifo<T> {
    type Slot = FifoSlot<T>;

    fn make_slot(item: T) -> Result<FifoSlot<T>, Rejected<T>> {
        FifoSlot::new(item)
    }

    fn push_slot(&mut self, slot: FifoSlot<T>) -> Result<(), Rejected<FifoSlot<T>>> {
        Fifo::push_slot(self, slot)
    }

    fn dequeue(&mut self) -> Option<T> {
        Fifo::dequeue(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> Option<usize> {
        self.limit
    }
}
