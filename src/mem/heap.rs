//! Service Memory Arena
//!
//! Uses `linked_list_allocator` over storage the arena owns.
//!
//! # Design
//! - Backing storage is allocated once at construction and freed when
//!   the arena drops
//! - Buffer blocks are carved from it with first-fit allocation
//! - Exhaustion is a `None` result for the caller to report, never
//!   an abort
//!
//! # Security Considerations
//! - A client requesting an absurd size can only exhaust this arena,
//!   not the process it runs in
//! - All blocks handed out must come back through `deallocate` before
//!   the arena drops

use core::alloc::Layout;
use core::ptr::NonNull;

use alloc::boxed::Box;
use alloc::vec;
use linked_list_allocator::Heap;

/// Smallest usable arena. The allocator needs room for its free-list
/// node, so anything under this is rounded up.
const MIN_ARENA: usize = 64;

/// A bounded heap the service carves buffer blocks from.
pub struct ServiceHeap {
    heap: Heap,
    /// Backing storage; its heap allocation is address-stable, so the
    /// allocator's internal pointers survive moves of this struct.
    #[allow(dead_code)]
    storage: Box<[u8]>,
}

impl core::fmt::Debug for ServiceHeap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServiceHeap")
            .field("capacity", &self.storage.len())
            .finish()
    }
}

impl ServiceHeap {
    /// Create an arena with (at least) the given capacity in bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        let mut storage = vec![0u8; bytes.max(MIN_ARENA)].into_boxed_slice();
        let mut heap = Heap::empty();
        // SAFETY:
        // - `storage` is a valid, exclusively owned memory region
        // - It is boxed, so its address does not change for the
        //   lifetime of the arena
        // - `init` is called exactly once, here
        unsafe {
            heap.init(storage.as_mut_ptr(), storage.len());
        }
        Self { heap, storage }
    }

    /// Carve a block of exactly `size` bytes.
    ///
    /// Returns `None` when the arena cannot satisfy the request.
    /// Zero-size blocks are served without touching the allocator.
    pub fn allocate(&mut self, size: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            return Some(NonNull::dangling());
        }
        let layout = Layout::from_size_align(size, 1).ok()?;
        self.heap.allocate_first_fit(layout).ok()
    }

    /// Return a block to the arena.
    ///
    /// # Safety
    /// - `ptr` must have come from `allocate` on this arena with the
    ///   same `size`
    /// - The block must not be used after this call
    pub unsafe fn deallocate(&mut self, ptr: NonNull<u8>, size: usize) {
        if size == 0 {
            return;
        }
        let Ok(layout) = Layout::from_size_align(size, 1) else {
            panic!("arena block with impossible size: {}", size);
        };
        // SAFETY: caller guarantees the block came from this arena
        // with this layout and is no longer referenced
        unsafe {
            self.heap.deallocate(ptr, layout);
        }
    }

    /// Bytes currently carved out.
    #[inline]
    pub fn used(&self) -> usize {
        self.heap.used()
    }

    /// Bytes still available.
    #[inline]
    pub fn free(&self) -> usize {
        self.heap.free()
    }

    /// Effective arena capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.heap.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_release() {
        let mut arena = ServiceHeap::with_capacity(4096);
        let before = arena.free();

        let block = arena.allocate(128).unwrap();
        assert!(arena.used() >= 128);

        // SAFETY: block came from this arena with size 128
        unsafe { arena.deallocate(block, 128) };
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.free(), before);
    }

    #[test]
    fn test_exhaustion() {
        let mut arena = ServiceHeap::with_capacity(256);
        assert!(arena.allocate(10_000).is_none());
        // The failed request must not leak anything
        assert_eq!(arena.used(), 0);
        // A request that fits still succeeds afterwards
        let block = arena.allocate(64).unwrap();
        // SAFETY: block came from this arena with size 64
        unsafe { arena.deallocate(block, 64) };
    }

    #[test]
    fn test_zero_size_block() {
        let mut arena = ServiceHeap::with_capacity(256);
        let block = arena.allocate(0).unwrap();
        assert_eq!(arena.used(), 0);
        // SAFETY: zero-size release is a no-op by contract
        unsafe { arena.deallocate(block, 0) };
    }

    #[test]
    fn test_block_reuse() {
        let mut arena = ServiceHeap::with_capacity(512);
        let first = arena.allocate(200).unwrap();
        // SAFETY: block came from this arena with size 200
        unsafe { arena.deallocate(first, 200) };
        // The freed space is available again
        assert!(arena.allocate(200).is_some());
    }
}
