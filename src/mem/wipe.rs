//! Release Wipe
//!
//! Clears buffer contents before a block returns to the arena, so a
//! later allocation can never observe a previous client's bytes.
//!
//! Volatile writes keep the wipe from being optimized away even
//! though the block is about to be freed.

use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};

/// Overwrite the slice with zeros.
///
/// The writes are volatile and followed by a compiler fence, so they
/// survive dead-store elimination.
pub fn wipe(bytes: &mut [u8]) {
    let ptr = bytes.as_mut_ptr();
    for i in 0..bytes.len() {
        // SAFETY: `i` is within the slice we hold a mutable
        // reference to
        unsafe {
            ptr::write_volatile(ptr.add(i), 0);
        }
    }
    compiler_fence(Ordering::SeqCst);
}
