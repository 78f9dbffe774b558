//! The Memory Service
//!
//! One buffer, one client, three operations.
//!
//! # Buffer Lifecycle
//! - `allocate` always releases the current buffer first, then carves
//!   a fresh block; there is no resize path
//! - `write` fills the buffer from the client, `read` copies it back
//! - a failed allocation leaves the service unallocated, not holding
//!   a stale block
//! - dropping the service releases the buffer
//!
//! # Security Considerations
//! - Operations on an unallocated buffer fail with `NoBuffer`; the
//!   copy is never attempted
//! - Transfer lengths are always the buffer's current size, validated
//!   against the client window in full before any byte moves
//! - Released blocks are wiped (see `wipe`)

use core::fmt;

use crate::boundary::{copy, AccessError, ClientAddr, ClientRegion};

use super::buffer::Buffer;
use super::heap::ServiceHeap;
use super::wipe;

/// Default arena capacity (64 KiB).
pub const DEFAULT_ARENA_SIZE: usize = 64 * 1024;

/// Service construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    /// Capacity of the arena the buffer is carved from.
    pub arena_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            arena_size: DEFAULT_ARENA_SIZE,
        }
    }
}

/// Errors the service operations can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    /// The arena could not satisfy the requested size.
    OutOfMemory,
    /// Write or Read issued with no buffer allocated.
    NoBuffer,
    /// The client location failed validation.
    BoundaryFault,
}

impl fmt::Display for MemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "arena exhausted"),
            Self::NoBuffer => write!(f, "no buffer allocated"),
            Self::BoundaryFault => write!(f, "client location rejected"),
        }
    }
}

impl From<AccessError> for MemError {
    fn from(_: AccessError) -> Self {
        Self::BoundaryFault
    }
}

/// The privileged memory service.
///
/// Holds the arena, the current buffer (if any), and the window of
/// client memory this instance is allowed to copy from/to. One
/// instance serves one client.
#[derive(Debug)]
pub struct MemoryService {
    heap: ServiceHeap,
    buffer: Option<Buffer>,
    region: ClientRegion,
}

impl MemoryService {
    /// Create a service with the default arena size.
    pub fn new(region: ClientRegion) -> Self {
        Self::with_config(ServiceConfig::default(), region)
    }

    /// Create a service with explicit configuration.
    pub fn with_config(config: ServiceConfig, region: ClientRegion) -> Self {
        Self {
            heap: ServiceHeap::with_capacity(config.arena_size),
            buffer: None,
            region,
        }
    }

    /// Allocate a buffer of exactly `requested` bytes.
    ///
    /// Any current buffer is released first, unconditionally; if the
    /// new allocation then fails, the service is left unallocated
    /// rather than holding a stale block. A request of zero is legal
    /// and yields a zero-length buffer.
    ///
    /// The new block's contents are unspecified; callers must not
    /// assume zeroing.
    pub fn allocate(&mut self, requested: usize) -> Result<(), MemError> {
        self.release();
        let ptr = self.heap.allocate(requested).ok_or(MemError::OutOfMemory)?;
        self.buffer = Some(Buffer::new(ptr, requested));
        Ok(())
    }

    /// Fill the buffer from client memory at `src`.
    ///
    /// Copies exactly the buffer's size. On a boundary fault the
    /// buffer stays allocated at the same size; its contents after a
    /// rejected transfer are unchanged because validation precedes
    /// the copy.
    pub fn write(&mut self, src: ClientAddr) -> Result<(), MemError> {
        let buf = self.buffer.as_mut().ok_or(MemError::NoBuffer)?;
        copy::copy_from_client(&self.region, src, buf.as_mut_slice())?;
        Ok(())
    }

    /// Copy the buffer to client memory at `dst`.
    ///
    /// Copies exactly the buffer's size; the buffer itself is never
    /// modified.
    pub fn read(&self, dst: ClientAddr) -> Result<(), MemError> {
        let buf = self.buffer.as_ref().ok_or(MemError::NoBuffer)?;
        copy::copy_to_client(&self.region, dst, buf.as_slice())?;
        Ok(())
    }

    /// Size of the current buffer, or `None` when unallocated.
    #[inline]
    pub fn buffer_size(&self) -> Option<usize> {
        self.buffer.as_ref().map(Buffer::size)
    }

    /// Whether a buffer is currently allocated.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.buffer.is_some()
    }

    /// The client window this instance serves.
    #[inline]
    pub fn region(&self) -> &ClientRegion {
        &self.region
    }

    /// Arena bytes currently held by the buffer.
    #[inline]
    pub fn arena_used(&self) -> usize {
        self.heap.used()
    }

    /// Release the current buffer, if any.
    ///
    /// The block is wiped before it returns to the arena.
    pub fn release(&mut self) {
        if let Some(mut buf) = self.buffer.take() {
            wipe::wipe(buf.as_mut_slice());
            let (ptr, size) = buf.into_raw();
            // SAFETY: the block was carved from this service's arena
            // with exactly this size, and `buf` is consumed above
            unsafe {
                self.heap.deallocate(ptr, size);
            }
        }
    }
}

impl Drop for MemoryService {
    fn drop(&mut self) {
        self.release();
    }
}
