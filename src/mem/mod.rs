//! Memory Service
//!
//! Owns the single buffer and implements the three control
//! operations.
//!
//! # Security Principles
//! - The buffer is carved from a service-owned arena, so a hostile
//!   size request exhausts the arena, not the host
//! - Release-then-allocate-fresh on every allocation; there is never
//!   a half-updated pointer/size pair
//! - Buffer contents are wiped before a block returns to the arena

pub mod buffer;
pub mod heap;
pub mod service;
pub mod wipe;

pub use buffer::Buffer;
pub use heap::ServiceHeap;
pub use service::{MemError, MemoryService, ServiceConfig};
