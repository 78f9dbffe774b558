//! memdev - Privileged Single-Buffer Memory Service
//!
//! A memory service that owns one buffer and exposes it to a single
//! unprivileged client through three control operations: allocate,
//! write, read.
//!
//! # Trust Model
//! - The service is privileged; the client is not
//! - Every value crossing the boundary is validated before use
//! - The client only ever receives copies of buffer bytes, never a
//!   reference to the buffer itself
//!
//! # Security Features
//! - Single audited copy primitive for all boundary transfers
//! - Buffer carved from a service-owned arena (allocation failure is
//!   an error, not an abort)
//! - Buffer contents wiped with volatile writes before release
//! - Explicit error per failure mode, never a panic on bad input
//!
//! # Architecture
//! - `boundary`: client window description, validation, copy primitive
//! - `mem`: arena, buffer, and the memory service itself
//! - `dispatch`: command decode and error translation for the wire
//! - `registry`: name-keyed registration of service instances

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod boundary;
pub mod dispatch;
pub mod mem;
pub mod registry;

pub use boundary::{Access, ClientAddr, ClientRegion};
pub use dispatch::{dispatch, reply_code, Command, RawCommand, ServiceError};
pub use mem::{MemError, MemoryService, ServiceConfig};
pub use registry::{Registry, RegistryError};
