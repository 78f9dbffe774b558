//! Boundary Transport
//!
//! Decodes an incoming command into one of the three service
//! operations and translates the result into the caller's
//! error-reporting convention.
//!
//! # Security Model
//! - Whitelist approach: only the three known command codes dispatch
//! - An unknown code is rejected without touching service state
//! - Argument meaning is fixed per code (size for Allocate, client
//!   address for Write/Read), never negotiated at runtime
//!
//! # Commands
//! - 1: Allocate(size) - release any buffer, carve a fresh one
//! - 2: Write(addr) - fill the buffer from client memory
//! - 3: Read(addr) - copy the buffer to client memory

pub mod command;
pub mod handler;

pub use command::{codes, Command, RawCommand};
pub use handler::{dispatch, reply_code, ServiceError};
