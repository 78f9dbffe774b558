//! Trust Boundary Layer
//!
//! Everything that touches client-owned memory lives here.
//!
//! # Security Principles
//! - Validate ALL client-supplied locations before use
//! - Fail-closed: a location is inaccessible until proven otherwise
//! - Exactly two functions dereference client addresses
//!   (`copy::copy_from_client` and `copy::copy_to_client`); every
//!   other path handles addresses as inert values

pub mod copy;
pub mod region;
pub mod validate;

pub use copy::{copy_from_client, copy_to_client};
pub use region::{Access, ClientAddr, ClientRegion};
pub use validate::AccessError;
