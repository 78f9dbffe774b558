//! Boundary Location Validation
//!
//! Turns a raw client address plus length into a borrowed view of the
//! client's window, or rejects it.
//!
//! # Security Principles
//! - Validate the FULL transfer length up front; a location is either
//!   accessible for all of it or the transfer never starts
//! - Prevent the usual failure modes:
//!   - Null location dereference (explicit check)
//!   - Address arithmetic overflow (checked add)
//!   - Escape from the client's window (containment check)
//!   - Rights escalation (access check against the granted rights)

use super::region::{Access, ClientAddr, ClientRegion};

/// Why a client location was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The location is null with a nonzero length.
    NullAddress,
    /// `addr + len` overflows the address space.
    LengthOverflow,
    /// The range is not fully inside the client's window.
    OutOfWindow,
    /// The window does not grant the required right.
    AccessDenied,
}

impl core::fmt::Display for AccessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NullAddress => write!(f, "null client address"),
            Self::LengthOverflow => write!(f, "client range overflows"),
            Self::OutOfWindow => write!(f, "client range outside window"),
            Self::AccessDenied => write!(f, "window access right not granted"),
        }
    }
}

/// A validated, readable view of client memory.
///
/// Only constructed after validation passes, so the slice accessor
/// is safe to call.
#[derive(Debug)]
pub struct ClientSlice {
    ptr: *const u8,
    len: usize,
}

impl ClientSlice {
    /// Borrow the validated range as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        if self.len == 0 {
            return &[];
        }
        // SAFETY:
        // - The range was validated to lie inside the client window
        // - The window's creator vouched the memory is mapped and valid
        //   for the region's lifetime (ClientRegion::new contract)
        unsafe { core::slice::from_raw_parts(self.ptr, self.len) }
    }
}

/// A validated, writable view of client memory.
#[derive(Debug)]
pub struct ClientSliceMut {
    ptr: *mut u8,
    len: usize,
}

impl ClientSliceMut {
    /// Borrow the validated range as mutable bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        if self.len == 0 {
            return &mut [];
        }
        // SAFETY: same contract as ClientSlice::as_bytes, with the
        // WRITE right checked during validation
        unsafe { core::slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

/// Check a client range against the window, independent of direction.
///
/// # Security Checks
/// 1. Zero-length transfers always pass (nothing is dereferenced)
/// 2. The address is not null
/// 3. `addr + len` does not overflow
/// 4. The whole range lies inside the window
/// 5. The window grants `required`
fn check(
    region: &ClientRegion,
    addr: ClientAddr,
    len: usize,
    required: Access,
) -> Result<(), AccessError> {
    if len == 0 {
        return Ok(());
    }

    if addr.is_null() {
        return Err(AccessError::NullAddress);
    }

    let start = addr.as_usize();
    let end = start.checked_add(len).ok_or(AccessError::LengthOverflow)?;

    if start < region.start() || end > region.end() {
        return Err(AccessError::OutOfWindow);
    }

    if !region.access().contains(required) {
        return Err(AccessError::AccessDenied);
    }

    Ok(())
}

/// Validate a client range the service wants to read from.
pub fn source_slice(
    region: &ClientRegion,
    addr: ClientAddr,
    len: usize,
) -> Result<ClientSlice, AccessError> {
    check(region, addr, len, Access::READ)?;
    Ok(ClientSlice {
        ptr: addr.as_usize() as *const u8,
        len,
    })
}

/// Validate a client range the service wants to write to.
pub fn dest_slice(
    region: &ClientRegion,
    addr: ClientAddr,
    len: usize,
) -> Result<ClientSliceMut, AccessError> {
    check(region, addr, len, Access::WRITE)?;
    Ok(ClientSliceMut {
        ptr: addr.as_usize() as *mut u8,
        len,
    })
}
