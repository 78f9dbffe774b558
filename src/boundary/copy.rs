//! Audited Boundary Copy Primitive
//!
//! The two functions here are the only code in the crate that moves
//! bytes across the trust boundary.
//!
//! # Contract
//! Given a client location and a length, either every byte is copied
//! and `Ok(())` is returned, or validation fails and no byte moves.
//! Validation covers the full length before the copy starts, so a
//! fault never leaves a partial transfer behind.

use super::region::{ClientAddr, ClientRegion};
use super::validate::{self, AccessError};

/// Copy `dst.len()` bytes from the client's memory into the service.
///
/// The transfer length is the service buffer's length; the client
/// range is validated for readability over all of it.
pub fn copy_from_client(
    region: &ClientRegion,
    src: ClientAddr,
    dst: &mut [u8],
) -> Result<(), AccessError> {
    let src = validate::source_slice(region, src, dst.len())?;
    dst.copy_from_slice(src.as_bytes());
    Ok(())
}

/// Copy `src.len()` bytes from the service into the client's memory.
///
/// The client range is validated for writability over the full
/// length before anything is written.
pub fn copy_to_client(
    region: &ClientRegion,
    dst: ClientAddr,
    src: &[u8],
) -> Result<(), AccessError> {
    let mut dst = validate::dest_slice(region, dst, src.len())?;
    dst.as_bytes_mut().copy_from_slice(src);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::region::Access;

    // Build a window over memory the test actually owns, so validated
    // copies stay within bounds.
    fn window(buf: &mut [u8], access: Access) -> ClientRegion {
        // SAFETY: the window covers `buf`, which the caller keeps
        // alive and untouched for the duration of each copy
        unsafe { ClientRegion::new(buf.as_mut_ptr() as usize, buf.len(), access) }
    }

    #[test]
    fn test_copy_in_round_trip() {
        let mut client = *b"hello, service";
        let region = window(&mut client, Access::READ_WRITE);
        let base = ClientAddr::new(region.start());

        let mut kernel = [0u8; 14];
        copy_from_client(&region, base, &mut kernel).unwrap();
        assert_eq!(&kernel, b"hello, service");

        let mut out = [0u8; 14];
        let region_out = window(&mut out, Access::READ_WRITE);
        copy_to_client(&region_out, ClientAddr::new(region_out.start()), &kernel).unwrap();
        assert_eq!(&out, b"hello, service");
    }

    #[test]
    fn test_copy_at_offset() {
        let mut client = [0u8; 32];
        client[8..16].copy_from_slice(b"ABCDEFGH");
        let region = window(&mut client, Access::READ);
        let addr = ClientAddr::new(region.start() + 8);

        let mut kernel = [0u8; 8];
        copy_from_client(&region, addr, &mut kernel).unwrap();
        assert_eq!(&kernel, b"ABCDEFGH");
    }

    #[test]
    fn test_fault_moves_no_bytes() {
        let mut client = [0xAAu8; 8];
        let region = window(&mut client, Access::READ_WRITE);

        // Transfer longer than the window: rejected before any copy
        let mut kernel = [0x55u8; 16];
        let err = copy_from_client(&region, ClientAddr::new(region.start()), &mut kernel);
        assert_eq!(err.unwrap_err(), AccessError::OutOfWindow);
        assert_eq!(kernel, [0x55u8; 16]);

        // Same on the outbound side: client memory untouched
        let err = copy_to_client(&region, ClientAddr::new(region.start()), &kernel);
        assert_eq!(err.unwrap_err(), AccessError::OutOfWindow);
        assert_eq!(client, [0xAAu8; 8]);
    }

    #[test]
    fn test_write_denied_on_read_only_window() {
        let mut client = [0x11u8; 8];
        let region = window(&mut client, Access::READ);
        let err = copy_to_client(&region, ClientAddr::new(region.start()), &[0u8; 8]);
        assert_eq!(err.unwrap_err(), AccessError::AccessDenied);
        assert_eq!(client, [0x11u8; 8]);
    }

    #[test]
    fn test_zero_length_copies() {
        let mut client = [0u8; 4];
        let region = window(&mut client, Access::empty());
        // Zero-length transfers succeed even without rights
        copy_from_client(&region, ClientAddr::new(0), &mut []).unwrap();
        copy_to_client(&region, ClientAddr::new(0), &[]).unwrap();
    }
}
