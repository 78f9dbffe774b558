//! Command Dispatch and Error Translation
//!
//! Pure dispatch: no state of its own. Each recognized code maps 1:1
//! to a service operation; results are translated into the caller's
//! reply convention at the very edge.

use core::fmt;

use log::{debug, warn};

use crate::mem::{MemError, MemoryService};

use super::command::{Command, RawCommand};

/// The caller-visible error taxonomy.
///
/// One variant per failure mode, so a successful return can never be
/// confused with a fallthrough default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// Allocation failed; retry with a smaller size.
    OutOfMemory,
    /// Operation attempted with no allocated buffer.
    NoBuffer,
    /// The client location failed validation for the full length.
    BoundaryFault,
    /// Unknown command code; a protocol mismatch, not retryable.
    InvalidCommand,
}

impl ServiceError {
    /// The negative reply code for the wire convention.
    pub const fn code(self) -> i64 {
        match self {
            Self::OutOfMemory => -12,
            Self::BoundaryFault => -14,
            Self::InvalidCommand => -22,
            Self::NoBuffer => -105,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::NoBuffer => write!(f, "no buffer allocated"),
            Self::BoundaryFault => write!(f, "boundary fault"),
            Self::InvalidCommand => write!(f, "invalid command"),
        }
    }
}

impl From<MemError> for ServiceError {
    fn from(err: MemError) -> Self {
        match err {
            MemError::OutOfMemory => Self::OutOfMemory,
            MemError::NoBuffer => Self::NoBuffer,
            MemError::BoundaryFault => Self::BoundaryFault,
        }
    }
}

/// Dispatch a raw command against a service instance.
///
/// Unknown codes are rejected before the service is touched. Each
/// recognized code invokes exactly one service operation; the
/// service's typed error is folded into [`ServiceError`].
pub fn dispatch(service: &mut MemoryService, raw: RawCommand) -> Result<(), ServiceError> {
    let cmd = match Command::decode(raw) {
        Ok(cmd) => cmd,
        Err(err) => {
            warn!("rejected unknown command code {}", raw.code);
            return Err(err);
        }
    };

    let result = match cmd {
        Command::Allocate(size) => service.allocate(size),
        Command::Write(src) => service.write(src),
        Command::Read(dst) => service.read(dst),
    };

    result.map_err(|err| {
        debug!("command {} failed: {}", raw.code, err);
        ServiceError::from(err)
    })
}

/// Translate a dispatch result into the wire reply: 0 on success,
/// the taxonomy's negative code on failure.
pub const fn reply_code(result: Result<(), ServiceError>) -> i64 {
    match result {
        Ok(()) => 0,
        Err(err) => err.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Access, ClientRegion};
    use crate::dispatch::command::codes;

    fn service_over(buf: &mut [u8]) -> (MemoryService, usize) {
        // SAFETY: the window covers `buf`, owned by the test
        let region =
            unsafe { ClientRegion::new(buf.as_mut_ptr() as usize, buf.len(), Access::READ_WRITE) };
        let base = region.start();
        (MemoryService::new(region), base)
    }

    #[test]
    fn test_dispatch_scenario() {
        let mut client = *b"hello";
        let (mut svc, base) = service_over(&mut client);

        assert_eq!(dispatch(&mut svc, RawCommand::new(codes::CMD_ALLOC, 5)), Ok(()));
        assert_eq!(dispatch(&mut svc, RawCommand::new(codes::CMD_WRITE, base)), Ok(()));
        client.fill(0);
        assert_eq!(dispatch(&mut svc, RawCommand::new(codes::CMD_READ, base)), Ok(()));
        assert_eq!(&client, b"hello");
    }

    #[test]
    fn test_unknown_code_leaves_state_untouched() {
        let mut client = [0u8; 8];
        let (mut svc, _) = service_over(&mut client);

        // Before any allocation
        assert_eq!(
            dispatch(&mut svc, RawCommand::new(99, 0)),
            Err(ServiceError::InvalidCommand)
        );
        assert!(!svc.is_allocated());

        // And with a buffer in place
        dispatch(&mut svc, RawCommand::new(codes::CMD_ALLOC, 8)).unwrap();
        assert_eq!(
            dispatch(&mut svc, RawCommand::new(99, 0xDEAD)),
            Err(ServiceError::InvalidCommand)
        );
        assert_eq!(svc.buffer_size(), Some(8));
    }

    #[test]
    fn test_error_translation() {
        let mut client = [0u8; 8];
        let (mut svc, _) = service_over(&mut client);

        assert_eq!(
            dispatch(&mut svc, RawCommand::new(codes::CMD_WRITE, 0x4000)),
            Err(ServiceError::NoBuffer)
        );

        dispatch(&mut svc, RawCommand::new(codes::CMD_ALLOC, 8)).unwrap();
        assert_eq!(
            dispatch(&mut svc, RawCommand::new(codes::CMD_WRITE, 0)),
            Err(ServiceError::BoundaryFault)
        );
    }

    #[test]
    fn test_reply_codes() {
        assert_eq!(reply_code(Ok(())), 0);
        assert_eq!(reply_code(Err(ServiceError::OutOfMemory)), -12);
        assert_eq!(reply_code(Err(ServiceError::BoundaryFault)), -14);
        assert_eq!(reply_code(Err(ServiceError::InvalidCommand)), -22);
        assert_eq!(reply_code(Err(ServiceError::NoBuffer)), -105);
    }

    #[test]
    fn test_dispatch_zero_length() {
        let mut client = [0u8; 4];
        let (mut svc, _) = service_over(&mut client);

        dispatch(&mut svc, RawCommand::new(codes::CMD_ALLOC, 0)).unwrap();
        // Zero-length transfers succeed even at the null address
        assert_eq!(dispatch(&mut svc, RawCommand::new(codes::CMD_WRITE, 0)), Ok(()));
        assert_eq!(dispatch(&mut svc, RawCommand::new(codes::CMD_READ, 0)), Ok(()));
    }
}
