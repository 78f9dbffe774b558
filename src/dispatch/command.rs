//! Command Representation and Decode
//!
//! The wire shape of a request is one command code plus one argument
//! word; what the word means depends on the code alone.

use crate::boundary::ClientAddr;

use super::handler::ServiceError;

/// Command codes, stable across client and service.
pub mod codes {
    /// Release any current buffer, allocate `arg` bytes.
    pub const CMD_ALLOC: u32 = 1;
    /// Copy buffer-size bytes from client address `arg`.
    pub const CMD_WRITE: u32 = 2;
    /// Copy buffer-size bytes to client address `arg`.
    pub const CMD_READ: u32 = 3;
}

/// A raw request as it crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCommand {
    /// Which operation is requested.
    pub code: u32,
    /// Size (Allocate) or client address (Write/Read).
    pub arg: usize,
}

impl RawCommand {
    /// Build a raw request.
    #[inline]
    pub const fn new(code: u32, arg: usize) -> Self {
        Self { code, arg }
    }
}

/// A decoded, typed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Allocate a buffer of the given size.
    Allocate(usize),
    /// Fill the buffer from the client address.
    Write(ClientAddr),
    /// Copy the buffer to the client address.
    Read(ClientAddr),
}

impl Command {
    /// Decode a raw request.
    ///
    /// Unknown codes fail with `InvalidCommand`; the argument word is
    /// not inspected for them.
    pub fn decode(raw: RawCommand) -> Result<Self, ServiceError> {
        match raw.code {
            codes::CMD_ALLOC => Ok(Self::Allocate(raw.arg)),
            codes::CMD_WRITE => Ok(Self::Write(ClientAddr::new(raw.arg))),
            codes::CMD_READ => Ok(Self::Read(ClientAddr::new(raw.arg))),
            _ => Err(ServiceError::InvalidCommand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_codes() {
        assert_eq!(
            Command::decode(RawCommand::new(codes::CMD_ALLOC, 128)),
            Ok(Command::Allocate(128))
        );
        assert_eq!(
            Command::decode(RawCommand::new(codes::CMD_WRITE, 0x4000)),
            Ok(Command::Write(ClientAddr::new(0x4000)))
        );
        assert_eq!(
            Command::decode(RawCommand::new(codes::CMD_READ, 0x4000)),
            Ok(Command::Read(ClientAddr::new(0x4000)))
        );
    }

    #[test]
    fn test_decode_unknown_code() {
        for code in [0u32, 4, 99, u32::MAX] {
            assert_eq!(
                Command::decode(RawCommand::new(code, 0)),
                Err(ServiceError::InvalidCommand)
            );
        }
    }
}
