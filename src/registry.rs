//! Service Registration
//!
//! Exposes service instances at discoverable names, the way the
//! original control interface exposes a device node. Registration
//! lifecycle is independent of buffer lifecycle; what ties them
//! together is shutdown: unregistering hands the service back, and
//! dropping it releases any allocated buffer.
//!
//! # Design
//! - Fixed-size slot table behind a spinlock
//! - `const`-constructible, so a registry can live in a `static`
//! - Commands enter through `submit`, which speaks the wire reply
//!   convention

use spin::Mutex;

use crate::dispatch::{dispatch, reply_code, RawCommand};
use crate::mem::MemoryService;

/// Number of slots in a registry.
pub const REGISTRY_SIZE: usize = 8;

/// Reply code for a command naming no registered service.
const NO_SUCH_SERVICE: i64 = -19;

/// Error type for registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is already registered.
    NameTaken,
    /// No free slot remains.
    Full,
    /// No service with that name.
    NotFound,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NameTaken => write!(f, "name already registered"),
            Self::Full => write!(f, "registry full"),
            Self::NotFound => write!(f, "service not found"),
        }
    }
}

struct Entry {
    name: &'static str,
    service: MemoryService,
}

/// A name-keyed table of service instances.
pub struct Registry {
    table: Mutex<[Option<Entry>; REGISTRY_SIZE]>,
}

impl Registry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        const EMPTY: Option<Entry> = None;
        Self {
            table: Mutex::new([EMPTY; REGISTRY_SIZE]),
        }
    }

    /// Register a service under a name.
    pub fn register(
        &self,
        name: &'static str,
        service: MemoryService,
    ) -> Result<(), RegistryError> {
        let mut table = self.table.lock();

        if table.iter().flatten().any(|entry| entry.name == name) {
            return Err(RegistryError::NameTaken);
        }

        let slot = table
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(RegistryError::Full)?;
        *slot = Some(Entry { name, service });
        log::info!("registered service '{}'", name);
        Ok(())
    }

    /// Remove a service, handing it back to the caller.
    ///
    /// Dropping the returned service releases any allocated buffer,
    /// which is the shutdown contract.
    pub fn unregister(&self, name: &str) -> Result<MemoryService, RegistryError> {
        let mut table = self.table.lock();

        for slot in table.iter_mut() {
            if let Some(entry) = slot.take_if(|entry| entry.name == name) {
                log::info!("unregistered service '{}'", name);
                return Ok(entry.service);
            }
        }
        Err(RegistryError::NotFound)
    }

    /// Run a closure against a registered service.
    ///
    /// Returns `None` when the name is not registered.
    pub fn with<R>(&self, name: &str, f: impl FnOnce(&mut MemoryService) -> R) -> Option<R> {
        let mut table = self.table.lock();
        let entry = table
            .iter_mut()
            .flatten()
            .find(|entry| entry.name == name)?;
        Some(f(&mut entry.service))
    }

    /// Wire entry point: look up the service, dispatch, reply.
    ///
    /// Returns 0 on success, the taxonomy's negative code on failure,
    /// or -19 when no service has that name.
    pub fn submit(&self, name: &str, raw: RawCommand) -> i64 {
        match self.with(name, |service| dispatch(service, raw)) {
            Some(result) => reply_code(result),
            None => {
                log::warn!("command for unknown service '{}'", name);
                NO_SUCH_SERVICE
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
