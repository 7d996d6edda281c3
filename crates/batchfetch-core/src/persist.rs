//! Write fetched bytes to their destination file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::PersistError;

/// Writes one body to one path. Implementations are shared by all workers.
pub trait Persister: Send + Sync {
    /// Create or truncate `destination` and write all of `bytes`.
    /// Returns the number of bytes written.
    fn persist(&self, bytes: &[u8], destination: &Path) -> Result<u64, PersistError>;
}

/// Plain filesystem writer. Never creates parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPersister;

impl Persister for FsPersister {
    fn persist(&self, bytes: &[u8], destination: &Path) -> Result<u64, PersistError> {
        let wrap = |source| PersistError {
            path: destination.to_path_buf(),
            source,
        };
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(destination)
            .map_err(wrap)?;
        file.write_all(bytes).map_err(wrap)?;
        file.flush().map_err(wrap)?;
        Ok(bytes.len() as u64)
    }
}
