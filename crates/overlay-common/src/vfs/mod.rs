use std::io::Result;
use std::path::{Path, PathBuf};

/// Virtual File System trait
///
/// Read-only abstraction over the filesystem operations module resolution
/// needs, so that resolution can run against:
/// - the OS file system
/// - an in-memory file system (tests, virtual build inputs)
///
/// # Contract
///
/// - **`exists(path)`**: `true` for a file OR a directory, matching
///   `std::path::Path::exists()`.
/// - **`is_file(path)`** / **`is_dir(path)`**: mutually exclusive, both imply `exists()`.
/// - **`read_to_string(path)`**: only succeeds for files.
/// - **`realpath(path)`**: the canonical location of an existing path with
///   symlinks followed. Fails with `NotFound` for missing paths.
///
/// Implementations are shared between resolver invocations that may run
/// concurrently, hence the `Send + Sync` bound.
pub trait Vfs: Send + Sync {
    /// Read a file to a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Check if a path exists (file OR directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Resolve symlinks and return the canonical path.
    fn realpath(&self, path: &Path) -> Result<PathBuf>;
}

impl<T: Vfs + ?Sized> Vfs for &T {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn realpath(&self, path: &Path) -> Result<PathBuf> {
        (**self).realpath(path)
    }
}

// Re-export implementations
pub use memory::MemoryVfs;
pub use os::OsVfs;

mod memory;
mod os;
