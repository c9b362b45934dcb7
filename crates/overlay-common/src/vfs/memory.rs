use super::Vfs;
use crate::paths::clean;
use std::collections::HashMap;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Symlink chains longer than this are treated as loops.
const MAX_SYMLINK_HOPS: usize = 40;

/// In-Memory File System implementation (for testing)
///
/// Directories are implicit: a path is a directory when some stored file
/// lives beneath it. Symlinks map a path prefix onto another prefix and are
/// followed by `realpath` and by every probe.
#[derive(Clone, Default, Debug)]
pub struct MemoryVfs {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default, Debug)]
struct MemoryState {
    files: HashMap<PathBuf, String>,
    symlinks: HashMap<PathBuf, PathBuf>,
}

impl MemoryVfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`MemoryVfs::add_file`].
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    /// Store a file, replacing any previous content.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = clean(path.as_ref());
        self.state().files.insert(path, content.into());
    }

    /// Make `link` (and everything beneath it) an alias of `target`.
    pub fn add_symlink(&self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        let link = clean(link.as_ref());
        let target = clean(target.as_ref());
        self.state().symlinks.insert(link, target);
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MemoryState {
    /// Follow symlinks until the path no longer starts with any link.
    fn follow(&self, path: &Path) -> Result<PathBuf> {
        let mut current = clean(path);
        for _ in 0..MAX_SYMLINK_HOPS {
            // Longest matching link wins.
            let hop = self
                .symlinks
                .iter()
                .filter_map(|(link, target)| {
                    current
                        .strip_prefix(link)
                        .ok()
                        .map(|rest| (link.components().count(), clean(&target.join(rest))))
                })
                .max_by_key(|(depth, _)| *depth)
                .map(|(_, next)| next);
            match hop {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
        Err(Error::new(
            ErrorKind::InvalidInput,
            format!("Too many levels of symbolic links: {:?}", path),
        ))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.follow(path)
            .map(|p| self.files.contains_key(&p))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let Ok(path) = self.follow(path) else {
            return false;
        };
        if path == Path::new("/") || path == Path::new(".") {
            return !self.files.is_empty();
        }
        self.files
            .keys()
            .any(|k| k.starts_with(&path) && k != &path)
    }
}

impl Vfs for MemoryVfs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.state();
        let resolved = state.follow(path)?;
        state.files.get(&resolved).cloned().ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state();
        state.is_file(path) || state.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.state().is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state().is_dir(path)
    }

    fn realpath(&self, path: &Path) -> Result<PathBuf> {
        let state = self.state();
        let resolved = state.follow(path)?;
        if state.is_file(&resolved) || state.is_dir(&resolved) {
            Ok(resolved)
        } else {
            Err(Error::new(
                ErrorKind::NotFound,
                format!("No such file or directory: {:?}", path),
            ))
        }
    }
}
