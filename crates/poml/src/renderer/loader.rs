//! Byte-stream providers for `<include>` and `<let src>`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads the documents and data files a render refers to.
///
/// Reads are synchronous and return the whole content.
pub trait SourceLoader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Loads sources from the filesystem.
///
/// Relative paths resolve against the base directory when one is set, and
/// against the process working directory otherwise.
#[derive(Debug, Default, Clone)]
pub struct FsLoader {
    base_dir: Option<PathBuf>,
}

impl FsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SourceLoader for FsLoader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }
}

/// Serves sources from memory, keyed by path.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use poml::renderer::{MemoryLoader, SourceLoader};
///
/// let loader = MemoryLoader::new().with_source("world.poml", "<world>World</world>");
/// assert_eq!(loader.read(Path::new("world.poml")).unwrap(), b"<world>World</world>");
/// assert!(loader.read(Path::new("missing.poml")).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    sources: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a source.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.sources.insert(path.into(), content.into());
    }

    /// Builder-style variant of [`MemoryLoader::insert`].
    pub fn with_source(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.sources.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no source registered for '{}'", path.display()),
            )
        })
    }
}
