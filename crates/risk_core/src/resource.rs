//! Platform resource access.
//!
//! Assets are addressed by relative paths (`fonts/ui.fnt`). `FsResources`
//! resolves them below an asset root on disk; `MemoryResources` serves
//! buffers registered up front, which is what headless tools and tests use.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("resource not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read resource {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait ResourceLoader {
    /// Read the whole resource into an owned buffer.
    fn load_resource(&self, path: &Path) -> Result<Vec<u8>, ResourceError>;
}

#[derive(Debug, Clone)]
pub struct FsResources {
    root: PathBuf,
}

impl FsResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ResourceLoader for FsResources {
    fn load_resource(&self, path: &Path) -> Result<Vec<u8>, ResourceError> {
        let resolved = self.resolve(path);
        fs::read(&resolved).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ResourceError::NotFound(resolved),
            _ => ResourceError::Io {
                path: resolved,
                source,
            },
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    entries: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the bytes served for `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.entries.insert(path.into(), bytes);
    }

    pub fn remove(&mut self, path: &Path) -> Option<Vec<u8>> {
        self.entries.remove(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceLoader for MemoryResources {
    fn load_resource(&self, path: &Path) -> Result<Vec<u8>, ResourceError> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_path_buf()))
    }
}

/// Swap the extension of `path`. Accepts `"png"` as well as `".png"`.
pub fn change_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension.trim_start_matches('.'))
}
