// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::collections::HashSet;
use std::io::{Error, ErrorKind};
use std::path::{Component, Path, PathBuf};

use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};

use crate::content::ByteStream;
use crate::disk::{Disk, DiskWriter};

/// A [`Disk`] rooted at a directory of the local filesystem.
///
/// Keys are `/`-separated paths relative to the root. Keys which would escape the root are treated as missing.
#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> std::io::Result<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));

        if relative.components().any(|component| !matches!(component, Component::Normal(_) | Component::CurDir)) {
            return Err(Error::new(ErrorKind::InvalidInput, format!("key '{key}' escapes the disk root")));
        }

        Ok(self.root.join(relative))
    }
}

impl Disk for LocalDisk {
    fn exists(&self, key: &str) -> bool {
        self.resolve(key).map(|path| path.exists()).unwrap_or(false)
    }

    fn all_directories(&self) -> HashSet<String> {
        let mut directories = HashSet::new();
        let mut stack = vec![self.root.clone()];

        while let Some(path) = stack.pop() {
            let Ok(entries) = std::fs::read_dir(&path) else {
                continue;
            };

            for entry in entries.flatten() {
                let entry_path = entry.path();

                if !entry_path.is_dir() {
                    continue;
                }
                if let Ok(relative) = entry_path.strip_prefix(&self.root) {
                    let key = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>();
                    directories.insert(key.join("/"));
                }

                stack.push(entry_path);
            }
        }

        directories
    }

    fn is_directory(&self, key: &str) -> bool {
        self.resolve(key).map(|path| path.is_dir()).unwrap_or(false)
    }

    fn read_stream(&self, key: &str) -> std::io::Result<ByteStream> {
        let file = std::fs::File::open(self.resolve(key)?)?;

        Ok(Box::new(tokio::fs::File::from_std(file).compat()))
    }

    fn write_stream(&self, key: &str) -> std::io::Result<DiskWriter> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;

        Ok(Box::new(tokio::fs::File::from_std(file).compat_write()))
    }
}
