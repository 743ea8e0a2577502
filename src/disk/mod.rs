// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Virtual-disk storage collaborators.
//!
//! A [`Disk`] addresses files by `/`-separated keys. It is consulted twice: once while staging (cheap metadata checks
//! only) and once while building (to open the bytes). A [`DiskRegistry`] maps names to disks so that content can be
//! added by disk name.

pub mod local;

pub use local::LocalDisk;

use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use futures_lite::io::AsyncWrite;

use crate::content::ByteStream;
use crate::error::{Result, ZipStreamError};

/// A boxed sink for bytes written to a disk.
pub type DiskWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// A storage collaborator holding files under string keys.
pub trait Disk: Send + Sync {
    /// Returns true if `key` exists, either as a file or as a directory.
    fn exists(&self, key: &str) -> bool;

    /// Lists every directory key held by this disk, recursively.
    fn all_directories(&self) -> HashSet<String>;

    /// Returns true if `key` is a directory.
    ///
    /// The provided implementation lists every directory; implementors with a cheaper check should override it.
    fn is_directory(&self, key: &str) -> bool {
        self.all_directories().contains(key.trim_end_matches('/'))
    }

    /// Opens the bytes held under `key`.
    fn read_stream(&self, key: &str) -> std::io::Result<ByteStream>;

    /// Opens a writer which stores bytes under `key`, replacing any existing file.
    fn write_stream(&self, key: &str) -> std::io::Result<DiskWriter>;
}

/// A set of disks addressable by name.
#[derive(Clone, Default)]
pub struct DiskRegistry {
    disks: HashMap<String, Arc<dyn Disk>>,
}

impl DiskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a disk, replacing any disk previously registered under the same name.
    pub fn register(&mut self, name: impl Into<String>, disk: impl Disk + 'static) -> &mut Self {
        self.register_shared(name, Arc::new(disk))
    }

    pub fn register_shared(&mut self, name: impl Into<String>, disk: Arc<dyn Disk>) -> &mut Self {
        self.disks.insert(name.into(), disk);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Disk>> {
        self.disks.get(name).cloned().ok_or_else(|| ZipStreamError::UnknownDisk(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.disks.contains_key(name)
    }
}

impl Debug for DiskRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.disks.keys()).finish()
    }
}
