// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::content::{base_name, normalize_destination, ByteStream};
use crate::disk::Disk;
use crate::error::{Result, SourceOrigin, ZipStreamError};
use crate::opts::{EntryOptions, HasComment, HasFileOptions, HasLastModified};

/// An entry read from a [`Disk`] collaborator.
#[derive(Clone)]
pub struct DiskFile {
    disk: Arc<dyn Disk>,
    source: String,
    destination: String,
    options: EntryOptions,
}

impl DiskFile {
    /// Constructs an entry whose destination is the last segment of the source key.
    pub fn new(disk: Arc<dyn Disk>, source: impl Into<String>) -> Self {
        let source = source.into();
        let destination = normalize_destination(base_name(&source));

        Self { disk, source, destination, options: EntryOptions::default() }
    }

    /// Constructs an entry with an explicit destination, falling back to the source key's base name.
    pub fn with_destination(disk: Arc<dyn Disk>, source: impl Into<String>, destination: Option<&str>) -> Self {
        let file = Self::new(disk, source);

        match destination {
            Some(destination) => file.rename(destination),
            None => file,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn rename(mut self, destination: impl AsRef<str>) -> Self {
        self.destination = normalize_destination(destination.as_ref());
        self
    }

    /// Checks that the source key exists on the disk and is not a directory.
    pub fn verify(&self) -> Result<()> {
        if self.disk.exists(&self.source) && !self.disk.is_directory(&self.source) {
            return Ok(());
        }

        Err(ZipStreamError::SourceNotFound { path: self.source.clone(), origin: SourceOrigin::Disk })
    }

    pub(crate) fn stream(&self) -> Result<ByteStream> {
        self.disk.read_stream(&self.source).map_err(|err| ZipStreamError::streaming(&self.destination, err))
    }
}

impl Debug for DiskFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskFile")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("options", &self.options)
            .finish()
    }
}

impl HasComment for DiskFile {
    fn options(&self) -> &EntryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut EntryOptions {
        &mut self.options
    }
}

impl HasLastModified for DiskFile {}
impl HasFileOptions for DiskFile {}
