// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::path::{Path, PathBuf};

use tokio_util::compat::TokioAsyncReadCompatExt;

use crate::content::{normalize_destination, ByteStream};
use crate::error::{Result, SourceOrigin, ZipStreamError};
use crate::opts::{EntryOptions, HasComment, HasFileOptions, HasLastModified};

/// An entry read from a file on the local filesystem.
///
/// The file is only opened once the archive writer is ready for its bytes, and is closed as soon as they have been
/// consumed.
#[derive(Debug, Clone)]
pub struct LocalFile {
    source: PathBuf,
    destination: String,
    options: EntryOptions,
}

impl LocalFile {
    /// Constructs an entry whose destination is the source's file name.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let destination = match source.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => source.to_string_lossy().into_owned(),
        };

        Self { destination: normalize_destination(&destination), source, options: EntryOptions::default() }
    }

    /// Constructs an entry with an explicit destination, falling back to the source's file name.
    pub fn with_destination(source: impl Into<PathBuf>, destination: Option<&str>) -> Self {
        let file = Self::new(source);

        match destination {
            Some(destination) => file.rename(destination),
            None => file,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Changes the destination path inside the archive.
    pub fn rename(mut self, destination: impl AsRef<str>) -> Self {
        self.destination = normalize_destination(destination.as_ref());
        self
    }

    /// Checks that the source exists and is a regular file.
    pub fn verify(&self) -> Result<()> {
        if self.source.is_file() {
            return Ok(());
        }

        Err(ZipStreamError::SourceNotFound { path: self.source.display().to_string(), origin: SourceOrigin::Local })
    }

    pub(crate) async fn stream(&self) -> Result<ByteStream> {
        let file = tokio::fs::File::open(&self.source)
            .await
            .map_err(|err| ZipStreamError::streaming(&self.destination, err))?;

        Ok(Box::new(file.compat()))
    }
}

impl HasComment for LocalFile {
    fn options(&self) -> &EntryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut EntryOptions {
        &mut self.options
    }
}

impl HasLastModified for LocalFile {}
impl HasFileOptions for LocalFile {}
