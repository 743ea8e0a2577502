// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The boundary between staged content and the component which encodes ZIP bytes.
//!
//! The staging queue only talks to an [`ArchiveWriter`]. It hands over per-entry overrides untouched (`None` meaning
//! "use the writer's default") together with a lazy [`ByteProducer`], so that no entry is opened before the writer is
//! ready to consume it. [`ZipArchiveWriter`] is the production implementation, backed by `async_zip`.
//!
//! # Example
//! ```no_run
//! # use async_zipstream::write::{ArchiveWriter, ZipArchiveWriter};
//! # use async_zipstream::{ArchiveOptions, Pending, Raw};
//! # use async_zipstream::error::ZipStreamError;
//! #
//! # async fn run() -> Result<(), ZipStreamError> {
//! let mut pending = Pending::new();
//! pending.add(Raw::new("foo.txt", "This is an example file."))?;
//!
//! let mut writer = ZipArchiveWriter::open(Vec::<u8>::new(), &ArchiveOptions::default());
//! pending.process(&mut writer).await?;
//! let bytes = writer.finish().await?;
//! #   Ok(())
//! # }
//! ```

pub(crate) mod io;
pub mod zip;

pub use zip::ZipArchiveWriter;

use crate::content::{ByteStream, Entry};
use crate::date::Timestamp;
use crate::error::Result;
use crate::opts::Compression;

/// A directory record handed to an [`ArchiveWriter`].
#[derive(Debug, Clone, Copy)]
pub struct DirectoryRecord<'a> {
    /// The directory path, without a trailing slash.
    pub path: &'a str,
    pub comment: &'a str,
    pub last_modified: Option<Timestamp>,
}

/// A file record handed to an [`ArchiveWriter`].
///
/// The `Option` fields are per-entry overrides; `None` means the writer's own default applies.
#[derive(Debug)]
pub struct FileRecord<'a> {
    pub path: &'a str,
    pub comment: &'a str,
    pub compression: Option<Compression>,
    pub deflate_level: Option<u8>,
    pub last_modified: Option<Timestamp>,
    pub zero_header: Option<bool>,
    pub content: ByteProducer<'a>,
}

/// A lazy handle to a staged entry's bytes. Nothing is opened until [`ByteProducer::open`] is called.
pub struct ByteProducer<'a> {
    entry: &'a mut Entry,
}

impl<'a> ByteProducer<'a> {
    pub(crate) fn new(entry: &'a mut Entry) -> Self {
        Self { entry }
    }

    /// Opens the entry's bytes.
    ///
    /// The returned stream owns every resource it opened; dropping it releases them.
    pub async fn open(self) -> Result<ByteStream> {
        self.entry.stream().await
    }
}

impl std::fmt::Debug for ByteProducer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ByteProducer").field(&self.entry.destination()).finish()
    }
}

/// The archive-encoding collaborator driven by [`Pending::process`](crate::Pending::process).
#[allow(async_fn_in_trait)]
pub trait ArchiveWriter {
    /// The value handed back once the archive is complete.
    type Output;

    async fn add_directory(&mut self, record: DirectoryRecord<'_>) -> Result<()>;

    async fn add_file(&mut self, record: FileRecord<'_>) -> Result<()>;

    /// Writes the archive trailer. After this, the output holds a complete archive.
    async fn finish(self) -> Result<Self::Output>;
}
