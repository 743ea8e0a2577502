// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The archive builder: archive-level options, content staging and output.
//!
//! # Example
//! ```no_run
//! # use async_zipstream::{Builder, HasComment, HasFileOptions};
//! # use async_zipstream::error::ZipStreamError;
//! #
//! # async fn run() -> Result<(), ZipStreamError> {
//! let mut builder = Builder::default();
//!
//! builder
//!     .set_name("report")
//!     .store()
//!     .empty_directory("docs")?
//!     .add_raw_with("docs/readme.txt", "hello", |raw| raw.deflate().comment("generated"))?
//!     .add_local("/var/log/syslog", Some("logs/syslog"))?;
//!
//! let bytes = builder.output().await?;
//! #   Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures_lite::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::compat::TokioAsyncWriteCompatExt;

use crate::content::{Content, ContentProvider, Directory, DiskFile, LocalFile, Raw};
use crate::disk::{Disk, DiskRegistry};
use crate::error::Result;
use crate::opts::{ArchiveOptions, Compression, MAX_DEFLATE_LEVEL};
use crate::pending::Pending;
use crate::response::ZipResponse;
use crate::write::io::offset::CountingWriter;
use crate::write::{ArchiveWriter, ZipArchiveWriter};

const EXTENSION: &str = ".zip";
const DEFAULT_NAME: &str = "archive";

/// Builds one archive from staged content.
///
/// Content is verified as it is added; nothing is read until one of the output operations runs. Output operations
/// borrow the builder mutably and may be repeated, each producing a fresh archive from the same staged content.
#[derive(Debug)]
pub struct Builder {
    filename: String,
    options: ArchiveOptions,
    pending: Pending,
    disks: DiskRegistry,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(ArchiveOptions::default())
    }
}

impl Builder {
    /// Constructs a builder named `archive.zip` with the given archive defaults.
    pub fn new(options: ArchiveOptions) -> Self {
        let mut builder = Self { filename: String::new(), options, pending: Pending::new(), disks: DiskRegistry::new() };
        builder.set_name(DEFAULT_NAME);
        builder
    }

    /// Makes the disks of `registry` addressable by name.
    pub fn with_disks(mut self, registry: DiskRegistry) -> Self {
        self.disks = registry;
        self
    }

    /// Sets the archive's file name, appending `.zip` unless it already ends with it (in any case).
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let mut name = name.into();

        if !name.to_ascii_lowercase().ends_with(EXTENSION) {
            name.push_str(EXTENSION);
        }

        self.filename = name;
        self
    }

    pub fn name(&self) -> &str {
        &self.filename
    }

    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    /// Sets the archive comment.
    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.options.comment = comment.into();
        self
    }

    /// Sets the default compression method.
    pub fn compression(&mut self, compression: Compression) -> &mut Self {
        self.options.compression = compression;
        self
    }

    pub fn store(&mut self) -> &mut Self {
        self.compression(Compression::Store)
    }

    pub fn deflate(&mut self) -> &mut Self {
        self.compression(Compression::Deflate)
    }

    /// Sets the default deflate level; values above 9 are clamped.
    pub fn deflate_level(&mut self, level: u8) -> &mut Self {
        if level > MAX_DEFLATE_LEVEL {
            tracing::warn!(level, "deflate level out of range, clamping to {MAX_DEFLATE_LEVEL}");
        }

        self.options.deflate_level = level.min(MAX_DEFLATE_LEVEL);
        self
    }

    /// Sets whether entries are streamed with a data descriptor by default.
    pub fn zero_header(&mut self, enabled: bool) -> &mut Self {
        self.options.zero_header = enabled;
        self
    }

    pub fn with_zero_header(&mut self) -> &mut Self {
        self.zero_header(true)
    }

    pub fn without_zero_header(&mut self) -> &mut Self {
        self.zero_header(false)
    }

    /// Verifies and stages content.
    ///
    /// On failure nothing from this call is staged.
    pub fn add(&mut self, content: impl Into<Content>) -> Result<&mut Self> {
        self.pending.add(content)?;
        Ok(self)
    }

    /// Applies `modify` to `content` before staging it.
    pub fn add_with<C, F>(&mut self, content: C, modify: F) -> Result<&mut Self>
    where
        C: Into<Content>,
        F: FnOnce(C) -> C,
    {
        self.add(modify(content))
    }

    /// Resolves a provider and stages everything it yields.
    pub fn add_provider(&mut self, provider: impl ContentProvider + 'static) -> Result<&mut Self> {
        self.add(Content::provider(provider))
    }

    pub fn add_raw(&mut self, destination: &str, content: impl Into<Bytes>) -> Result<&mut Self> {
        self.add(Raw::new(destination, content))
    }

    pub fn add_raw_with<F>(&mut self, destination: &str, content: impl Into<Bytes>, modify: F) -> Result<&mut Self>
    where
        F: FnOnce(Raw) -> Raw,
    {
        self.add_with(Raw::new(destination, content), modify)
    }

    /// Stages a local file. The destination defaults to the file's name.
    pub fn add_local(&mut self, source: impl Into<PathBuf>, destination: Option<&str>) -> Result<&mut Self> {
        self.add(LocalFile::with_destination(source, destination))
    }

    pub fn add_local_with<F>(
        &mut self,
        source: impl Into<PathBuf>,
        destination: Option<&str>,
        modify: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(LocalFile) -> LocalFile,
    {
        self.add_with(LocalFile::with_destination(source, destination), modify)
    }

    /// Stages a file held by `disk`. The destination defaults to the last segment of `source`.
    pub fn add_disk_file(
        &mut self,
        disk: Arc<dyn Disk>,
        source: &str,
        destination: Option<&str>,
    ) -> Result<&mut Self> {
        self.add(DiskFile::with_destination(disk, source, destination))
    }

    pub fn add_disk_file_with<F>(
        &mut self,
        disk: Arc<dyn Disk>,
        source: &str,
        destination: Option<&str>,
        modify: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(DiskFile) -> DiskFile,
    {
        self.add_with(DiskFile::with_destination(disk, source, destination), modify)
    }

    /// Stages a file held by the disk registered as `disk`.
    pub fn add_named_disk_file(&mut self, disk: &str, source: &str, destination: Option<&str>) -> Result<&mut Self> {
        let disk = self.disks.get(disk)?;
        self.add_disk_file(disk, source, destination)
    }

    pub fn empty_directory(&mut self, directory: &str) -> Result<&mut Self> {
        self.add(Directory::new(directory))
    }

    pub fn empty_directory_with<F>(&mut self, directory: &str, modify: F) -> Result<&mut Self>
    where
        F: FnOnce(Directory) -> Directory,
    {
        self.add_with(Directory::new(directory), modify)
    }

    /// Writes the archive into `sink`, then closes and returns it.
    ///
    /// Every output operation runs this same sequence. If an entry fails to stream, the error is returned and whatever
    /// was already written stays in the sink.
    pub async fn build<W: AsyncWrite + Unpin>(&mut self, sink: W) -> Result<W> {
        self.build_into(sink, "writer").await
    }

    async fn build_into<W: AsyncWrite + Unpin>(&mut self, sink: W, kind: &'static str) -> Result<W> {
        tracing::debug!(name = %self.filename, entries = self.pending.len(), sink = kind, "building archive");

        let mut writer = ZipArchiveWriter::open(sink, &self.options);
        self.pending.process(&mut writer).await?;

        let mut sink = writer.finish().await?;
        sink.close().await?;

        Ok(sink)
    }

    /// Builds the archive in memory.
    pub async fn output(&mut self) -> Result<Vec<u8>> {
        self.build_into(Vec::new(), "memory").await
    }

    /// Builds the archive into a local file, creating missing parent directories. Returns the bytes written.
    pub async fn save_to_local(&mut self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::File::create(path).await?;

        let sink = self.build_into(CountingWriter::new(file.compat_write()), "local").await?;
        Ok(sink.written())
    }

    /// Builds the archive into `key` on `disk`. Returns the bytes written.
    pub async fn save_to_disk(&mut self, disk: &dyn Disk, key: &str) -> Result<u64> {
        let sink = self.build_into(CountingWriter::new(disk.write_stream(key)?), "disk").await?;
        Ok(sink.written())
    }

    /// Builds the archive into `key` on the disk registered as `disk`. Returns the bytes written.
    pub async fn save_to_named_disk(&mut self, disk: &str, key: &str) -> Result<u64> {
        let disk = self.disks.get(disk)?;
        self.save_to_disk(disk.as_ref(), key).await
    }

    /// Pushes the archive into `writer` as it is produced, closing it once the archive is complete.
    pub async fn stream_to<W: AsyncWrite + Unpin>(&mut self, writer: W) -> Result<()> {
        self.build_into(writer, "stream").await.map(drop)
    }

    /// Consumes the builder into a streamed download.
    ///
    /// The archive is produced by a task spawned on the current `tokio` runtime; this must be called from within one.
    pub fn into_response(self) -> ZipResponse {
        ZipResponse::spawn(self)
    }
}
