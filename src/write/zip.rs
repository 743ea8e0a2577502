// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use async_zip::base::write::ZipFileWriter;
use async_zip::{DeflateOption, ZipDateTime, ZipEntryBuilder};
use chrono::DateTime;
use futures_lite::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::date::Timestamp;
use crate::error::{Result, ZipStreamError};
use crate::opts::{ArchiveOptions, Compression};
use crate::write::{ArchiveWriter, DirectoryRecord, FileRecord};

const CHUNK_SIZE: usize = 64 * 1024;

const DIRECTORY_MODE: u16 = 0o40755;
const FILE_MODE: u16 = 0o100644;

// The MS-DOS date range representable in ZIP headers (1980-01-01 to 2107-12-31 23:59:58, UTC).
const DOS_MIN_SECONDS: i64 = 315_532_800;
const DOS_MAX_SECONDS: i64 = 4_354_819_198;

/// An [`ArchiveWriter`] which encodes entries with `async_zip` into any [`AsyncWrite`] sink.
///
/// Per-entry overrides left unset fall back to the [`ArchiveOptions`] the writer was opened with, and unset
/// modification dates fall back to the moment the writer was opened.
///
/// Zero-header mode streams an entry with a trailing data descriptor, so its bytes are never held in memory. Without
/// it, one entry's bytes are read fully so that sizes and CRC can be placed in the local file header.
pub struct ZipArchiveWriter<W: AsyncWrite + Unpin> {
    inner: ZipFileWriter<W>,
    defaults: ArchiveOptions,
    opened_at: Timestamp,
}

impl<W: AsyncWrite + Unpin> ZipArchiveWriter<W> {
    /// Opens a writer over `sink` with `defaults` applied to every entry which does not override them.
    pub fn open(sink: W, defaults: &ArchiveOptions) -> Self {
        let mut inner = ZipFileWriter::new(sink);

        if !defaults.comment.is_empty() {
            inner.comment(defaults.comment.clone());
        }

        Self { inner, defaults: defaults.clone(), opened_at: Timestamp::now() }
    }

    pub fn defaults(&self) -> &ArchiveOptions {
        &self.defaults
    }

    fn entry_builder(
        &self,
        filename: String,
        compression: Compression,
        comment: &str,
        last_modified: Option<Timestamp>,
        mode: u16,
    ) -> ZipEntryBuilder {
        let modified = dos_date_time(last_modified.unwrap_or(self.opened_at));

        ZipEntryBuilder::new(filename.into(), compression.into())
            .comment(comment.to_owned().into())
            .last_modification_date(modified)
            .unix_permissions(mode)
    }

    #[tracing::instrument(skip(self, record), fields(path = record.path))]
    async fn write_directory(&mut self, record: DirectoryRecord<'_>) -> Result<()> {
        let filename = format!("{}/", record.path.trim_end_matches('/'));
        let builder =
            self.entry_builder(filename, Compression::Store, record.comment, record.last_modified, DIRECTORY_MODE);

        self.inner.write_entry_whole(builder, &[]).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, record), fields(path = record.path))]
    async fn write_file(&mut self, record: FileRecord<'_>) -> Result<()> {
        let compression = record.compression.unwrap_or(self.defaults.compression);
        let level = record.deflate_level.unwrap_or(self.defaults.deflate_level);
        let zero_header = record.zero_header.unwrap_or(self.defaults.zero_header);

        let mut builder =
            self.entry_builder(record.path.to_owned(), compression, record.comment, record.last_modified, FILE_MODE);
        if compression == Compression::Deflate {
            builder = builder.deflate_option(DeflateOption::Other(i32::from(level)));
        }

        let mut reader = record.content.open().await?;

        if zero_header {
            let mut entry_writer = self.inner.write_entry_stream(builder).await?;
            let written = pump(record.path, &mut reader, &mut entry_writer).await?;
            entry_writer.close().await?;

            tracing::trace!(written, "streamed entry with data descriptor");
        } else {
            let mut data = Vec::new();
            reader.read_to_end(&mut data).await.map_err(|err| ZipStreamError::streaming(record.path, err))?;
            self.inner.write_entry_whole(builder, &data).await?;

            tracing::trace!(written = data.len(), "wrote whole entry");
        }

        Ok(())
    }
}

impl<W: AsyncWrite + Unpin> ArchiveWriter for ZipArchiveWriter<W> {
    type Output = W;

    async fn add_directory(&mut self, record: DirectoryRecord<'_>) -> Result<()> {
        self.write_directory(record).await
    }

    async fn add_file(&mut self, record: FileRecord<'_>) -> Result<()> {
        self.write_file(record).await
    }

    async fn finish(self) -> Result<W> {
        Ok(self.inner.close().await?)
    }
}

// Copies one entry's bytes, attributing read failures to the entry and write failures to the sink.
async fn pump<R, W>(destination: &str, reader: &mut R, writer: &mut W) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; CHUNK_SIZE];
    let mut total = 0;

    loop {
        let read = reader.read(&mut buffer).await.map_err(|err| ZipStreamError::streaming(destination, err))?;
        if read == 0 {
            return Ok(total);
        }

        writer.write_all(&buffer[..read]).await?;
        total += read as u64;
    }
}

fn dos_date_time(timestamp: Timestamp) -> ZipDateTime {
    let seconds = timestamp.epoch_seconds().clamp(DOS_MIN_SECONDS, DOS_MAX_SECONDS);
    let clamped = DateTime::from_timestamp(seconds, 0).unwrap_or_default();

    ZipDateTime::from_chrono(&clamped)
}
