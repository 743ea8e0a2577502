// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use futures_lite::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::Result;
use crate::opts::Compression;
use crate::write::io::offset::CountingWriter;
use crate::write::{ArchiveWriter, DirectoryRecord, FileRecord};

/// What a [`Recorder`] saw for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Recorded {
    Directory(String),
    File { path: String, compression: Option<Compression>, deflate_level: Option<u8>, zero_header: Option<bool>, data: Vec<u8> },
}

impl Recorded {
    pub(crate) fn path(&self) -> &str {
        match self {
            Recorded::Directory(path) => path,
            Recorded::File { path, .. } => path,
        }
    }
}

/// An [`ArchiveWriter`] which records the records it is handed instead of encoding them.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    records: Vec<Recorded>,
}

impl ArchiveWriter for Recorder {
    type Output = Vec<Recorded>;

    async fn add_directory(&mut self, record: DirectoryRecord<'_>) -> Result<()> {
        self.records.push(Recorded::Directory(record.path.to_owned()));
        Ok(())
    }

    async fn add_file(&mut self, record: FileRecord<'_>) -> Result<()> {
        let mut data = Vec::new();
        let mut reader = record.content.open().await?;
        reader.read_to_end(&mut data).await?;

        self.records.push(Recorded::File {
            path: record.path.to_owned(),
            compression: record.compression,
            deflate_level: record.deflate_level,
            zero_header: record.zero_header,
            data,
        });

        Ok(())
    }

    async fn finish(self) -> Result<Vec<Recorded>> {
        Ok(self.records)
    }
}

#[tokio::test]
async fn counting_writer_counts_accepted_bytes() {
    let mut writer = CountingWriter::new(Vec::<u8>::new());

    writer.write_all(b"Lorem ipsum dolor sit amet").await.expect("failed to write");
    writer.write_all(b", consectetur adipiscing elit").await.expect("failed to write");
    writer.close().await.expect("failed to close");

    assert_eq!(55, writer.written());
}

#[tokio::test]
async fn counting_writer_starts_at_zero() {
    let writer = CountingWriter::new(Vec::<u8>::new());
    assert_eq!(0, writer.written());
}
