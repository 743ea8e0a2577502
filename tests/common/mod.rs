// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_zip::base::read::mem;
use async_zip::Compression;
use async_zipstream::disk::DiskWriter;
use async_zipstream::{ByteStream, Disk};
use futures_lite::io::{AsyncWrite, Cursor};

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
pub const DATA_DESCRIPTOR_FLAG: u16 = 1 << 3;

/// One entry as read back from a finished archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadEntry {
    pub name: String,
    pub dir: bool,
    pub compression: Compression,
    pub comment: String,
    pub year: i32,
    pub data: Vec<u8>,
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Reads every entry of an archive with `async_zip`, checking each entry's CRC.
pub async fn read_archive(zip_data: Vec<u8>) -> Vec<ReadEntry> {
    let zip = mem::ZipFileReader::new(zip_data).await.unwrap();
    let zip_entries: Vec<_> = zip.file().entries().to_vec();
    let mut entries = Vec::with_capacity(zip_entries.len());

    for (idx, entry) in zip_entries.into_iter().enumerate() {
        let mut data = Vec::new();
        let mut reader = zip.reader_with_entry(idx).await.unwrap();
        reader.read_to_end_checked(&mut data).await.unwrap();

        entries.push(ReadEntry {
            name: entry.filename().as_str().unwrap().to_owned(),
            dir: entry.dir().unwrap(),
            compression: entry.compression(),
            comment: entry.comment().as_str().unwrap().to_owned(),
            year: entry.last_modification_date().year(),
            data,
        });
    }

    entries
}

/// Reads the archive comment with `async_zip`.
pub async fn read_archive_comment(zip_data: Vec<u8>) -> String {
    let zip = mem::ZipFileReader::new(zip_data).await.unwrap();
    zip.file().comment().as_str().unwrap().to_owned()
}

/// Returns the general purpose flags of the local file header starting at `offset`.
pub fn local_header_flags(zip_data: &[u8], offset: usize) -> u16 {
    let signature = u32::from_le_bytes(zip_data[offset..offset + 4].try_into().unwrap());
    assert_eq!(LOCAL_FILE_HEADER_SIGNATURE, signature, "no local file header at offset {offset}");

    u16::from_le_bytes(zip_data[offset + 6..offset + 8].try_into().unwrap())
}

/// An in-memory disk which can be read from and written to.
#[derive(Debug, Clone, Default)]
pub struct MemoryDisk {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryDisk {
    pub fn with_file(self, key: &str, data: &[u8]) -> Self {
        self.files.lock().unwrap().insert(key.to_owned(), data.to_vec());
        self
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).cloned()
    }
}

impl Disk for MemoryDisk {
    fn exists(&self, key: &str) -> bool {
        let is_file = self.files.lock().unwrap().contains_key(key);
        is_file || self.is_directory(key)
    }

    fn all_directories(&self) -> HashSet<String> {
        let mut directories = HashSet::new();

        for key in self.files.lock().unwrap().keys() {
            let mut segments: Vec<&str> = key.split('/').collect();
            segments.pop();

            while !segments.is_empty() {
                directories.insert(segments.join("/"));
                segments.pop();
            }
        }

        directories
    }

    fn read_stream(&self, key: &str) -> std::io::Result<ByteStream> {
        match self.get(key) {
            Some(data) => Ok(Box::new(Cursor::new(data))),
            None => Err(Error::new(ErrorKind::NotFound, key.to_owned())),
        }
    }

    fn write_stream(&self, key: &str) -> std::io::Result<DiskWriter> {
        Ok(Box::new(MemoryWriter { key: key.to_owned(), buffer: Vec::new(), files: self.files.clone() }))
    }
}

// Buffers written bytes and stores them under its key once closed.
struct MemoryWriter {
    key: String,
    buffer: Vec<u8>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        self.get_mut().buffer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        this.files.lock().unwrap().insert(this.key.clone(), this.buffer.clone());
        Poll::Ready(Ok(()))
    }
}
