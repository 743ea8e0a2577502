// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub(crate) mod date;
pub(crate) mod pending;
pub(crate) mod write;

use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind};

use futures_lite::io::Cursor;

use crate::content::ByteStream;
use crate::disk::{Disk, DiskWriter};

/// Initialize the logger for testing.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A read-only disk over an in-memory map of keys to bytes.
#[derive(Debug, Default)]
pub(crate) struct FixtureDisk {
    files: HashMap<String, Vec<u8>>,
}

impl FixtureDisk {
    pub(crate) fn with_file(mut self, key: &str, data: &[u8]) -> Self {
        self.files.insert(key.to_owned(), data.to_vec());
        self
    }
}

impl Disk for FixtureDisk {
    fn exists(&self, key: &str) -> bool {
        self.files.contains_key(key) || self.is_directory(key)
    }

    fn all_directories(&self) -> HashSet<String> {
        let mut directories = HashSet::new();

        for key in self.files.keys() {
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
        match self.files.get(key) {
            Some(data) => Ok(Box::new(Cursor::new(data.clone()))),
            None => Err(Error::new(ErrorKind::NotFound, key.to_owned())),
        }
    }

    fn write_stream(&self, _key: &str) -> std::io::Result<DiskWriter> {
        Err(Error::new(ErrorKind::Unsupported, "fixture disks are read-only"))
    }
}
