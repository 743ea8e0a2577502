// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The staging queue of verified, fully resolved entries awaiting assembly.
//!
//! Staging flattens providers with an explicit work-list rather than recursion, so arbitrarily deep provider graphs
//! cannot exhaust the stack. Every concrete entry is verified as it is reached; a single failure rejects everything
//! the same `add` call would have staged, leaving the queue as it was.
//!
//! Processing emits all directories first and then all files, each group in insertion order.

use crate::content::{Content, Entry};
use crate::error::Result;
use crate::write::{ArchiveWriter, ByteProducer, DirectoryRecord, FileRecord};

/// An ordered queue of verified entries.
#[derive(Debug, Default)]
pub struct Pending {
    entries: Vec<Entry>,
}

impl Pending {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves, verifies and stages `content`, returning the number of entries staged.
    ///
    /// Providers are resolved immediately and depth-first, preserving the order in which they yield content.
    pub fn add(&mut self, content: impl Into<Content>) -> Result<usize> {
        let mut staged = Vec::new();
        let mut stack = vec![content.into()];

        while let Some(content) = stack.pop() {
            match content {
                Content::Entry(entry) => {
                    entry.verify()?;
                    staged.push(entry);
                }
                Content::Provider(provider) => stack.push(provider.provide()?),
                Content::Many(many) => stack.extend(many.into_iter().rev()),
            }
        }

        for entry in &staged {
            tracing::trace!(destination = entry.destination(), kind = ?entry.kind(), "staged entry");
        }

        let count = staged.len();
        self.entries.append(&mut staged);

        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the staged entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the staged entries in the order they are written: directories first, then files.
    pub fn processing_order(&self) -> impl Iterator<Item = &Entry> {
        let directories = self.entries.iter().filter(|entry| entry.is_directory());
        let files = self.entries.iter().filter(|entry| !entry.is_directory());

        directories.chain(files)
    }

    /// Hands every staged entry to `writer`, directories first and then files.
    ///
    /// Unset per-entry options are passed as `None` so the writer applies its own defaults. File bytes are only
    /// opened when the writer asks for them. The queue is left intact and may be processed again.
    pub async fn process<W: ArchiveWriter>(&mut self, writer: &mut W) -> Result<()> {
        for entry in self.entries.iter().filter(|entry| entry.is_directory()) {
            let record = DirectoryRecord {
                path: entry.destination(),
                comment: entry.comment(),
                last_modified: entry.last_modified(),
            };

            writer.add_directory(record).await?;
        }

        for entry in self.entries.iter_mut().filter(|entry| !entry.is_directory()) {
            let options = entry.options().clone();
            let destination = entry.destination().to_owned();

            let record = FileRecord {
                path: &destination,
                comment: &options.comment,
                compression: options.compression,
                deflate_level: options.deflate_level,
                last_modified: options.last_modified,
                zero_header: options.zero_header,
                content: ByteProducer::new(entry),
            };

            writer.add_file(record).await?;
        }

        Ok(())
    }
}
