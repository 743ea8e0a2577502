// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! # async_zipstream
//!
//! An asynchronous crate for assembling ZIP archives on the fly from heterogeneous content and streaming them to any
//! sink, without holding the whole archive in memory.
//!
//! ## Features
//! - Content from in-memory bytes, one-shot readers, lazy producers, local files, virtual disks and empty directories.
//! - Lazy content providers which yield further content, flattened and verified when staged.
//! - Archive-wide defaults for compression, deflate level and zero-header mode with per-entry overrides.
//! - Output to memory, a local file, a virtual disk, any [`AsyncWrite`](futures_lite::io::AsyncWrite) sink or a
//!   streamed download.
//!
//! ## Example
//! ```no_run
//! # use async_zipstream::{Builder, HasComment, HasFileOptions, Raw};
//! # use async_zipstream::error::ZipStreamError;
//! #
//! # async fn run() -> Result<(), ZipStreamError> {
//! let mut builder = Builder::default();
//! builder.empty_directory("docs")?.add(Raw::new("docs/readme.txt", "hello").store())?;
//!
//! builder.save_to_local("./report.zip").await?;
//! #   Ok(())
//! # }
//! ```

pub mod builder;
pub mod content;
pub mod date;
pub mod disk;
pub mod error;
pub mod opts;
pub mod pending;
pub mod response;
pub mod write;

#[cfg(test)]
pub(crate) mod tests;

pub use crate::builder::Builder;
pub use crate::content::{ByteStream, Content, ContentProvider, Directory, DiskFile, Entry, EntryKind, LocalFile, Raw, RawData};
pub use crate::date::Timestamp;
pub use crate::disk::{Disk, DiskRegistry, LocalDisk};
pub use crate::opts::{ArchiveOptions, Compression, EntryOptions, HasComment, HasFileOptions, HasLastModified, OptionsCache};
pub use crate::pending::Pending;
pub use crate::response::ZipResponse;
