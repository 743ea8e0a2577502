// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The things which can become archive entries.
//!
//! Concrete entries are one of four kinds, each in its own module:
//! - [`Raw`]: in-memory bytes, a one-shot reader, or a producer invoked lazily at build time.
//! - [`LocalFile`]: a file on the local filesystem.
//! - [`DiskFile`]: a file held by a [`Disk`](crate::disk::Disk) collaborator.
//! - [`Directory`]: an empty directory record.
//!
//! Anything else can feed the archive by implementing [`ContentProvider`], which yields further [`Content`] when asked.

pub mod directory;
pub mod disk_file;
pub mod local;
pub mod raw;

pub use directory::Directory;
pub use disk_file::DiskFile;
pub use local::LocalFile;
pub use raw::{Raw, RawData};

use futures_lite::io::AsyncRead;

use crate::date::Timestamp;
use crate::error::{Result, ZipStreamError};
use crate::opts::{EntryOptions, HasComment};

/// An owned, boxed source of entry bytes.
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// The kind of a concrete entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Raw,
    LocalFile,
    DiskFile,
    Directory,
}

/// One concrete entry, ready to be verified and staged.
#[derive(Debug)]
pub enum Entry {
    Raw(Raw),
    LocalFile(LocalFile),
    DiskFile(DiskFile),
    Directory(Directory),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Raw(_) => EntryKind::Raw,
            Entry::LocalFile(_) => EntryKind::LocalFile,
            Entry::DiskFile(_) => EntryKind::DiskFile,
            Entry::Directory(_) => EntryKind::Directory,
        }
    }

    /// Returns the path this entry is written to inside the archive.
    pub fn destination(&self) -> &str {
        match self {
            Entry::Raw(raw) => raw.destination(),
            Entry::LocalFile(file) => file.destination(),
            Entry::DiskFile(file) => file.destination(),
            Entry::Directory(directory) => directory.destination(),
        }
    }

    pub fn options(&self) -> &EntryOptions {
        match self {
            Entry::Raw(raw) => raw.options(),
            Entry::LocalFile(file) => file.options(),
            Entry::DiskFile(file) => file.options(),
            Entry::Directory(directory) => directory.options(),
        }
    }

    pub fn comment(&self) -> &str {
        &self.options().comment
    }

    pub fn last_modified(&self) -> Option<Timestamp> {
        self.options().last_modified
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    /// Checks that the entry's source exists and has a supported shape.
    ///
    /// This only inspects metadata, never content, and may be called any number of times.
    pub fn verify(&self) -> Result<()> {
        if self.destination().is_empty() {
            return Err(ZipStreamError::EmptyDestination);
        }

        match self {
            Entry::Raw(raw) => raw.verify(),
            Entry::LocalFile(file) => file.verify(),
            Entry::DiskFile(file) => file.verify(),
            Entry::Directory(_) => Ok(()),
        }?;

        self.options().verify(self.destination())
    }

    /// Opens the entry's bytes. Directories carry no bytes and yield an empty stream.
    pub(crate) async fn stream(&mut self) -> Result<ByteStream> {
        match self {
            Entry::Raw(raw) => raw.stream(),
            Entry::LocalFile(file) => file.stream().await,
            Entry::DiskFile(file) => file.stream(),
            Entry::Directory(_) => Ok(Box::new(futures_lite::io::empty())),
        }
    }
}

impl From<Raw> for Entry {
    fn from(raw: Raw) -> Self {
        Entry::Raw(raw)
    }
}

impl From<LocalFile> for Entry {
    fn from(file: LocalFile) -> Self {
        Entry::LocalFile(file)
    }
}

impl From<DiskFile> for Entry {
    fn from(file: DiskFile) -> Self {
        Entry::DiskFile(file)
    }
}

impl From<Directory> for Entry {
    fn from(directory: Directory) -> Self {
        Entry::Directory(directory)
    }
}

/// An object which lazily yields further content when asked.
///
/// Providers are resolved once, while staging. A provider may yield other providers to any depth; yielding itself
/// (directly or transitively) never terminates and is the caller's responsibility to avoid.
pub trait ContentProvider {
    fn provide(self: Box<Self>) -> Result<Content>;
}

/// Anything which can be handed to a staging queue.
pub enum Content {
    Entry(Entry),
    Provider(Box<dyn ContentProvider>),
    Many(Vec<Content>),
}

impl Content {
    pub fn provider(provider: impl ContentProvider + 'static) -> Self {
        Content::Provider(Box::new(provider))
    }
}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Entry(entry) => f.debug_tuple("Entry").field(entry).finish(),
            Content::Provider(_) => f.write_str("Provider(..)"),
            Content::Many(many) => f.debug_tuple("Many").field(many).finish(),
        }
    }
}

impl From<Entry> for Content {
    fn from(entry: Entry) -> Self {
        Content::Entry(entry)
    }
}

impl From<Raw> for Content {
    fn from(raw: Raw) -> Self {
        Content::Entry(raw.into())
    }
}

impl From<LocalFile> for Content {
    fn from(file: LocalFile) -> Self {
        Content::Entry(file.into())
    }
}

impl From<DiskFile> for Content {
    fn from(file: DiskFile) -> Self {
        Content::Entry(file.into())
    }
}

impl From<Directory> for Content {
    fn from(directory: Directory) -> Self {
        Content::Entry(directory.into())
    }
}

impl From<Vec<Content>> for Content {
    fn from(many: Vec<Content>) -> Self {
        Content::Many(many)
    }
}

impl From<Box<dyn ContentProvider>> for Content {
    fn from(provider: Box<dyn ContentProvider>) -> Self {
        Content::Provider(provider)
    }
}

/// Normalises an archive path: forward slashes only, no leading slash, no empty or `.` segments.
pub(crate) fn normalize_destination(destination: &str) -> String {
    destination
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the last segment of a `/`-separated key.
pub(crate) fn base_name(key: &str) -> &str {
    key.trim_end_matches('/').rsplit('/').next().unwrap_or(key)
}
