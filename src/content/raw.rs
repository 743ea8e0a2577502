// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use futures_lite::io::{AsyncRead, Cursor};

use crate::content::{normalize_destination, ByteStream};
use crate::error::{Result, ZipStreamError};
use crate::opts::{EntryOptions, HasComment, HasFileOptions, HasLastModified};

type Producer = Arc<dyn Fn() -> std::io::Result<RawData> + Send + Sync>;

/// The value a raw content producer resolves to.
pub enum RawData {
    Bytes(Bytes),
    Reader(ByteStream),
}

impl RawData {
    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        RawData::Reader(Box::new(reader))
    }
}

impl From<Bytes> for RawData {
    fn from(bytes: Bytes) -> Self {
        RawData::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RawData {
    fn from(bytes: Vec<u8>) -> Self {
        RawData::Bytes(bytes.into())
    }
}

impl From<String> for RawData {
    fn from(string: String) -> Self {
        RawData::Bytes(string.into())
    }
}

impl From<&'static str> for RawData {
    fn from(string: &'static str) -> Self {
        RawData::Bytes(string.into())
    }
}

enum RawContent {
    Bytes(Bytes),
    // Taken by the first build which streams it. The mutex keeps entries `Sync` without requiring it of readers.
    Reader(Mutex<Option<ByteStream>>),
    Producer(Producer),
    Unsupported(&'static str),
}

/// An entry whose content is supplied directly by the caller.
pub struct Raw {
    destination: String,
    content: RawContent,
    options: EntryOptions,
}

impl Raw {
    /// Constructs an entry from in-memory bytes (`&'static str`, `String`, `Vec<u8>`, [`Bytes`], ...).
    pub fn new(destination: impl AsRef<str>, content: impl Into<Bytes>) -> Self {
        Self::with_content(destination, RawContent::Bytes(content.into()))
    }

    /// Constructs an entry from a reader.
    ///
    /// A reader can only be streamed once; building the same archive a second time fails with
    /// [`ZipStreamError::ContentConsumed`].
    pub fn from_reader(destination: impl AsRef<str>, reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::with_content(destination, RawContent::Reader(Mutex::new(Some(Box::new(reader)))))
    }

    /// Constructs an entry from a producer which is only invoked once the archive writer is ready for its bytes.
    ///
    /// The producer runs again on every build.
    pub fn from_producer<F>(destination: impl AsRef<str>, producer: F) -> Self
    where
        F: Fn() -> std::io::Result<RawData> + Send + Sync + 'static,
    {
        Self::with_content(destination, RawContent::Producer(Arc::new(producer)))
    }

    /// Constructs an entry from an untyped value, as handed over by plug-in content generators.
    ///
    /// Byte-like values (`Vec<u8>`, `String`, `&'static str`, `&'static [u8]`, [`Bytes`]) and [`RawData`] are
    /// accepted. Any other type is kept as an unsupported shape and rejected by [`Raw::verify`].
    pub fn from_value<T: Any + Send>(destination: impl AsRef<str>, value: T) -> Self {
        let shape = std::any::type_name::<T>();
        let value: Box<dyn Any + Send> = Box::new(value);

        let value = match value.downcast::<Vec<u8>>() {
            Ok(bytes) => return Self::new(destination, *bytes),
            Err(value) => value,
        };
        let value = match value.downcast::<String>() {
            Ok(string) => return Self::new(destination, *string),
            Err(value) => value,
        };
        let value = match value.downcast::<&'static str>() {
            Ok(string) => return Self::new(destination, *string),
            Err(value) => value,
        };
        let value = match value.downcast::<&'static [u8]>() {
            Ok(bytes) => return Self::new(destination, *bytes),
            Err(value) => value,
        };
        let value = match value.downcast::<Bytes>() {
            Ok(bytes) => return Self::new(destination, *bytes),
            Err(value) => value,
        };

        match value.downcast::<RawData>() {
            Ok(data) => match *data {
                RawData::Bytes(bytes) => Self::new(destination, bytes),
                RawData::Reader(reader) => Self::with_content(destination, RawContent::Reader(Mutex::new(Some(reader)))),
            },
            Err(_) => Self::with_content(destination, RawContent::Unsupported(shape)),
        }
    }

    fn with_content(destination: impl AsRef<str>, content: RawContent) -> Self {
        Self { destination: normalize_destination(destination.as_ref()), content, options: EntryOptions::default() }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Changes the destination path inside the archive.
    pub fn rename(mut self, destination: impl AsRef<str>) -> Self {
        self.destination = normalize_destination(destination.as_ref());
        self
    }

    /// Describes the shape of the held content.
    pub fn shape(&self) -> &'static str {
        match &self.content {
            RawContent::Bytes(_) => "bytes",
            RawContent::Reader(_) => "reader",
            RawContent::Producer(_) => "producer",
            RawContent::Unsupported(shape) => shape,
        }
    }

    pub fn verify(&self) -> Result<()> {
        match self.content {
            RawContent::Unsupported(shape) => {
                Err(ZipStreamError::UnsupportedContentShape { destination: self.destination.clone(), shape })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn stream(&mut self) -> Result<ByteStream> {
        match &mut self.content {
            RawContent::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            RawContent::Reader(reader) => reader
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
                .ok_or_else(|| ZipStreamError::ContentConsumed { destination: self.destination.clone() }),
            RawContent::Producer(producer) => {
                tracing::trace!(destination = %self.destination, "invoking raw content producer");

                let produce = producer.as_ref();

                match produce().map_err(|err| ZipStreamError::streaming(&self.destination, err))? {
                    RawData::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes))),
                    RawData::Reader(reader) => Ok(reader),
                }
            }
            RawContent::Unsupported(shape) => {
                Err(ZipStreamError::UnsupportedContentShape { destination: self.destination.clone(), shape })
            }
        }
    }
}

impl Debug for Raw {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raw")
            .field("destination", &self.destination)
            .field("shape", &self.shape())
            .field("options", &self.options)
            .finish()
    }
}

impl HasComment for Raw {
    fn options(&self) -> &EntryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut EntryOptions {
        &mut self.options
    }
}

impl HasLastModified for Raw {}
impl HasFileOptions for Raw {}
