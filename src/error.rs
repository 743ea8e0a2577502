// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which holds relevant error reporting structures/types.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// A Result type alias over ZipStreamError to minimise repetition.
pub type Result<V> = std::result::Result<V, ZipStreamError>;

/// Where a missing source was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    Local,
    Disk,
}

impl Display for SourceOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceOrigin::Local => f.write_str("local filesystem"),
            SourceOrigin::Disk => f.write_str("disk"),
        }
    }
}

/// An enum of possible errors and their descriptions.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipStreamError {
    #[error("file [{path}] not found on {origin}")]
    SourceNotFound { path: String, origin: SourceOrigin },
    #[error("unsupported input type [{shape}] for [{destination}], expected one of: bytes, string, reader or producer")]
    UnsupportedContentShape { destination: String, shape: &'static str },
    #[error("deflate level {level} for [{destination}] is outside of 0-9")]
    InvalidDeflateLevel { destination: String, level: u8 },
    #[error("an entry destination must not be empty")]
    EmptyDestination,

    #[error("no disk registered under the name '{0}'")]
    UnknownDisk(String),
    #[error("unable to parse '{0}' as a timestamp")]
    InvalidTimestamp(String),
    #[error("invalid value '{value}' for configuration key {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("the reader for [{destination}] was already consumed by an earlier build")]
    ContentConsumed { destination: String },
    #[error("unable to stream content for [{destination}]: {source}")]
    Streaming {
        destination: String,
        #[source]
        source: std::io::Error,
    },
    #[error("the archive writer returned an error: {0}")]
    Zip(#[from] async_zip::error::ZipError),
    #[error("an upstream writer returned an error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZipStreamError {
    /// Returns true if this error was raised while staging content, before any byte was written.
    pub fn is_verification(&self) -> bool {
        matches!(
            self,
            ZipStreamError::SourceNotFound { .. }
                | ZipStreamError::UnsupportedContentShape { .. }
                | ZipStreamError::InvalidDeflateLevel { .. }
                | ZipStreamError::EmptyDestination
        )
    }

    pub(crate) fn streaming(destination: &str, source: std::io::Error) -> Self {
        ZipStreamError::Streaming { destination: destination.to_owned(), source }
    }
}
