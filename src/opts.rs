// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Archive-level defaults, per-entry overrides and the fluent setters shared by every content kind.
//!
//! Per-entry options are layered over [`ArchiveOptions`]: a `None` field in [`EntryOptions`] means "inherit the
//! archive default" and is passed through to the archive writer as-is, never flattened while staging.

use std::sync::{Mutex, PoisonError};

use crate::date::Timestamp;
use crate::error::{Result, ZipStreamError};

/// The deflate level used when neither the archive nor the entry sets one.
pub const DEFAULT_DEFLATE_LEVEL: u8 = 6;

/// The highest accepted deflate level.
pub const MAX_DEFLATE_LEVEL: u8 = 9;

/// A compression method supported by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    Store,
    Deflate,
}

impl Compression {
    /// Converts a ZIP compression method identifier into a supported method.
    pub fn from_method_id(id: u16) -> Option<Self> {
        match id {
            0 => Some(Compression::Store),
            8 => Some(Compression::Deflate),
            _ => None,
        }
    }

    /// Parses a method name (`STORE`/`DEFLATE`, case-insensitive) or its numeric identifier.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        if value.eq_ignore_ascii_case("store") || value.eq_ignore_ascii_case("stored") {
            return Some(Compression::Store);
        }
        if value.eq_ignore_ascii_case("deflate") || value.eq_ignore_ascii_case("deflated") {
            return Some(Compression::Deflate);
        }

        value.parse::<u16>().ok().and_then(Compression::from_method_id)
    }
}

impl From<Compression> for async_zip::Compression {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Store => async_zip::Compression::Stored,
            Compression::Deflate => async_zip::Compression::Deflate,
        }
    }
}

/// Metadata overrides for a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryOptions {
    pub comment: String,
    pub compression: Option<Compression>,
    pub deflate_level: Option<u8>,
    pub last_modified: Option<Timestamp>,
    pub zero_header: Option<bool>,
}

impl EntryOptions {
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn set_compression(&mut self, compression: Option<Compression>) {
        self.compression = compression;
    }

    pub fn set_deflate_level(&mut self, level: Option<u8>) {
        self.deflate_level = level;
    }

    pub fn set_last_modified(&mut self, timestamp: Option<Timestamp>) {
        self.last_modified = timestamp;
    }

    pub fn set_zero_header(&mut self, enabled: Option<bool>) {
        self.zero_header = enabled;
    }

    /// Checks the overrides which cannot be rejected by the type system.
    pub(crate) fn verify(&self, destination: &str) -> Result<()> {
        match self.deflate_level {
            Some(level) if level > MAX_DEFLATE_LEVEL => {
                Err(ZipStreamError::InvalidDeflateLevel { destination: destination.to_owned(), level })
            }
            _ => Ok(()),
        }
    }
}

/// Fluent setters for content which carries a comment.
pub trait HasComment: Sized {
    fn options(&self) -> &EntryOptions;
    fn options_mut(&mut self) -> &mut EntryOptions;

    /// Sets the entry comment.
    fn comment(mut self, comment: impl Into<String>) -> Self {
        self.options_mut().set_comment(comment);
        self
    }
}

/// Fluent setters for content which carries a modification date.
pub trait HasLastModified: HasComment {
    /// Sets the modification date. Unset dates default to the moment the archive is built.
    fn last_modified(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.options_mut().set_last_modified(Some(timestamp.into()));
        self
    }

    /// Clears a previously set modification date.
    fn clear_last_modified(mut self) -> Self {
        self.options_mut().set_last_modified(None);
        self
    }
}

/// Fluent setters for content which produces file bytes.
pub trait HasFileOptions: HasLastModified {
    /// Sets the compression method, or `None` to inherit the archive default.
    fn compression(mut self, compression: Option<Compression>) -> Self {
        self.options_mut().set_compression(compression);
        self
    }

    fn store(self) -> Self {
        self.compression(Some(Compression::Store))
    }

    fn deflate(self) -> Self {
        self.compression(Some(Compression::Deflate))
    }

    /// Sets the deflate level (0-9), or `None` to inherit the archive default.
    fn deflate_level(mut self, level: Option<u8>) -> Self {
        self.options_mut().set_deflate_level(level);
        self
    }

    /// Sets zero-header mode, or `None` to inherit the archive default.
    fn zero_header(mut self, enabled: Option<bool>) -> Self {
        self.options_mut().set_zero_header(enabled);
        self
    }

    fn with_zero_header(self) -> Self {
        self.zero_header(Some(true))
    }

    fn without_zero_header(self) -> Self {
        self.zero_header(Some(false))
    }
}

/// Archive-wide defaults applied to entries which do not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub comment: String,
    pub compression: Compression,
    pub deflate_level: u8,
    pub zero_header: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            comment: String::new(),
            compression: Compression::Deflate,
            deflate_level: DEFAULT_DEFLATE_LEVEL,
            zero_header: true,
        }
    }
}

impl ArchiveOptions {
    pub const COMPRESSION_KEY: &'static str = "ZIPSTREAM_COMPRESSION_METHOD";
    pub const DEFLATE_LEVEL_KEY: &'static str = "ZIPSTREAM_DEFLATE_LEVEL";
    pub const ZERO_HEADER_KEY: &'static str = "ZIPSTREAM_ENABLE_ZERO_HEADER";

    /// Loads defaults from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads defaults from an arbitrary key lookup.
    ///
    /// Missing or empty values keep the built-in default; present but unparsable values are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = value(Self::COMPRESSION_KEY) {
            options.compression = Compression::parse(&raw).ok_or_else(|| invalid(Self::COMPRESSION_KEY, raw))?;
        }

        if let Some(raw) = value(Self::DEFLATE_LEVEL_KEY) {
            options.deflate_level = match raw.trim().parse::<u8>() {
                Ok(level) if level <= MAX_DEFLATE_LEVEL => level,
                _ => return Err(invalid(Self::DEFLATE_LEVEL_KEY, raw)),
            };
        }

        if let Some(raw) = value(Self::ZERO_HEADER_KEY) {
            options.zero_header = parse_bool(&raw).ok_or_else(|| invalid(Self::ZERO_HEADER_KEY, raw))?;
        }

        Ok(options)
    }
}

fn invalid(key: &'static str, value: String) -> ZipStreamError {
    ZipStreamError::InvalidConfig { key, value }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// An explicit, clearable memo of loaded [`ArchiveOptions`].
///
/// Every call hands out a clone, so mutating the options of one builder never affects another.
#[derive(Debug, Default)]
pub struct OptionsCache {
    loaded: Mutex<Option<ArchiveOptions>>,
}

impl OptionsCache {
    pub const fn new() -> Self {
        Self { loaded: Mutex::new(None) }
    }

    /// Returns the cached options, running `load` only if nothing is cached yet.
    ///
    /// A failed load caches nothing.
    pub fn get_or_load<F>(&self, load: F) -> Result<ArchiveOptions>
    where
        F: FnOnce() -> Result<ArchiveOptions>,
    {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(options) = loaded.as_ref() {
            return Ok(options.clone());
        }

        let options = load()?;
        tracing::debug!(?options, "loaded archive defaults");
        *loaded = Some(options.clone());

        Ok(options)
    }

    /// Returns the cached options, loading them from the process environment on first use.
    pub fn get_or_load_env(&self) -> Result<ArchiveOptions> {
        self.get_or_load(ArchiveOptions::from_env)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Forgets the cached options so the next call loads them again.
    pub fn clear(&self) {
        *self.loaded.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
