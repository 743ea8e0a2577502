// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::content::normalize_destination;
use crate::opts::{EntryOptions, HasComment, HasLastModified};

/// An empty directory record. Directories carry no bytes, only a comment and a modification date.
#[derive(Debug, Clone)]
pub struct Directory {
    destination: String,
    options: EntryOptions,
}

impl Directory {
    pub fn new(destination: impl AsRef<str>) -> Self {
        Self { destination: normalize_destination(destination.as_ref()), options: EntryOptions::default() }
    }

    /// Returns the directory path, without a trailing slash.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn rename(mut self, destination: impl AsRef<str>) -> Self {
        self.destination = normalize_destination(destination.as_ref());
        self
    }
}

impl HasComment for Directory {
    fn options(&self) -> &EntryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut EntryOptions {
        &mut self.options
    }
}

impl HasLastModified for Directory {}
