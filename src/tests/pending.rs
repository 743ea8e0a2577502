// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::content::{Content, ContentProvider, Directory, LocalFile, Raw, RawData};
use crate::error::{Result, SourceOrigin, ZipStreamError};
use crate::opts::{Compression, HasFileOptions};
use crate::pending::Pending;
use crate::tests::init_logger;
use crate::tests::write::{Recorded, Recorder};
use crate::write::ArchiveWriter;

// Wraps a leaf entry in `depth` layers of providers.
struct Nested {
    depth: usize,
    leaf: &'static str,
}

impl ContentProvider for Nested {
    fn provide(self: Box<Self>) -> Result<Content> {
        if self.depth == 0 {
            return Ok(Raw::new(self.leaf, self.leaf).into());
        }

        Ok(Content::provider(Nested { depth: self.depth - 1, leaf: self.leaf }))
    }
}

struct Listing;

impl ContentProvider for Listing {
    fn provide(self: Box<Self>) -> Result<Content> {
        Ok(Content::Many(vec![
            Directory::new("listing").into(),
            Raw::new("listing/one.txt", "1").into(),
            Content::provider(Nested { depth: 1, leaf: "listing/two.txt" }),
            Raw::new("listing/three.txt", "3").into(),
        ]))
    }
}

struct Failing;

impl ContentProvider for Failing {
    fn provide(self: Box<Self>) -> Result<Content> {
        Err(ZipStreamError::UnknownDisk("assets".to_owned()))
    }
}

fn destinations(pending: &Pending) -> Vec<&str> {
    pending.entries().iter().map(|entry| entry.destination()).collect()
}

#[test]
fn directories_are_processed_before_files() {
    let mut pending = Pending::new();

    pending.add(Raw::new("a.txt", "a")).unwrap();
    pending.add(Directory::new("x")).unwrap();
    pending.add(Raw::new("b.txt", "b")).unwrap();
    pending.add(Directory::new("y")).unwrap();

    let order: Vec<&str> = pending.processing_order().map(|entry| entry.destination()).collect();
    assert_eq!(order, ["x", "y", "a.txt", "b.txt"]);
}

#[tokio::test]
async fn process_hands_entries_to_writer_in_order() {
    init_logger();

    let mut pending = Pending::new();
    pending.add(Raw::new("a.txt", "a")).unwrap();
    pending.add(Directory::new("x")).unwrap();

    let mut recorder = Recorder::default();
    pending.process(&mut recorder).await.unwrap();
    let records = recorder.finish().await.unwrap();

    let paths: Vec<&str> = records.iter().map(Recorded::path).collect();
    assert_eq!(paths, ["x", "a.txt"]);
}

#[test]
fn providers_are_flattened_at_any_depth() {
    for depth in [1, 2, 5] {
        let mut pending = Pending::new();

        let staged = pending.add(Content::provider(Nested { depth, leaf: "deep.txt" })).unwrap();

        assert_eq!(1, staged, "depth {depth}");
        assert_eq!(destinations(&pending), ["deep.txt"]);
    }
}

#[test]
fn provider_yield_order_is_preserved() {
    let mut pending = Pending::new();

    let staged = pending.add(Content::provider(Listing)).unwrap();

    assert_eq!(4, staged);
    assert_eq!(destinations(&pending), ["listing", "listing/one.txt", "listing/two.txt", "listing/three.txt"]);
}

#[test]
fn failed_add_stages_nothing() {
    let mut pending = Pending::new();
    pending.add(Raw::new("kept.txt", "kept")).unwrap();

    let batch = Content::Many(vec![
        Raw::new("first.txt", "first").into(),
        LocalFile::new("/nonexistent/zipstream/missing.txt").into(),
        Raw::new("last.txt", "last").into(),
    ]);
    let err = pending.add(batch).unwrap_err();

    assert!(matches!(err, ZipStreamError::SourceNotFound { origin: SourceOrigin::Local, .. }));
    assert!(err.is_verification());
    assert_eq!(destinations(&pending), ["kept.txt"]);
}

#[test]
fn failing_provider_stages_nothing() {
    let mut pending = Pending::new();

    let batch = Content::Many(vec![Raw::new("first.txt", "first").into(), Content::provider(Failing)]);
    let err = pending.add(batch).unwrap_err();

    assert!(matches!(err, ZipStreamError::UnknownDisk(name) if name == "assets"));
    assert!(pending.is_empty());
}

#[test]
fn duplicate_destinations_are_kept() {
    let mut pending = Pending::new();

    pending.add(Raw::new("same.txt", "one")).unwrap();
    pending.add(Raw::new("same.txt", "two")).unwrap();

    assert_eq!(2, pending.len());
}

#[tokio::test]
async fn unset_options_reach_the_writer_as_none() {
    let mut pending = Pending::new();
    pending.add(Raw::new("inherit.txt", "i")).unwrap();
    pending.add(Raw::new("override.txt", "o").store().deflate_level(Some(3)).without_zero_header()).unwrap();

    let mut recorder = Recorder::default();
    pending.process(&mut recorder).await.unwrap();
    let records = recorder.finish().await.unwrap();

    assert_eq!(
        records,
        [
            Recorded::File {
                path: "inherit.txt".to_owned(),
                compression: None,
                deflate_level: None,
                zero_header: None,
                data: b"i".to_vec()
            },
            Recorded::File {
                path: "override.txt".to_owned(),
                compression: Some(Compression::Store),
                deflate_level: Some(3),
                zero_header: Some(false),
                data: b"o".to_vec()
            },
        ]
    );
}

#[tokio::test]
async fn producers_run_only_when_their_entry_is_written() {
    let calls = Arc::new(AtomicUsize::new(0));
    let producer = {
        let calls = calls.clone();
        move || -> std::io::Result<RawData> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawData::from("produced"))
        }
    };

    let mut pending = Pending::new();
    pending.add(Raw::from_producer("lazy.txt", producer)).unwrap();
    assert_eq!(0, calls.load(Ordering::SeqCst));

    let mut recorder = Recorder::default();
    pending.process(&mut recorder).await.unwrap();
    assert_eq!(1, calls.load(Ordering::SeqCst));

    // The queue survives processing and runs the producer again.
    let mut recorder = Recorder::default();
    pending.process(&mut recorder).await.unwrap();
    assert_eq!(2, calls.load(Ordering::SeqCst));
}

#[tokio::test]
async fn consumed_reader_fails_second_pass() {
    let mut pending = Pending::new();
    pending.add(Raw::from_reader("once.txt", futures_lite::io::Cursor::new(b"once".to_vec()))).unwrap();

    let mut recorder = Recorder::default();
    pending.process(&mut recorder).await.unwrap();

    let mut recorder = Recorder::default();
    let err = pending.process(&mut recorder).await.unwrap_err();
    assert!(matches!(err, ZipStreamError::ContentConsumed { destination } if destination == "once.txt"));
}
