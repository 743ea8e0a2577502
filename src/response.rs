// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A streamed download of an archive which is produced while it is being read.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_lite::Stream;
use pin_project::pin_project;
use tokio::io::DuplexStream;
use tokio::task::JoinHandle;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tokio_util::io::ReaderStream;

use crate::builder::Builder;
use crate::error::Result;

const PIPE_CAPACITY: usize = 64 * 1024;

pub const CONTENT_TYPE: &str = "application/x-zip";

/// The body of a download response, yielding archive bytes as the spawned build produces them.
///
/// The build is back-pressured by the consumer: it only advances as chunks are taken from the stream. Dropping the
/// response closes the pipe, after which the build fails on its next write and the task ends.
#[pin_project]
pub struct ZipResponse {
    filename: String,
    #[pin]
    body: ReaderStream<DuplexStream>,
    task: JoinHandle<Result<()>>,
}

impl ZipResponse {
    pub(crate) fn spawn(mut builder: Builder) -> Self {
        let (writer, reader) = tokio::io::duplex(PIPE_CAPACITY);
        let filename = builder.name().to_owned();

        let task = tokio::spawn(async move {
            let result = builder.stream_to(writer.compat_write()).await;

            if let Err(err) = &result {
                tracing::error!(name = %builder.name(), "failed to stream archive: {err}");
            }

            result
        });

        Self { filename, body: ReaderStream::new(reader), task }
    }

    /// The file name offered to the client, always ending in `.zip`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The headers describing this download.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", CONTENT_TYPE.to_owned()),
            ("Content-Disposition", format!("attachment; filename=\"{}\"", self.filename)),
            ("X-Accel-Buffering", "no".to_owned()),
        ]
    }

    /// Splits the response into its byte stream and the handle of the task producing it.
    ///
    /// The handle resolves to the build's result once the archive is complete, which is the only way to tell a
    /// truncated body from a finished one.
    pub fn into_parts(self) -> (ReaderStream<DuplexStream>, JoinHandle<Result<()>>) {
        (self.body, self.task)
    }
}

impl Stream for ZipResponse {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().body.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.body.size_hint()
    }
}

impl std::fmt::Debug for ZipResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipResponse").field("filename", &self.filename).finish_non_exhaustive()
    }
}
