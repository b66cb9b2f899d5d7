// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request-scoped files that delete themselves

use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::io;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

/// A staged file whose lifetime is bounded by one request.
///
/// Removal is best-effort: failures are logged and never returned. A file
/// that is dropped without an explicit [`TransientFile::remove`] is deleted
/// synchronously in `Drop`.
#[derive(Debug)]
pub struct TransientFile {
    path: PathBuf,
    removed: bool,
}

impl TransientFile {
    /// Take ownership of an already-written file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            removed: false,
        }
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file, logging (not returning) any failure
    pub async fn remove(mut self) {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed transient file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove transient file {}: {}",
                self.path.display(),
                e
            ),
        }
    }

    /// Stream the file contents; the file is deleted once the stream is dropped.
    ///
    /// Used as a response body so the artifact disappears as soon as the
    /// body has been fully written out (or the client goes away).
    pub async fn into_stream(
        self,
    ) -> io::Result<impl Stream<Item = io::Result<Bytes>> + Send + 'static> {
        let file = tokio::fs::File::open(&self.path).await?;
        let guard = self;
        Ok(ReaderStream::new(file).map(move |chunk| {
            let _held = &guard;
            chunk
        }))
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        // Drop cannot await; a single unlink is short enough to block on
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed transient file {} on drop", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove transient file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
