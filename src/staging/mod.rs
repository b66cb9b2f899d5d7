// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! On-disk staging for uploaded images and synthesized audio
//!
//! Every request writes at most two files: the uploaded image under
//! `temp/` and the MP3 under `output/`. Names are derived from the request
//! UUID so concurrent requests never collide.

pub mod sweeper;
pub mod transient;

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub use sweeper::{spawn_sweeper, sweep_stale};
pub use transient::TransientFile;

/// Subdirectory holding uploaded images
pub const INPUT_DIR: &str = "temp";
/// Subdirectory holding synthesized audio
pub const OUTPUT_DIR: &str = "output";

/// Longest extension kept from the client-supplied filename
const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct StagingArea {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            input_dir: root.join(INPUT_DIR),
            output_dir: root.join(OUTPUT_DIR),
        }
    }

    /// Create both staging directories if they do not exist
    pub async fn prepare(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.input_dir).await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        debug!(
            "Staging directories ready: {}, {}",
            self.input_dir.display(),
            self.output_dir.display()
        );
        Ok(())
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the uploaded image as `temp/{request_id}{ext}`.
    ///
    /// Only the extension of the client filename survives, and only if it is
    /// short and alphanumeric.
    pub async fn stage_input(
        &self,
        request_id: &Uuid,
        client_name: Option<&str>,
        data: &[u8],
    ) -> io::Result<TransientFile> {
        let name = format!("{}{}", request_id, sanitized_extension(client_name));
        let path = self.input_dir.join(name);
        tokio::fs::write(&path, data).await?;
        Ok(TransientFile::new(path))
    }

    /// Write synthesized audio as `output/output_{millis}_{request_id}.mp3`
    pub async fn stage_output(
        &self,
        request_id: &Uuid,
        generated_at: DateTime<Utc>,
        audio: &[u8],
    ) -> io::Result<TransientFile> {
        let name = format!(
            "output_{}_{}.mp3",
            generated_at.timestamp_millis(),
            request_id
        );
        let path = self.output_dir.join(name);
        tokio::fs::write(&path, audio).await?;
        Ok(TransientFile::new(path))
    }
}

fn sanitized_extension(client_name: Option<&str>) -> String {
    client_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}
