// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Periodic removal of orphaned staging files
//!
//! Request-scoped cleanup handles the normal path. The sweeper catches
//! whatever a crash or an aborted write left behind.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::StagingArea;

/// Delete staged files older than `max_age` from both staging directories.
///
/// Returns the number of files removed. Missing directories count as empty.
pub async fn sweep_stale(staging: &StagingArea, max_age: Duration) -> usize {
    let mut removed = 0;
    for dir in [staging.input_dir(), staging.output_dir()] {
        match sweep_dir(dir, max_age).await {
            Ok(count) => removed += count,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to sweep {}: {}", dir.display(), e),
        }
    }
    removed
}

async fn sweep_dir(dir: &Path, max_age: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(m) if m.is_file() => m,
            _ => continue,
        };
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or(Duration::ZERO);
        if age < max_age {
            continue;
        }

        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => {
                debug!("Swept stale file {}", entry.path().display());
                removed += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to sweep {}: {}", entry.path().display(), e),
        }
    }

    Ok(removed)
}

/// Run [`sweep_stale`] every `interval` until the task is aborted
pub fn spawn_sweeper(
    staging: Arc<StagingArea>,
    interval: Duration,
    max_age: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            timer.tick().await;
            let removed = sweep_stale(&staging, max_age).await;
            if removed > 0 {
                info!("Staging sweep removed {} stale file(s)", removed);
            }
        }
    })
}
