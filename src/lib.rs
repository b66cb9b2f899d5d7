// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod providers;
pub mod staging;
pub mod version;

pub use orchestrator::{UploadError, UploadOrchestrator, UploadRequest};
pub use providers::ProviderHandles;
