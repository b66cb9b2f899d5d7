// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod credentials;
pub mod server;

pub use credentials::{
    default_key_file_path, load_credentials, CredentialSource, Credentials, EnvCredentials,
    ServiceAccountKey,
};
pub use server::{default_origins, parse_origins, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
