// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for helpdesk-server.

pub mod auth;
pub mod bootstrap;
pub mod database;
pub mod http;
pub mod logging;
pub mod storage;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use bootstrap::{BootstrapAdminConfig, BootstrapConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use storage::{StorageConfig, StorageConfigLayer};
