// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the helpdesk server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`HELPDESK_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use helpdesk_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::{Overlay, ServerConfigLayer};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub logging: LoggingConfig,
	pub storage: StorageConfig,
	pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`HELPDESK_SERVER_*`)
/// 2. Config file (`$HELPDESK_SERVER_CONFIG` or `/etc/helpdesk/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let layers = sources
		.iter()
		.map(|source| {
			debug!(source = source.name(), "loading configuration source");
			source.load()
		})
		.collect::<Result<Vec<_>, _>>()?;

	finalize(ServerConfigLayer::fold(layers))
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		database: layer.database.unwrap_or_default().finalize(),
		auth: layer.auth.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		storage: layer.storage.unwrap_or_default().finalize(),
		bootstrap_admin: layer.bootstrap.unwrap_or_default().finalize()?,
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		environment = %config.auth.environment,
		dev_mode = config.auth.dev_mode,
		attachments_dir = %config.storage.attachments_dir.display(),
		bootstrap_admin = config.bootstrap_admin.is_some(),
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.auth.dev_mode && config.auth.is_production() {
		return Err(ConfigError::Validation(
			"HELPDESK_SERVER_DEV_MODE=1 is set while HELPDESK_SERVER_ENVIRONMENT=production. \
			 This is a security risk. Remove HELPDESK_SERVER_DEV_MODE or set \
			 HELPDESK_SERVER_ENVIRONMENT to a non-production value."
				.to_string(),
		));
	}

	if config.http.port == 0 {
		return Err(invalid("http.port", "must be between 1 and 65535"));
	}
	if config.database.max_connections == 0 {
		return Err(invalid("database.max_connections", "must be at least 1"));
	}
	if config.storage.max_upload_bytes == 0 {
		return Err(invalid("storage.max_upload_bytes", "must be at least 1"));
	}
	if config.auth.access_token_ttl_minutes <= 0 {
		return Err(invalid("auth.access_token_ttl_minutes", "must be positive"));
	}
	if config.auth.refresh_token_ttl_days <= 0 {
		return Err(invalid("auth.refresh_token_ttl_days", "must be positive"));
	}

	Ok(())
}

fn invalid(key: &str, message: &str) -> ConfigError {
	ConfigError::InvalidValue {
		key: key.to_string(),
		message: message.to_string(),
	}
}
