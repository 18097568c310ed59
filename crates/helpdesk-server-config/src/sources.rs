// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file, and environment
//! variables.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, BootstrapConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LogFormat,
	LoggingConfigLayer, StorageConfigLayer,
};

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "HELPDESK_SERVER_CONFIG";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/helpdesk/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// `$HELPDESK_SERVER_CONFIG`, else `/etc/helpdesk/server.toml`.
	pub fn system() -> Self {
		match env_var(CONFIG_PATH_ENV) {
			Some(path) => Self::new(path),
			None => Self::new(SYSTEM_CONFIG_PATH),
		}
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer = ServerConfigLayer::from_toml(&content, &self.path)?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `HELPDESK_SERVER_<FIELD>`. Secrets may also be supplied as
/// `<NAME>_FILE` pointing at a file holding the value.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_lookup(&|name| std::env::var(name).ok())
	}
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn layer_from_lookup(lookup: Lookup<'_>) -> Result<ServerConfigLayer, ConfigError> {
	let get = |name: &str| lookup(name).filter(|s| !s.is_empty());

	let http = HttpConfigLayer {
		host: get("HELPDESK_SERVER_HOST"),
		port: parse_var(lookup, "HELPDESK_SERVER_PORT")?,
		base_url: get("HELPDESK_SERVER_BASE_URL"),
	};

	let database = DatabaseConfigLayer {
		url: get("HELPDESK_SERVER_DATABASE_URL"),
		max_connections: parse_var(lookup, "HELPDESK_SERVER_DATABASE_MAX_CONNECTIONS")?,
	};

	let auth = AuthConfigLayer {
		access_token_ttl_minutes: parse_var(lookup, "HELPDESK_SERVER_ACCESS_TOKEN_TTL_MINUTES")?,
		refresh_token_ttl_days: parse_var(lookup, "HELPDESK_SERVER_REFRESH_TOKEN_TTL_DAYS")?,
		dev_mode: get("HELPDESK_SERVER_DEV_MODE").map(|v| parse_bool(&v)),
		environment: get("HELPDESK_SERVER_ENVIRONMENT"),
	};

	let logging = LoggingConfigLayer {
		level: get("HELPDESK_SERVER_LOG_LEVEL"),
		format: parse_var::<LogFormat>(lookup, "HELPDESK_SERVER_LOG_FORMAT")?,
	};

	let storage = StorageConfigLayer {
		attachments_dir: get("HELPDESK_SERVER_ATTACHMENTS_DIR").map(PathBuf::from),
		max_upload_bytes: parse_var(lookup, "HELPDESK_SERVER_MAX_UPLOAD_BYTES")?,
	};

	let bootstrap = BootstrapConfigLayer {
		admin_email: get("HELPDESK_SERVER_BOOTSTRAP_ADMIN_EMAIL"),
		admin_password: secret_var(lookup, "HELPDESK_SERVER_BOOTSTRAP_ADMIN_PASSWORD")?,
		admin_first_name: get("HELPDESK_SERVER_BOOTSTRAP_ADMIN_FIRST_NAME"),
		admin_last_name: get("HELPDESK_SERVER_BOOTSTRAP_ADMIN_LAST_NAME"),
	};

	Ok(ServerConfigLayer {
		http: Some(http),
		database: Some(database),
		auth: Some(auth),
		logging: Some(logging),
		storage: Some(storage),
		bootstrap: Some(bootstrap),
	})
}

pub(crate) fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_bool(value: &str) -> bool {
	value.eq_ignore_ascii_case("true") || value == "1"
}

fn parse_var<T>(lookup: Lookup<'_>, name: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
{
	match lookup(name).filter(|s| !s.is_empty()) {
		Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("cannot parse '{v}'"),
		}),
		None => Ok(None),
	}
}

/// Reads `NAME_FILE` first, then `NAME`.
fn secret_var(lookup: Lookup<'_>, name: &str) -> Result<Option<String>, ConfigError> {
	let file_var = format!("{name}_FILE");
	if let Some(path) = lookup(&file_var) {
		if path.is_empty() {
			return Err(ConfigError::Secret(format!("{file_var} is set but empty")));
		}
		let content = std::fs::read_to_string(&path)
			.map_err(|e| ConfigError::Secret(format!("{file_var}: cannot read {path}: {e}")))?;
		return Ok(Some(
			content.strip_suffix('\n').unwrap_or(&content).to_string(),
		));
	}
	Ok(lookup(name).filter(|s| !s.is_empty()))
}
