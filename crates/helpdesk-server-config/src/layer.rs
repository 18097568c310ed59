// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The partial configuration each source produces.
//!
//! Every field of a [`ServerConfigLayer`] is optional. Sources are folded
//! lowest precedence first, and only the folded layer is resolved against
//! built-in defaults.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::sections::{
	AuthConfigLayer, BootstrapConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer,
	StorageConfigLayer,
};

/// A partial section that a higher-precedence source can be laid over.
pub trait Overlay {
	/// Replaces every value that `upper` sets.
	fn overlay(&mut self, upper: Self);
}

macro_rules! overlay_sections {
	($($section:ty),* $(,)?) => {
		$(
			impl Overlay for $section {
				fn overlay(&mut self, upper: Self) {
					self.merge(upper);
				}
			}
		)*
	};
}

overlay_sections!(
	HttpConfigLayer,
	DatabaseConfigLayer,
	AuthConfigLayer,
	LoggingConfigLayer,
	StorageConfigLayer,
	BootstrapConfigLayer,
);

impl<T: Overlay> Overlay for Option<T> {
	fn overlay(&mut self, upper: Self) {
		let Some(upper) = upper else {
			return;
		};
		match self {
			Some(lower) => lower.overlay(upper),
			None => *self = Some(upper),
		}
	}
}

/// Sections mirror the `[http]`, `[database]`, `[auth]`, `[logging]`,
/// `[storage]` and `[bootstrap]` tables of the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub storage: Option<StorageConfigLayer>,
	#[serde(default)]
	pub bootstrap: Option<BootstrapConfigLayer>,
}

impl ServerConfigLayer {
	/// Parses a config file body. `origin` is only used in the error.
	pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|source| ConfigError::TomlParse {
			path: origin.to_path_buf(),
			source,
		})
	}

	/// Folds layers given lowest precedence first.
	pub fn fold(layers: impl IntoIterator<Item = ServerConfigLayer>) -> Self {
		layers.into_iter().fold(Self::default(), |mut acc, layer| {
			acc.merge(layer);
			acc
		})
	}

	/// Lays `upper` over this layer.
	pub fn merge(&mut self, upper: ServerConfigLayer) {
		self.http.overlay(upper.http);
		self.database.overlay(upper.database);
		self.auth.overlay(upper.auth);
		self.logging.overlay(upper.logging);
		self.storage.overlay(upper.storage);
		self.bootstrap.overlay(upper.bootstrap);
	}
}
