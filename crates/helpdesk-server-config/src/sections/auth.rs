// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration.

use serde::Deserialize;

const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub access_token_ttl_minutes: i64,
	pub refresh_token_ttl_days: i64,
	pub dev_mode: bool,
	pub environment: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			access_token_ttl_minutes: DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
			refresh_token_ttl_days: DEFAULT_REFRESH_TOKEN_TTL_DAYS,
			dev_mode: false,
			environment: "development".to_string(),
		}
	}
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub access_token_ttl_minutes: Option<i64>,
	#[serde(default)]
	pub refresh_token_ttl_days: Option<i64>,
	#[serde(default)]
	pub dev_mode: Option<bool>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.access_token_ttl_minutes.is_some() {
			self.access_token_ttl_minutes = other.access_token_ttl_minutes;
		}
		if other.refresh_token_ttl_days.is_some() {
			self.refresh_token_ttl_days = other.refresh_token_ttl_days;
		}
		if other.dev_mode.is_some() {
			self.dev_mode = other.dev_mode;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			access_token_ttl_minutes: self
				.access_token_ttl_minutes
				.unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
			refresh_token_ttl_days: self
				.refresh_token_ttl_days
				.unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_DAYS),
			dev_mode: self.dev_mode.unwrap_or(false),
			environment: self
				.environment
				.unwrap_or_else(|| "development".to_string()),
		}
	}
}
