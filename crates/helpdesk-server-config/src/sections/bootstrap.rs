// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! First administrator account, created at startup when no active
//! administrator exists.

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone)]
pub struct BootstrapAdminConfig {
	pub email: String,
	pub password: String,
	pub first_name: String,
	pub last_name: String,
}

impl std::fmt::Debug for BootstrapAdminConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BootstrapAdminConfig")
			.field("email", &self.email)
			.field("password", &"[REDACTED]")
			.field("first_name", &self.first_name)
			.field("last_name", &self.last_name)
			.finish()
	}
}

#[derive(Clone, Default, Deserialize)]
pub struct BootstrapConfigLayer {
	#[serde(default)]
	pub admin_email: Option<String>,
	#[serde(default)]
	pub admin_password: Option<String>,
	#[serde(default)]
	pub admin_first_name: Option<String>,
	#[serde(default)]
	pub admin_last_name: Option<String>,
}

impl std::fmt::Debug for BootstrapConfigLayer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BootstrapConfigLayer")
			.field("admin_email", &self.admin_email)
			.field(
				"admin_password",
				&self.admin_password.as_ref().map(|_| "[REDACTED]"),
			)
			.field("admin_first_name", &self.admin_first_name)
			.field("admin_last_name", &self.admin_last_name)
			.finish()
	}
}

impl BootstrapConfigLayer {
	pub fn merge(&mut self, other: BootstrapConfigLayer) {
		if other.admin_email.is_some() {
			self.admin_email = other.admin_email;
		}
		if other.admin_password.is_some() {
			self.admin_password = other.admin_password;
		}
		if other.admin_first_name.is_some() {
			self.admin_first_name = other.admin_first_name;
		}
		if other.admin_last_name.is_some() {
			self.admin_last_name = other.admin_last_name;
		}
	}

	/// Returns `None` when no bootstrap email is configured.
	///
	/// # Errors
	/// An email without a password is rejected.
	pub fn finalize(self) -> Result<Option<BootstrapAdminConfig>, ConfigError> {
		let Some(email) = self.admin_email else {
			return Ok(None);
		};
		let Some(password) = self.admin_password else {
			return Err(ConfigError::Validation(
				"HELPDESK_SERVER_BOOTSTRAP_ADMIN_EMAIL is set without \
				 HELPDESK_SERVER_BOOTSTRAP_ADMIN_PASSWORD"
					.to_string(),
			));
		};
		Ok(Some(BootstrapAdminConfig {
			email,
			password,
			first_name: self
				.admin_first_name
				.unwrap_or_else(|| "System".to_string()),
			last_name: self
				.admin_last_name
				.unwrap_or_else(|| "Administrator".to_string()),
		}))
	}
}
