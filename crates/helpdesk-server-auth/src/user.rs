// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User identity types.
//!
//! - [`User`] - a helpdesk account with a single [`Role`] and an active flag
//! - [`UserSummary`] - the compact view embedded in tickets, comments, and attachments
//! - name and email validation shared by registration, profile updates, and provisioning

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;

/// A user in the system.
///
/// # PII Handling
///
/// `email`, `first_name`, and `last_name` are user-provided PII and should be
/// kept out of log fields; log the [`UserId`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,

	/// Login identity, stored lowercased and unique.
	pub email: String,

	pub first_name: String,

	pub last_name: String,

	/// Only an administrator may change this, and never their own.
	pub role: Role,

	/// Inactive users cannot authenticate and are skipped for assignment.
	pub is_active: bool,

	pub created_at: DateTime<Utc>,

	pub updated_at: DateTime<Utc>,

	pub last_login: Option<DateTime<Utc>>,
}

impl User {
	/// Builds a new active user with the given role. The caller persists it.
	pub fn new(
		email: impl Into<String>,
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		role: Role,
	) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			email: normalize_email(&email.into()),
			first_name: first_name.into(),
			last_name: last_name.into(),
			role,
			is_active: true,
			created_at: now,
			updated_at: now,
			last_login: None,
		}
	}

	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}

	pub fn is_system_admin(&self) -> bool {
		self.role == Role::SysAdmin
	}

	pub fn is_support(&self) -> bool {
		self.role == Role::Support
	}

	pub fn is_staff(&self) -> bool {
		self.role.is_staff()
	}

	/// Whether this user may hold a ticket assignment.
	pub fn is_assignable(&self) -> bool {
		self.is_active && self.is_staff()
	}

	pub fn to_summary(&self) -> UserSummary {
		UserSummary {
			id: self.id,
			email: self.email.clone(),
			full_name: self.full_name(),
			role: self.role,
		}
	}
}

/// Compact user view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
	pub id: UserId,
	pub email: String,
	pub full_name: String,
	pub role: Role,
}

/// Lowercases and trims an email address.
pub fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

/// Validates a first or last name after trimming.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
	let len = name.trim().chars().count();
	if len < NAME_MIN_CHARS {
		return Err("must be at least 2 characters");
	}
	if len > NAME_MAX_CHARS {
		return Err("must be at most 50 characters");
	}
	Ok(())
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
	let email = email.trim();
	let Some((local, domain)) = email.split_once('@') else {
		return Err("must be a valid email address");
	};
	if local.is_empty()
		|| domain.contains('@')
		|| !domain.contains('.')
		|| domain.starts_with('.')
		|| domain.ends_with('.')
		|| email.chars().any(char::is_whitespace)
	{
		return Err("must be a valid email address");
	}
	if email.len() > 254 {
		return Err("must be at most 254 characters");
	}
	Ok(())
}
