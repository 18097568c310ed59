// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared validation utilities for API handlers.
//!
//! Handlers collect every problem with a payload into [`FieldErrors`] before
//! rejecting it, so clients see all invalid fields in one response. Field
//! keys use the JSON (camelCase) names.

use std::collections::BTreeMap;
use std::str::FromStr;

use helpdesk_server_auth::{Role, TicketPriority, TicketStatus};

use crate::error::ServerError;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const COMMENT_MAX_CHARS: usize = 2000;
pub const CATEGORY_NAME_MIN_CHARS: usize = 2;
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// A single error on a single field.
	pub fn single(field: &str, message: impl Into<String>) -> Self {
		let mut errors = Self::new();
		errors.add(field, message);
		errors
	}

	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self.0.entry(field.to_string()).or_default().push(message.into());
	}

	/// Records `result`'s error, if any, under `field`.
	pub fn check(&mut self, field: &str, result: Result<(), impl Into<String>>) {
		if let Err(message) = result {
			self.add(field, message);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn contains(&self, field: &str) -> bool {
		self.0.contains_key(field)
	}

	/// `Ok(())` when empty, otherwise a validation error carrying every field.
	pub fn into_result(self) -> Result<(), ServerError> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(ServerError::Validation(self))
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		serde_json::to_value(&self.0).unwrap_or(serde_json::Value::Null)
	}
}

fn char_len(value: &str) -> usize {
	value.trim().chars().count()
}

pub fn validate_title(title: &str) -> Result<(), String> {
	let len = char_len(title);
	if len < TITLE_MIN_CHARS {
		return Err(format!("must be at least {TITLE_MIN_CHARS} characters"));
	}
	if len > TITLE_MAX_CHARS {
		return Err(format!("must be at most {TITLE_MAX_CHARS} characters"));
	}
	Ok(())
}

pub fn validate_description(description: &str) -> Result<(), String> {
	if char_len(description) < DESCRIPTION_MIN_CHARS {
		return Err(format!(
			"must be at least {DESCRIPTION_MIN_CHARS} characters"
		));
	}
	Ok(())
}

pub fn validate_comment_text(text: &str) -> Result<(), String> {
	let len = char_len(text);
	if len == 0 {
		return Err("must not be empty".to_string());
	}
	if len > COMMENT_MAX_CHARS {
		return Err(format!("must be at most {COMMENT_MAX_CHARS} characters"));
	}
	Ok(())
}

pub fn validate_category_name(name: &str) -> Result<(), String> {
	let len = char_len(name);
	if len < CATEGORY_NAME_MIN_CHARS {
		return Err(format!(
			"must be at least {CATEGORY_NAME_MIN_CHARS} characters"
		));
	}
	if len > CATEGORY_NAME_MAX_CHARS {
		return Err(format!(
			"must be at most {CATEGORY_NAME_MAX_CHARS} characters"
		));
	}
	Ok(())
}

fn parse_choice<T: FromStr>(value: &str, choices: &[T], as_str: fn(&T) -> &'static str) -> Result<T, String> {
	value.parse::<T>().map_err(|_| {
		let allowed: Vec<&str> = choices.iter().map(as_str).collect();
		format!("\"{value}\" is not a valid choice; expected one of {}", allowed.join(", "))
	})
}

pub fn parse_status(value: &str) -> Result<TicketStatus, String> {
	parse_choice(value, TicketStatus::all(), TicketStatus::as_str)
}

pub fn parse_priority(value: &str) -> Result<TicketPriority, String> {
	parse_choice(value, TicketPriority::all(), TicketPriority::as_str)
}

pub fn parse_role(value: &str) -> Result<Role, String> {
	parse_choice(value, Role::all(), Role::as_str)
}

/// Parses an optional enum field, recording a field error on failure.
pub fn parse_optional<T>(
	errors: &mut FieldErrors,
	field: &str,
	value: Option<&str>,
	parse: fn(&str) -> Result<T, String>,
) -> Option<T> {
	match value.map(parse) {
		Some(Ok(parsed)) => Some(parsed),
		Some(Err(message)) => {
			errors.add(field, message);
			None
		}
		None => None,
	}
}
