// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column encoding shared by the repositories.
//!
//! IDs are stored as hyphenated UUID text, enums as their `as_str` names, and
//! timestamps as RFC 3339 UTC with fixed microsecond precision.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
	dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn format_optional_timestamp(dt: Option<&DateTime<Utc>>) -> Option<String> {
	dt.map(format_timestamp)
}

pub(crate) fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {field}: {e}")))
}

pub(crate) fn parse_optional_timestamp(
	field: &str,
	value: Option<String>,
) -> Result<Option<DateTime<Utc>>, DbError> {
	value.map(|s| parse_timestamp(field, &s)).transpose()
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(format!("Invalid {field}: {e}")))
}

pub(crate) fn parse_optional_uuid(field: &str, value: Option<String>) -> Result<Option<Uuid>, DbError> {
	value.map(|s| parse_uuid(field, &s)).transpose()
}

pub(crate) fn parse_enum<T>(field: &str, value: &str) -> Result<T, DbError>
where
	T: FromStr,
	T::Err: Display,
{
	value
		.parse()
		.map_err(|e| DbError::Internal(format!("Invalid {field}: {e}")))
}

/// `%term%` for a LIKE filter, with LIKE wildcards in the term escaped by `\`.
pub(crate) fn like_pattern(term: &str) -> String {
	let escaped = term
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_");
	format!("%{escaped}%")
}
