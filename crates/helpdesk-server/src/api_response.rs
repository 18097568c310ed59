// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Response envelope shared by every endpoint.
//!
//! Success bodies carry `success: true`, a human-readable `message`, optional
//! `data`, and a `timestamp`. Error bodies carry `success: false`, an `error`
//! message, optional per-field `details`, and a `timestamp`.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
	pub success: bool,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
	pub success: bool,
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	#[schema(value_type = Option<Object>)]
	pub details: Option<serde_json::Value>,
	pub timestamp: DateTime<Utc>,
}

impl ErrorEnvelope {
	pub fn new(error: impl Into<String>, details: Option<serde_json::Value>) -> Self {
		Self {
			success: false,
			error: error.into(),
			details,
			timestamp: Utc::now(),
		}
	}
}

fn envelope<T: Serialize>(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Response {
	(
		status,
		Json(SuccessEnvelope {
			success: true,
			message: message.into(),
			data,
			timestamp: Utc::now(),
		}),
	)
		.into_response()
}

/// 200 with a payload.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Response {
	envelope(StatusCode::OK, message, Some(data))
}

/// 201 with the created resource.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Response {
	envelope(StatusCode::CREATED, message, Some(data))
}

/// 200 without a payload, for deletes and acknowledgements.
pub fn message(message: impl Into<String>) -> Response {
	envelope::<()>(StatusCode::OK, message, None)
}

/// Error body with an arbitrary status.
pub fn error(
	status: StatusCode,
	error: impl Into<String>,
	details: Option<serde_json::Value>,
) -> Response {
	(status, Json(ErrorEnvelope::new(error, details))).into_response()
}
