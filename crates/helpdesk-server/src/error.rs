// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use helpdesk_server_auth::{AuthError, PasswordError};
use helpdesk_server_db::DbError;

use crate::api_response;
use crate::validation::FieldErrors;

/// Errors a handler can return. Every variant renders as an error envelope.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// One or more payload fields are invalid.
	#[error("Validation failed")]
	Validation(FieldErrors),

	/// A business rule rejected the request.
	#[error("{message}")]
	BadRequest {
		message: String,
		details: Option<serde_json::Value>,
	},

	#[error("Unauthorized: {0}")]
	Unauthorized(String),

	#[error("Forbidden: {0}")]
	Forbidden(String),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("Service unavailable: {0}")]
	ServiceUnavailable(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl ServerError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		Self::BadRequest {
			message: message.into(),
			details: None,
		}
	}

	/// A business-rule failure attributed to one field.
	pub fn field(field: &str, message: impl Into<String>) -> Self {
		Self::Validation(FieldErrors::single(field, message))
	}

	pub fn forbidden() -> Self {
		Self::Forbidden("You do not have permission to perform this action".to_string())
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			ServerError::Validation(_) | ServerError::BadRequest { .. } => StatusCode::BAD_REQUEST,
			ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
			ServerError::NotFound(_) => StatusCode::NOT_FOUND,
			ServerError::Db(DbError::NotFound(_)) => StatusCode::NOT_FOUND,
			ServerError::Db(DbError::Conflict(_)) => StatusCode::BAD_REQUEST,
			ServerError::Db(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
			ServerError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
		}
	}
}

impl From<AuthError> for ServerError {
	fn from(err: AuthError) -> Self {
		match err.status_code() {
			401 => ServerError::Unauthorized(err.to_string()),
			403 => match err {
				AuthError::Forbidden(reason) => ServerError::Forbidden(reason),
				_ => ServerError::forbidden(),
			},
			_ => ServerError::Internal(err.to_string()),
		}
	}
}

impl From<PasswordError> for ServerError {
	fn from(err: PasswordError) -> Self {
		ServerError::Internal(err.to_string())
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let (message, details) = match self {
			ServerError::Validation(errors) => {
				tracing::debug!(fields = ?errors, "validation failed");
				("Validation failed".to_string(), Some(errors.to_json()))
			}
			ServerError::BadRequest { message, details } => (message, details),
			ServerError::Unauthorized(msg) => {
				tracing::debug!(reason = %msg, "unauthorized");
				(msg, None)
			}
			ServerError::Forbidden(msg) => {
				tracing::warn!(reason = %msg, "forbidden");
				(msg, None)
			}
			ServerError::NotFound(what) => (format!("{what} not found"), None),
			ServerError::Db(DbError::NotFound(what)) => (format!("Not found: {what}"), None),
			ServerError::Db(DbError::Conflict(msg)) => (msg, None),
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				("A database error occurred".to_string(), None)
			}
			ServerError::ServiceUnavailable(msg) => {
				tracing::warn!(error = %msg, "service unavailable");
				(msg, None)
			}
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal error");
				("An internal error occurred".to_string(), None)
			}
		};
		api_response::error(status, message, details)
	}
}
