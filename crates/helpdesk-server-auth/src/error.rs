// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and authorization error types.

use thiserror::Error;

use crate::password::PasswordError;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, Error)]
pub enum AuthError {
	// =========================================================================
	// Authentication Errors
	// =========================================================================
	/// No authentication credentials provided.
	#[error("authentication required")]
	AuthenticationRequired,

	/// Email/password pair did not match an account.
	#[error("invalid credentials")]
	InvalidCredentials,

	/// The account exists but has been deactivated.
	#[error("account is deactivated")]
	AccountDeactivated,

	/// The bearer token is malformed, unknown, or revoked.
	#[error("invalid token")]
	InvalidToken,

	#[error("token expired")]
	TokenExpired,

	// =========================================================================
	// Authorization Errors
	// =========================================================================
	/// Access denied by ABAC policy.
	#[error("access denied")]
	AccessDenied,

	/// Forbidden operation with a specific reason.
	#[error("forbidden: {0}")]
	Forbidden(String),

	// =========================================================================
	// Infrastructure Errors
	// =========================================================================
	#[error("password hashing error: {0}")]
	Password(#[from] PasswordError),

	#[error("internal error: {0}")]
	Internal(String),
}

impl AuthError {
	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		matches!(self, AuthError::Password(_) | AuthError::Internal(_))
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			AuthError::AuthenticationRequired
			| AuthError::InvalidCredentials
			| AuthError::AccountDeactivated
			| AuthError::InvalidToken
			| AuthError::TokenExpired => 401,

			AuthError::AccessDenied | AuthError::Forbidden(_) => 403,

			AuthError::Password(_) | AuthError::Internal(_) => 500,
		}
	}
}
