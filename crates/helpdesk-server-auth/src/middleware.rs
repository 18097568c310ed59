// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authentication primitives.
//!
//! This module provides:
//! - [`CurrentUser`] - authenticated user context extracted from requests
//! - [`AuthContext`] - auth state carried through request extensions
//! - [`AuthConfig`] - token lifetimes and dev-mode behaviour
//! - Helpers for extracting and classifying bearer tokens
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Authorization: Bearer <token> → Identify Type → Validate → AuthContext
//!                                                │
//!                                                ├── Access token (hd_at_*) → token lookup
//!                                                ├── Refresh token (hd_rt_*) → rejected for API calls
//!                                                └── Anything else → unauthenticated
//! ```
//!
//! Token values are never logged.

use crate::abac::SubjectAttrs;
use crate::token::{ACCESS_TOKEN_PREFIX, REFRESH_TOKEN_PREFIX};
use crate::{TokenId, User, UserId};
use chrono::Duration;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 60;
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// The currently authenticated user, extracted from request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
	/// The authenticated user as loaded for this request.
	pub user: User,
	/// The access token that authenticated the request, if any.
	pub token_id: Option<TokenId>,
}

impl CurrentUser {
	/// Create a CurrentUser authenticated by an access token.
	pub fn from_access_token(user: User, token_id: TokenId) -> Self {
		Self {
			user,
			token_id: Some(token_id),
		}
	}

	/// Create a CurrentUser without a backing token (dev mode).
	pub fn dev(user: User) -> Self {
		Self {
			user,
			token_id: None,
		}
	}

	pub fn user_id(&self) -> UserId {
		self.user.id
	}

	/// ABAC subject attributes for this user.
	pub fn subject(&self) -> SubjectAttrs {
		SubjectAttrs::from_user(&self.user)
	}
}

/// Authentication context for request processing.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	pub is_authenticated: bool,
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	pub fn unauthenticated() -> Self {
		Self {
			is_authenticated: false,
			current_user: None,
		}
	}

	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			is_authenticated: true,
			current_user: Some(current_user),
		}
	}

	pub fn user(&self) -> Option<&CurrentUser> {
		self.current_user.as_ref()
	}

	/// Require authentication, returning the current user or an error.
	pub fn require_user(&self) -> Result<&CurrentUser, AuthRequired> {
		self.current_user.as_ref().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}

/// Configuration for authentication behaviour.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Treat the first active administrator as the caller when no token is sent.
	/// Refused at startup when the environment is production.
	pub dev_mode: bool,
	pub access_token_ttl: Duration,
	pub refresh_token_ttl: Duration,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			dev_mode: false,
			access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
			refresh_token_ttl: Duration::days(DEFAULT_REFRESH_TOKEN_TTL_DAYS),
		}
	}
}

impl AuthConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_dev_mode(mut self, enabled: bool) -> Self {
		self.dev_mode = enabled;
		self
	}

	pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
		self.access_token_ttl = ttl;
		self
	}

	pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
		self.refresh_token_ttl = ttl;
		self
	}
}

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`. Returns `None` if the
/// header is missing, not valid UTF-8, or uses another scheme.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(|token| token.trim().to_string())
		.filter(|token| !token.is_empty())
}

pub fn is_access_token(token: &str) -> bool {
	token.starts_with(ACCESS_TOKEN_PREFIX)
}

pub fn is_refresh_token(token: &str) -> bool {
	token.starts_with(REFRESH_TOKEN_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerTokenType {
	AccessToken,
	RefreshToken,
	Unknown,
}

/// Identify the type of a bearer token by its prefix.
pub fn identify_bearer_token(token: &str) -> BearerTokenType {
	if is_access_token(token) {
		BearerTokenType::AccessToken
	} else if is_refresh_token(token) {
		BearerTokenType::RefreshToken
	} else {
		BearerTokenType::Unknown
	}
}
