// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] resolves the caller once per request and stores an
//! [`AuthContext`] extension; handlers pick it up with [`RequireAuth`] or
//! [`OptionalAuth`].
//!
//! # Security Properties
//!
//! - Bearer tokens are hashed with SHA-256 before lookup and never logged.
//! - Only unexpired, unrevoked access tokens authenticate; refresh tokens are
//!   accepted at `/api/auth/refresh` alone.
//! - Deactivated accounts are treated as unauthenticated.
//! - In dev mode a request without valid credentials runs as the first active
//!   administrator. Startup refuses dev mode in production.

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request, StatusCode},
	middleware::Next,
	response::Response,
};
use helpdesk_server_auth::{
	extract_bearer_token, hash_token, identify_bearer_token, AuthContext, BearerTokenType,
	CurrentUser, TokenKind,
};
use helpdesk_server_db::{TokenStore, UserStore};
use tracing::instrument;

use crate::api::AppState;
use crate::api_response;

const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// Resolves the caller and stores an [`AuthContext`] on the request.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(
		auth_method = tracing::field::Empty,
		user_id = tracing::field::Empty,
	)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let span = tracing::Span::current();

	if let Some(bearer_token) = extract_bearer_token(request.headers()) {
		match identify_bearer_token(&bearer_token) {
			BearerTokenType::AccessToken => {
				if let Some(current_user) =
					authenticate_access_token(&bearer_token, state.tokens.as_ref(), state.users.as_ref())
						.await
				{
					span.record("auth_method", "access_token");
					span.record("user_id", tracing::field::display(current_user.user_id()));
					request
						.extensions_mut()
						.insert(AuthContext::authenticated(current_user));
					return next.run(request).await;
				}
			}
			BearerTokenType::RefreshToken => {
				tracing::debug!("refresh tokens are not valid for API calls");
			}
			BearerTokenType::Unknown => {
				tracing::debug!("unknown bearer token type");
			}
		}
	}

	if state.auth_config.dev_mode {
		match state.users.get_first_active_admin().await {
			Ok(Some(admin)) => {
				span.record("auth_method", "dev_mode");
				span.record("user_id", tracing::field::display(admin.id));
				tracing::warn!("DEV MODE AUTHENTICATION ENABLED - DO NOT USE IN PRODUCTION");
				request
					.extensions_mut()
					.insert(AuthContext::authenticated(CurrentUser::dev(admin)));
				return next.run(request).await;
			}
			Ok(None) => tracing::warn!("dev mode enabled but no active administrator exists"),
			Err(e) => tracing::error!(error = %e, "failed to load dev mode administrator"),
		}
	}

	span.record("auth_method", "none");
	request
		.extensions_mut()
		.insert(AuthContext::unauthenticated());
	next.run(request).await
}

/// Looks up an access token and its owner.
#[instrument(skip(access_token, tokens, users), fields(token_id = tracing::field::Empty))]
async fn authenticate_access_token(
	access_token: &str,
	tokens: &dyn TokenStore,
	users: &dyn UserStore,
) -> Option<CurrentUser> {
	let token_hash = hash_token(access_token);

	let token = match tokens.get_token_by_hash(&token_hash).await {
		Ok(Some(token)) => token,
		Ok(None) => {
			tracing::debug!("access token not found for hash");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to look up access token");
			return None;
		}
	};

	tracing::Span::current().record("token_id", tracing::field::display(token.id));

	if token.kind != TokenKind::Access {
		tracing::debug!("token is not an access token");
		return None;
	}
	if !token.is_valid() {
		tracing::debug!(
			expired = token.is_expired(),
			revoked = token.is_revoked(),
			"access token rejected"
		);
		return None;
	}

	let user = match users.get_user_by_id(&token.user_id).await {
		Ok(Some(user)) => user,
		Ok(None) => {
			tracing::warn!(user_id = %token.user_id, "user not found for access token");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to look up user");
			return None;
		}
	};

	if !user.is_active {
		tracing::debug!(user_id = %user.id, "deactivated account presented a token");
		return None;
	}

	Some(CurrentUser::from_access_token(user, token.id))
}

fn auth_context(parts: &Parts) -> AuthContext {
	parts
		.extensions
		.get::<AuthContext>()
		.cloned()
		.unwrap_or_else(AuthContext::unauthenticated)
}

/// Extractor that requires authentication.
///
/// Rejects with a 401 error envelope when no caller was resolved.
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match auth_context(parts).current_user {
			Some(user) => Ok(RequireAuth(user)),
			None => {
				tracing::debug!("authentication required: no valid credentials");
				Err(api_response::error(
					StatusCode::UNAUTHORIZED,
					AUTHENTICATION_REQUIRED,
					None,
				))
			}
		}
	}
}

/// Extractor for optional authentication. Always succeeds.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(auth_context(parts).current_user))
	}
}
