// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration, login, and bearer token handlers.
//!
//! Access tokens authenticate API calls; refresh tokens only mint new access
//! tokens. Both are stored as SHA-256 hashes and never logged.

use axum::{extract::State, response::Response};
use helpdesk_server_api::{
	AccessTokenResponse, AuthTokensResponse, ChangePasswordRequest, LoginRequest, LogoutRequest,
	PasswordResetRequest, RefreshRequest, RegisterRequest, UserResponse,
};
use helpdesk_server_auth::{
	check_password_strength, hash_password, hash_token, normalize_email, verify_password,
	AuthToken, Role, TokenKind, User,
};

use crate::accounts::{create_account, NewAccount};
use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::extract::ApiJson;
use crate::validation::FieldErrors;

const REQUIRED: &str = "This field is required";
const PASSWORDS_DIFFER: &str = "Passwords do not match";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Stores a fresh token of `kind` for `user` and returns its plaintext.
async fn issue_token(state: &AppState, user: &User, kind: TokenKind) -> Result<String, ServerError> {
	let ttl = match kind {
		TokenKind::Access => state.auth_config.access_token_ttl,
		TokenKind::Refresh => state.auth_config.refresh_token_ttl,
	};
	let (token, plaintext) = AuthToken::issue(user.id, kind, ttl);
	state.tokens.create_token(&token).await?;
	Ok(plaintext)
}

async fn token_pair(state: &AppState, user: &User) -> Result<AuthTokensResponse, ServerError> {
	Ok(AuthTokensResponse {
		user: UserResponse::from(user),
		access_token: issue_token(state, user, TokenKind::Access).await?,
		refresh_token: issue_token(state, user, TokenKind::Refresh).await?,
	})
}

/// Looks up a live refresh token by its plaintext.
async fn find_refresh_token(state: &AppState, plaintext: &str) -> Result<Option<AuthToken>, ServerError> {
	let token = state.tokens.get_token_by_hash(&hash_token(plaintext)).await?;
	Ok(token.filter(|t| t.kind == TokenKind::Refresh && t.is_valid()))
}

/// Self-service sign-up. New accounts always get the `user` role.
#[tracing::instrument(skip(state, body))]
pub async fn register(
	State(state): State<AppState>,
	ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Response, ServerError> {
	let mut errors = FieldErrors::new();
	if body.confirm_password.is_empty() {
		errors.add("confirmPassword", REQUIRED);
	} else if body.password != body.confirm_password {
		errors.add("confirmPassword", PASSWORDS_DIFFER);
	}

	let user = create_account(
		state.users.as_ref(),
		NewAccount {
			first_name: &body.first_name,
			last_name: &body.last_name,
			email: &body.email,
			password: &body.password,
			role: Role::User,
		},
		errors,
	)
	.await?;
	tracing::info!(user_id = %user.id, "user registered");

	let tokens = token_pair(&state, &user).await?;
	Ok(api_response::created("Registration successful", tokens))
}

#[tracing::instrument(skip(state, body))]
pub async fn login(
	State(state): State<AppState>,
	ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, ServerError> {
	let mut errors = FieldErrors::new();
	if body.email.trim().is_empty() {
		errors.add("email", REQUIRED);
	}
	if body.password.is_empty() {
		errors.add("password", REQUIRED);
	}
	errors.into_result()?;

	let email = normalize_email(&body.email);
	let Some((user, password_hash)) = state.users.get_credentials_by_email(&email).await? else {
		tracing::debug!("login for unknown email");
		return Err(ServerError::Unauthorized(INVALID_CREDENTIALS.to_string()));
	};
	if !verify_password(&body.password, &password_hash) {
		tracing::warn!(user_id = %user.id, "login with wrong password");
		return Err(ServerError::Unauthorized(INVALID_CREDENTIALS.to_string()));
	}
	if !user.is_active {
		tracing::warn!(user_id = %user.id, "login to deactivated account");
		return Err(ServerError::Unauthorized(
			"This account has been deactivated".to_string(),
		));
	}

	let user_id = user.id;
	state.users.record_login(&user_id).await?;
	let user = state.users.get_user_by_id(&user_id).await?.unwrap_or(user);
	tracing::info!(user_id = %user.id, "user logged in");

	let tokens = token_pair(&state, &user).await?;
	Ok(api_response::ok("Login successful", tokens))
}

/// Exchanges a refresh token for a new access token.
#[tracing::instrument(skip(state, body))]
pub async fn refresh(
	State(state): State<AppState>,
	ApiJson(body): ApiJson<RefreshRequest>,
) -> Result<Response, ServerError> {
	let Some(plaintext) = body.refresh_token.filter(|t| !t.is_empty()) else {
		return Err(ServerError::field("refreshToken", REQUIRED));
	};

	let unauthorized = || ServerError::Unauthorized("Invalid or expired refresh token".to_string());
	let token = find_refresh_token(&state, &plaintext)
		.await?
		.ok_or_else(unauthorized)?;
	let user = state
		.users
		.get_user_by_id(&token.user_id)
		.await?
		.filter(|u| u.is_active)
		.ok_or_else(unauthorized)?;

	let access_token = issue_token(&state, &user, TokenKind::Access).await?;
	tracing::debug!(user_id = %user.id, "access token refreshed");
	Ok(api_response::ok(
		"Token refreshed successfully",
		AccessTokenResponse { access_token },
	))
}

/// Revokes the presenting access token and, when supplied, the caller's
/// refresh token.
#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn logout(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	body: Option<ApiJson<LogoutRequest>>,
) -> Result<Response, ServerError> {
	if let Some(token_id) = &current_user.token_id {
		state.tokens.revoke_token(token_id).await?;
	}

	let refresh_token = body.and_then(|ApiJson(body)| body.refresh_token);
	if let Some(plaintext) = refresh_token.filter(|t| !t.is_empty()) {
		match find_refresh_token(&state, &plaintext).await? {
			Some(token) if token.user_id == current_user.user_id() => {
				state.tokens.revoke_token(&token.id).await?;
			}
			Some(_) => tracing::warn!("logout presented another user's refresh token"),
			None => {}
		}
	}

	tracing::info!("user logged out");
	Ok(api_response::message("Logout successful"))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn me(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Response, ServerError> {
	let user = state
		.users
		.get_user_by_id(&current_user.user_id())
		.await?
		.ok_or_else(|| ServerError::NotFound("User".to_string()))?;
	Ok(api_response::ok(
		"User retrieved successfully",
		UserResponse::from(&user),
	))
}

#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn change_password(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Response, ServerError> {
	let user_id = current_user.user_id();
	let mut errors = FieldErrors::new();

	if body.current_password.is_empty() {
		errors.add("currentPassword", REQUIRED);
	} else {
		let stored = state.users.get_password_hash(&user_id).await?;
		let matches = stored
			.as_deref()
			.is_some_and(|hash| verify_password(&body.current_password, hash));
		if !matches {
			errors.add("currentPassword", "Current password is incorrect");
		}
	}

	if body.new_password.is_empty() {
		errors.add("newPassword", REQUIRED);
	} else {
		for problem in check_password_strength(&body.new_password) {
			errors.add("newPassword", problem);
		}
	}
	if body.confirm_password.is_empty() {
		errors.add("confirmPassword", REQUIRED);
	} else if body.new_password != body.confirm_password {
		errors.add("confirmPassword", PASSWORDS_DIFFER);
	}
	errors.into_result()?;

	let password_hash = hash_password(&body.new_password)?;
	state.users.update_password(&user_id, &password_hash).await?;
	tracing::info!("password changed");

	Ok(api_response::message("Password changed successfully"))
}

/// Acknowledges every request the same way so account existence is not
/// revealed. No mail is sent.
#[tracing::instrument(skip(state, body))]
pub async fn password_reset(
	State(state): State<AppState>,
	body: Option<ApiJson<PasswordResetRequest>>,
) -> Result<Response, ServerError> {
	if let Some(ApiJson(body)) = body {
		let email = normalize_email(&body.email);
		if !email.is_empty() {
			let known = state.users.get_user_by_email(&email).await?.is_some();
			tracing::debug!(known, "password reset requested");
		}
	}
	Ok(api_response::message(
		"If an account exists for this email, password reset instructions have been sent",
	))
}
