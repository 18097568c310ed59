// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User profile and administrator user-management handlers.
//!
//! Administrators cannot change their own role, deactivate, or delete
//! themselves. Those checks run before the payload is looked at.

use axum::{extract::State, response::Response};
use helpdesk_server_api::{
	CreateUserRequest, ListUsersParams, PageParams, PaginatedResponse, SupportUserListResponse,
	UpdateActivationRequest, UpdateProfileRequest, UpdateRoleRequest, UserBriefResponse,
	UserResponse,
};
use helpdesk_server_auth::{
	check_can_change_role, check_can_delete_user, check_can_set_active, validate_name, Action,
	ResourceAttrs, Role, User, UserId,
};
use helpdesk_server_db::UserFilter;

use super::authorize;
use crate::accounts::{create_account, NewAccount};
use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::storage::delete_files_best_effort;
use crate::validation::{parse_optional, parse_role, FieldErrors};

const REQUIRED: &str = "This field is required";

async fn load_user(state: &AppState, id: &UserId) -> Result<User, ServerError> {
	state
		.users
		.get_user_by_id(id)
		.await?
		.ok_or_else(|| ServerError::NotFound("User".to_string()))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn get_profile(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Response, ServerError> {
	let user = load_user(&state, &current_user.user_id()).await?;
	Ok(api_response::ok(
		"Profile retrieved successfully",
		UserResponse::from(&user),
	))
}

/// Only names are editable here; email and role are not.
#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn update_profile(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Response, ServerError> {
	let user = load_user(&state, &current_user.user_id()).await?;
	authorize(&current_user, Action::Update, &ResourceAttrs::user(user.id))?;

	let first_name = body.first_name.as_deref().map(str::trim);
	let last_name = body.last_name.as_deref().map(str::trim);
	let mut errors = FieldErrors::new();
	if let Some(name) = first_name {
		errors.check("firstName", validate_name(name));
	}
	if let Some(name) = last_name {
		errors.check("lastName", validate_name(name));
	}
	errors.into_result()?;

	state
		.users
		.update_profile(
			&user.id,
			first_name.unwrap_or(&user.first_name),
			last_name.unwrap_or(&user.last_name),
		)
		.await?;
	tracing::info!("profile updated");

	let user = load_user(&state, &user.id).await?;
	Ok(api_response::ok(
		"Profile updated successfully",
		UserResponse::from(&user),
	))
}

/// Active support users ordered by name, for assignment pickers.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn list_support_users(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Response, ServerError> {
	let users: Vec<UserBriefResponse> = state
		.users
		.list_active_support_users()
		.await?
		.iter()
		.map(UserBriefResponse::from)
		.collect();

	Ok(api_response::ok(
		"Support users retrieved successfully",
		SupportUserListResponse {
			count: users.len(),
			users,
		},
	))
}

#[tracing::instrument(skip(state, params, page), fields(user_id = %current_user.user_id()))]
pub async fn list_users(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiQuery(params): ApiQuery<ListUsersParams>,
	ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Response, ServerError> {
	authorize(
		&current_user,
		Action::List,
		&ResourceAttrs::user(current_user.user_id()),
	)?;

	let mut errors = FieldErrors::new();
	let role = parse_optional(&mut errors, "role", params.role.as_deref(), parse_role);
	errors.into_result()?;

	let filter = UserFilter {
		role,
		is_active: params.is_active,
		search: params
			.search
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty()),
	};
	let (users, count) = state
		.users
		.list_users(&filter, page.limit(), page.offset())
		.await?;
	let results: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

	Ok(api_response::ok(
		"Users retrieved successfully",
		PaginatedResponse::new(results, count, &page),
	))
}

/// Provisions an account with any role.
#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn create_user(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<Response, ServerError> {
	authorize(
		&current_user,
		Action::Create,
		&ResourceAttrs::user(current_user.user_id()),
	)?;

	let mut errors = FieldErrors::new();
	let role = parse_optional(&mut errors, "role", body.role.as_deref(), parse_role)
		.unwrap_or(Role::User);
	let user = create_account(
		state.users.as_ref(),
		NewAccount {
			first_name: &body.first_name,
			last_name: &body.last_name,
			email: &body.email,
			password: &body.password,
			role,
		},
		errors,
	)
	.await?;
	tracing::info!(new_user_id = %user.id, role = %user.role, "user provisioned");

	Ok(api_response::created(
		"User created successfully",
		UserResponse::from(&user),
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn get_user(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(user_id): ApiPath<UserId>,
) -> Result<Response, ServerError> {
	let user = load_user(&state, &user_id).await?;
	authorize(&current_user, Action::Read, &ResourceAttrs::user(user.id))?;

	Ok(api_response::ok(
		"User retrieved successfully",
		UserResponse::from(&user),
	))
}

/// The body is parsed only after the self-management check, so an admin
/// targeting their own account is refused whatever they send.
#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn update_role(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(user_id): ApiPath<UserId>,
	body: Result<ApiJson<UpdateRoleRequest>, ServerError>,
) -> Result<Response, ServerError> {
	let target = load_user(&state, &user_id).await?;
	check_can_change_role(&current_user.user, &target)?;
	let ApiJson(body) = body?;

	let role = match body.role.as_deref() {
		None => return Err(ServerError::field("role", REQUIRED)),
		Some(value) => parse_role(value).map_err(|message| ServerError::field("role", message))?,
	};

	state.users.update_role(&user_id, role).await?;
	tracing::info!(target_user_id = %user_id, from = %target.role, to = %role, "role changed");

	let user = load_user(&state, &user_id).await?;
	Ok(api_response::ok(
		format!("User role updated to {}", role.display_name()),
		UserResponse::from(&user),
	))
}

/// Deactivation also revokes every token the target holds.
#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn update_activation(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(user_id): ApiPath<UserId>,
	body: Result<ApiJson<UpdateActivationRequest>, ServerError>,
) -> Result<Response, ServerError> {
	let target = load_user(&state, &user_id).await?;
	check_can_set_active(&current_user.user, &target)?;
	let ApiJson(body) = body?;

	let Some(is_active) = body.is_active else {
		return Err(ServerError::field("isActive", REQUIRED));
	};

	state.users.set_active(&user_id, is_active).await?;
	if !is_active {
		let revoked = state.tokens.revoke_all_for_user(&user_id).await?;
		tracing::info!(target_user_id = %user_id, revoked, "user deactivated");
	} else {
		tracing::info!(target_user_id = %user_id, "user activated");
	}

	let user = load_user(&state, &user_id).await?;
	let message = if is_active {
		"User activated successfully"
	} else {
		"User deactivated successfully"
	};
	Ok(api_response::ok(message, UserResponse::from(&user)))
}

/// Removes the account along with its tickets, comments, and attachments.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn delete_user(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(user_id): ApiPath<UserId>,
) -> Result<Response, ServerError> {
	let target = load_user(&state, &user_id).await?;
	check_can_delete_user(&current_user.user, &target)?;

	let stored_paths = state.attachments.list_stored_paths_for_user(&user_id).await?;
	state.tokens.revoke_all_for_user(&user_id).await?;
	if !state.users.delete_user(&user_id).await? {
		return Err(ServerError::NotFound("User".to_string()));
	}
	delete_files_best_effort(state.storage.as_ref(), &stored_paths).await;

	tracing::info!(
		target_user_id = %user_id,
		files = stored_paths.len(),
		"user deleted"
	);
	Ok(api_response::message("User deleted successfully"))
}
