// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use helpdesk_server_auth::{Role, User, UserId, UserSummary};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// A user account in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub id: UserId,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub full_name: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, example = "support"))]
	pub role: Role,
	pub display_role: String,
	pub created_at: DateTime<Utc>,
	pub last_login: Option<DateTime<Utc>>,
	pub is_active: bool,
}

impl From<&User> for UserResponse {
	fn from(user: &User) -> Self {
		Self {
			id: user.id,
			email: user.email.clone(),
			first_name: user.first_name.clone(),
			last_name: user.last_name.clone(),
			full_name: user.full_name(),
			role: user.role,
			display_role: user.role.display_name().to_string(),
			created_at: user.created_at,
			last_login: user.last_login,
			is_active: user.is_active,
		}
	}
}

/// Compact user reference embedded in tickets, comments, and attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserBriefResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub id: UserId,
	pub email: String,
	pub full_name: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String))]
	pub role: Role,
	pub display_role: String,
}

impl From<&UserSummary> for UserBriefResponse {
	fn from(summary: &UserSummary) -> Self {
		Self {
			id: summary.id,
			email: summary.email.clone(),
			full_name: summary.full_name.clone(),
			role: summary.role,
			display_role: summary.role.display_name().to_string(),
		}
	}
}

impl From<&User> for UserBriefResponse {
	fn from(user: &User) -> Self {
		Self::from(&user.to_summary())
	}
}

/// Active support users, for assignment pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SupportUserListResponse {
	pub count: usize,
	pub users: Vec<UserBriefResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
}

/// Administrator provisioning of an account with any role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	#[serde(default)]
	pub first_name: String,
	#[serde(default)]
	pub last_name: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub password: String,
	/// Defaults to `user`.
	pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateRoleRequest {
	pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivationRequest {
	pub is_active: Option<bool>,
}

/// Filters for the administrator user directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct ListUsersParams {
	pub role: Option<String>,
	#[serde(alias = "is_active")]
	pub is_active: Option<bool>,
	pub search: Option<String>,
}
