// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON request and response bodies for the helpdesk API.
//!
//! Field names are camelCase on the wire. Enum-valued request fields
//! (`status`, `priority`, `role`) arrive as plain strings so the server can
//! report unknown values as field-level validation errors.

pub mod attachments;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod metrics;
pub mod pagination;
pub mod system;
pub mod tickets;
pub mod users;

pub use attachments::{AttachmentListResponse, AttachmentResponse};
pub use auth::{
	AccessTokenResponse, AuthTokensResponse, ChangePasswordRequest, LoginRequest, LogoutRequest,
	PasswordResetRequest, RefreshRequest, RegisterRequest,
};
pub use categories::{
	CategoryListParams, CategoryListResponse, CategoryResponse, CreateCategoryRequest,
	UpdateCategoryRequest,
};
pub use comments::{CommentListResponse, CommentResponse, CreateCommentRequest, UpdateCommentRequest};
pub use metrics::{
	PerformanceMetricsResponse, PriorityMetrics, StatusMetrics, SystemHealthResponse,
	TicketOverviewResponse, UserActivityEntry, UserActivityResponse,
};
pub use pagination::{PageParams, PaginatedResponse};
pub use system::{HealthResponse, InfoResponse, VersionResponse};
pub use tickets::{
	AssignTicketRequest, CategoryBrief, CreateTicketRequest, TicketListParams, TicketResponse,
	UpdateStatusRequest, UpdateTicketRequest,
};
pub use users::{
	CreateUserRequest, ListUsersParams, SupportUserListResponse, UpdateActivationRequest,
	UpdateProfileRequest, UpdateRoleRequest, UserBriefResponse, UserResponse,
};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use with `#[serde(default)]`.
pub(crate) fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	D: serde::Deserializer<'de>,
	T: serde::Deserialize<'de>,
{
	use serde::Deserialize;
	Option::<T>::deserialize(deserializer).map(Some)
}
