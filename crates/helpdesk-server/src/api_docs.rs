// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI document served at `/api/openapi.json`.

use helpdesk_server_api::{
	AccessTokenResponse, AssignTicketRequest, AttachmentListResponse, AttachmentResponse,
	AuthTokensResponse, CategoryBrief, CategoryListResponse, CategoryResponse,
	ChangePasswordRequest, CommentListResponse, CommentResponse, CreateCategoryRequest,
	CreateCommentRequest, CreateTicketRequest, CreateUserRequest, HealthResponse, InfoResponse,
	LoginRequest, LogoutRequest, PasswordResetRequest, PerformanceMetricsResponse,
	PriorityMetrics, RefreshRequest, RegisterRequest, StatusMetrics, SupportUserListResponse,
	SystemHealthResponse, TicketOverviewResponse, TicketResponse, UpdateActivationRequest,
	UpdateCategoryRequest, UpdateCommentRequest, UpdateProfileRequest, UpdateRoleRequest,
	UpdateStatusRequest, UpdateTicketRequest, UserActivityEntry, UserActivityResponse,
	UserBriefResponse, UserResponse, VersionResponse,
};
use utoipa::OpenApi;

use crate::api_response::ErrorEnvelope;

#[derive(OpenApi)]
#[openapi(
	info(
		title = "Helpdesk API",
		description = "Ticket tracking for end users, support staff, and administrators"
	),
	components(schemas(
		ErrorEnvelope,
		RegisterRequest,
		LoginRequest,
		RefreshRequest,
		LogoutRequest,
		ChangePasswordRequest,
		PasswordResetRequest,
		AuthTokensResponse,
		AccessTokenResponse,
		TicketResponse,
		CategoryBrief,
		CreateTicketRequest,
		UpdateTicketRequest,
		UpdateStatusRequest,
		AssignTicketRequest,
		CommentResponse,
		CommentListResponse,
		CreateCommentRequest,
		UpdateCommentRequest,
		AttachmentResponse,
		AttachmentListResponse,
		CategoryResponse,
		CategoryListResponse,
		CreateCategoryRequest,
		UpdateCategoryRequest,
		UserResponse,
		UserBriefResponse,
		SupportUserListResponse,
		UpdateProfileRequest,
		CreateUserRequest,
		UpdateRoleRequest,
		UpdateActivationRequest,
		StatusMetrics,
		PriorityMetrics,
		TicketOverviewResponse,
		PerformanceMetricsResponse,
		UserActivityEntry,
		UserActivityResponse,
		SystemHealthResponse,
		HealthResponse,
		InfoResponse,
		VersionResponse,
	)),
	tags(
		(name = "auth", description = "Registration, login, and tokens"),
		(name = "tickets", description = "Tickets, comments, and attachments"),
		(name = "categories", description = "Ticket categories"),
		(name = "users", description = "Profiles and user administration"),
		(name = "metrics", description = "Dashboard rollups"),
		(name = "system", description = "Health and version")
	)
)]
pub struct ApiDoc;
