// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and HTTP router.

use std::sync::Arc;

use axum::{
	routing::{delete, get, patch, post, put},
	Router,
};
use helpdesk_server_config::ServerConfig;
use helpdesk_server_db::{
	AttachmentRepository, AttachmentStore, CategoryRepository, CategoryStore, CommentRepository,
	CommentStore, MetricsRepository, MetricsStore, TicketRepository, TicketStore, TokenRepository,
	TokenStore, UserRepository, UserStore,
};
use sqlx::SqlitePool;

use crate::lifecycle::{AssigneePicker, RandomAssigneePicker, TicketLifecycle};
use crate::routes;
use crate::storage::{AttachmentStorage, LocalAttachmentStorage};
use crate::typed_router::{AuthedRouter, PublicRouter};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub users: Arc<dyn UserStore>,
	pub tokens: Arc<dyn TokenStore>,
	pub tickets: Arc<dyn TicketStore>,
	pub comments: Arc<dyn CommentStore>,
	pub attachments: Arc<dyn AttachmentStore>,
	pub categories: Arc<dyn CategoryStore>,
	pub metrics: Arc<dyn MetricsStore>,
	pub lifecycle: Arc<TicketLifecycle>,
	pub storage: Arc<dyn AttachmentStorage>,
	pub auth_config: helpdesk_server_auth::AuthConfig,
	/// Public origin used to build attachment download URLs.
	pub base_url: String,
	pub environment: String,
	pub max_upload_bytes: u64,
}

/// Builds state backed by SQLite repositories, local attachment storage, and
/// random support assignment.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	create_app_state_with(
		pool,
		config,
		Arc::new(RandomAssigneePicker),
		Arc::new(LocalAttachmentStorage::new(&config.storage.attachments_dir)),
	)
}

/// Like [`create_app_state`] with the assignment policy and file storage
/// supplied by the caller.
pub fn create_app_state_with(
	pool: SqlitePool,
	config: &ServerConfig,
	picker: Arc<dyn AssigneePicker>,
	storage: Arc<dyn AttachmentStorage>,
) -> AppState {
	let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
	let tickets: Arc<dyn TicketStore> = Arc::new(TicketRepository::new(pool.clone()));
	let lifecycle = Arc::new(TicketLifecycle::new(users.clone(), tickets.clone(), picker));

	let auth_config = helpdesk_server_auth::AuthConfig::new()
		.with_dev_mode(config.auth.dev_mode)
		.with_access_token_ttl(chrono::Duration::minutes(config.auth.access_token_ttl_minutes))
		.with_refresh_token_ttl(chrono::Duration::days(config.auth.refresh_token_ttl_days));

	AppState {
		users,
		tokens: Arc::new(TokenRepository::new(pool.clone())),
		tickets,
		comments: Arc::new(CommentRepository::new(pool.clone())),
		attachments: Arc::new(AttachmentRepository::new(pool.clone())),
		categories: Arc::new(CategoryRepository::new(pool.clone())),
		metrics: Arc::new(MetricsRepository::new(pool.clone())),
		pool,
		lifecycle,
		storage,
		auth_config,
		base_url: config.http.base_url.trim_end_matches('/').to_string(),
		environment: config.auth.environment.clone(),
		max_upload_bytes: config.storage.max_upload_bytes,
	}
}

/// Builds the `/api` router.
pub fn create_router(state: AppState) -> Router {
	let public = PublicRouter::new()
		.route("/health", get(routes::system::health_check))
		.route("/info", get(routes::system::info))
		.route("/version", get(routes::system::version))
		.route("/openapi.json", get(routes::system::openapi_json))
		.route("/auth/register", post(routes::auth::register))
		.route("/auth/login", post(routes::auth::login))
		.route("/auth/refresh", post(routes::auth::refresh))
		.route("/auth/password-reset", post(routes::auth::password_reset))
		.build(&state);

	let authed = AuthedRouter::new()
		.with_max_upload_bytes(state.max_upload_bytes)
		// Auth
		.route("/auth/logout", post(routes::auth::logout))
		.route("/auth/me", get(routes::auth::me))
		.route("/auth/change-password", post(routes::auth::change_password))
		// Tickets
		.route(
			"/tickets",
			get(routes::tickets::list_tickets).post(routes::tickets::create_ticket),
		)
		.route("/tickets/create", post(routes::tickets::create_ticket))
		.route("/tickets/my-tickets", get(routes::tickets::my_tickets))
		.route("/tickets/assigned", get(routes::tickets::assigned_tickets))
		.route("/tickets/unassigned", get(routes::tickets::unassigned_tickets))
		.route(
			"/tickets/{id}",
			get(routes::tickets::get_ticket).delete(routes::tickets::delete_ticket),
		)
		.route(
			"/tickets/{id}/update",
			put(routes::tickets::update_ticket).patch(routes::tickets::update_ticket),
		)
		.route(
			"/tickets/{id}/status",
			patch(routes::tickets::update_status).put(routes::tickets::update_status),
		)
		.route(
			"/tickets/{id}/assign",
			patch(routes::tickets::assign_ticket).put(routes::tickets::assign_ticket),
		)
		.route("/tickets/{id}/delete", delete(routes::tickets::delete_ticket))
		// Comments
		.route(
			"/tickets/{id}/comments",
			get(routes::comments::list_comments).post(routes::comments::create_comment),
		)
		.route(
			"/tickets/{id}/comments/create",
			post(routes::comments::create_comment),
		)
		.route(
			"/tickets/{id}/comments/{comment_id}",
			get(routes::comments::get_comment),
		)
		.route(
			"/tickets/{id}/comments/{comment_id}/update",
			put(routes::comments::update_comment).patch(routes::comments::update_comment),
		)
		.route(
			"/tickets/{id}/comments/{comment_id}/delete",
			delete(routes::comments::delete_comment),
		)
		// Attachments
		.upload(
			"/tickets/{id}/attachments",
			get(routes::attachments::list_attachments).post(routes::attachments::upload_attachment),
		)
		.upload(
			"/tickets/{id}/attachments/upload",
			post(routes::attachments::upload_attachment),
		)
		.route(
			"/tickets/{id}/attachments/{attachment_id}",
			get(routes::attachments::get_attachment),
		)
		.route(
			"/tickets/{id}/attachments/{attachment_id}/download",
			get(routes::attachments::download_attachment),
		)
		.route(
			"/tickets/{id}/attachments/{attachment_id}/delete",
			delete(routes::attachments::delete_attachment),
		)
		// Categories
		.route(
			"/categories",
			get(routes::categories::list_categories).post(routes::categories::create_category),
		)
		.route("/categories/create", post(routes::categories::create_category))
		.route("/categories/{id}", get(routes::categories::get_category))
		.route(
			"/categories/{id}/update",
			put(routes::categories::update_category).patch(routes::categories::update_category),
		)
		.route(
			"/categories/{id}/delete",
			delete(routes::categories::delete_category),
		)
		// Users
		.route("/users/profile", get(routes::users::get_profile))
		.route(
			"/users/profile/update",
			put(routes::users::update_profile).patch(routes::users::update_profile),
		)
		.route("/users/support", get(routes::users::list_support_users))
		.route(
			"/users",
			get(routes::users::list_users).post(routes::users::create_user),
		)
		.route("/users/{id}", get(routes::users::get_user))
		.route(
			"/users/{id}/role",
			put(routes::users::update_role).patch(routes::users::update_role),
		)
		.route(
			"/users/{id}/activation",
			patch(routes::users::update_activation),
		)
		.route("/users/{id}/delete", delete(routes::users::delete_user))
		// Metrics
		.route(
			"/metrics/tickets/overview",
			get(routes::metrics::ticket_overview),
		)
		.route(
			"/metrics/tickets/performance",
			get(routes::metrics::ticket_performance),
		)
		.route("/metrics/users/activity", get(routes::metrics::user_activity))
		.route("/metrics/system/health", get(routes::metrics::system_health))
		.build(&state);

	Router::new()
		.merge(public)
		.merge(authed)
		.with_state(state)
}
