// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dashboard metrics handlers. Support staff and administrators only; the
//! per-user activity report is for administrators.

use axum::{extract::State, response::Response};
use chrono::Utc;
use helpdesk_server_auth::{Action, ResourceAttrs};

use super::authorize;
use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::metrics;

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn ticket_overview(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::Read, &ResourceAttrs::metrics())?;
	let overview = metrics::ticket_overview(state.metrics.as_ref()).await?;
	Ok(api_response::ok(
		"Ticket overview retrieved successfully",
		overview,
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn ticket_performance(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::Read, &ResourceAttrs::metrics())?;
	let performance = metrics::performance(state.metrics.as_ref(), Utc::now()).await?;
	Ok(api_response::ok(
		"Performance metrics retrieved successfully",
		performance,
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn user_activity(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::ViewActivity, &ResourceAttrs::metrics())?;
	let activity = metrics::user_activity(state.metrics.as_ref()).await?;
	Ok(api_response::ok(
		"User activity retrieved successfully",
		activity,
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn system_health(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::Read, &ResourceAttrs::metrics())?;
	let health = metrics::system_health(state.metrics.as_ref()).await?;
	Ok(api_response::ok(
		"System health retrieved successfully",
		health,
	))
}
