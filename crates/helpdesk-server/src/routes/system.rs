// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Public health, info, and version endpoints.

use axum::{
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use helpdesk_server_api::{HealthResponse, InfoResponse, VersionResponse};
use utoipa::OpenApi;

use crate::api::AppState;
use crate::api_docs::ApiDoc;
use crate::api_response;
use crate::version::{API_VERSION, VERSION};

const ENDPOINT_GROUPS: &[&str] = &[
	"/api/auth",
	"/api/tickets",
	"/api/categories",
	"/api/users",
	"/api/metrics",
	"/api/health",
];

/// Probes the database. 503 when it cannot be reached.
#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
	match helpdesk_server_db::ping(&state.pool).await {
		Ok(()) => api_response::ok(
			"Service is healthy",
			HealthResponse {
				status: "healthy".to_string(),
				database: "connected".to_string(),
				version: VERSION.to_string(),
			},
		),
		Err(e) => {
			tracing::error!(error = %e, "health check database probe failed");
			let mut response = api_response::ok(
				"Service is unhealthy",
				HealthResponse {
					status: "unhealthy".to_string(),
					database: "disconnected".to_string(),
					version: VERSION.to_string(),
				},
			);
			*response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
			response
		}
	}
}

pub async fn info(State(state): State<AppState>) -> Response {
	api_response::ok(
		"API information",
		InfoResponse {
			name: "Helpdesk API".to_string(),
			version: VERSION.to_string(),
			description: "Ticket tracking for end users, support staff, and administrators"
				.to_string(),
			environment: state.environment.clone(),
			endpoints: ENDPOINT_GROUPS.iter().map(|e| (*e).to_string()).collect(),
		},
	)
}

pub async fn version() -> Response {
	api_response::ok(
		"Version information",
		VersionResponse {
			version: VERSION.to_string(),
			api_version: API_VERSION.to_string(),
		},
	)
}

pub async fn openapi_json() -> Response {
	Json(ApiDoc::openapi()).into_response()
}
