// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Category HTTP handlers.

use axum::{extract::State, response::Response};
use chrono::Utc;
use helpdesk_server_api::{
	CategoryListParams, CategoryListResponse, CategoryResponse, CreateCategoryRequest,
	UpdateCategoryRequest,
};
use helpdesk_server_auth::{Action, CategoryId, ResourceAttrs};
use helpdesk_server_db::{Category, CategoryWithCount, DbError};

use super::authorize;
use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::validation::{validate_category_name, FieldErrors};

const DUPLICATE_NAME: &str = "A category with this name already exists";

async fn load_category(state: &AppState, id: &CategoryId) -> Result<CategoryWithCount, ServerError> {
	state
		.categories
		.get_category(id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Category".to_string()))
}

/// Blank descriptions are stored as absent.
fn normalize_description(description: Option<String>) -> Option<String> {
	description
		.map(|d| d.trim().to_string())
		.filter(|d| !d.is_empty())
}

fn map_conflict(err: DbError) -> ServerError {
	match err {
		DbError::Conflict(_) => ServerError::field("name", DUPLICATE_NAME),
		other => other.into(),
	}
}

fn category_in_use(ticket_count: i64) -> ServerError {
	ServerError::BadRequest {
		message: "Cannot delete a category that is used by tickets".to_string(),
		details: Some(serde_json::json!({ "ticketCount": ticket_count })),
	}
}

/// All categories ordered by name.
#[tracing::instrument(skip(state, params), fields(user_id = %current_user.user_id()))]
pub async fn list_categories(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiQuery(params): ApiQuery<CategoryListParams>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::List, &ResourceAttrs::category())?;

	let search = params
		.search
		.as_deref()
		.map(str::trim)
		.filter(|s| !s.is_empty());
	let categories: Vec<CategoryResponse> = state
		.categories
		.list_categories(search)
		.await?
		.iter()
		.map(CategoryResponse::from)
		.collect();

	Ok(api_response::ok(
		"Categories retrieved successfully",
		CategoryListResponse {
			count: categories.len(),
			categories,
		},
	))
}

#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn create_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::Create, &ResourceAttrs::category())?;

	let name = body.name.trim();
	let mut errors = FieldErrors::new();
	errors.check("name", validate_category_name(name));
	errors.into_result()?;

	let category = Category::new(name, normalize_description(body.description));
	state
		.categories
		.create_category(&category)
		.await
		.map_err(map_conflict)?;
	tracing::info!(category_id = %category.id, name = %category.name, "category created");

	let created = load_category(&state, &category.id).await?;
	Ok(api_response::created(
		"Category created successfully",
		CategoryResponse::from(&created),
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn get_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<Response, ServerError> {
	let category = load_category(&state, &category_id).await?;
	authorize(&current_user, Action::Read, &ResourceAttrs::category())?;

	Ok(api_response::ok(
		"Category retrieved successfully",
		CategoryResponse::from(&category),
	))
}

#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn update_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(category_id): ApiPath<CategoryId>,
	ApiJson(body): ApiJson<UpdateCategoryRequest>,
) -> Result<Response, ServerError> {
	let existing = load_category(&state, &category_id).await?;
	authorize(&current_user, Action::Update, &ResourceAttrs::category())?;

	let mut category = existing.category;
	let mut errors = FieldErrors::new();
	if let Some(name) = body.name.as_deref().map(str::trim) {
		errors.check("name", validate_category_name(name));
		category.name = name.to_string();
	}
	errors.into_result()?;

	if let Some(description) = body.description {
		category.description = normalize_description(description);
	}
	category.updated_at = Utc::now();

	state
		.categories
		.update_category(&category)
		.await
		.map_err(map_conflict)?;
	tracing::info!(category_id = %category_id, "category updated");

	let updated = load_category(&state, &category_id).await?;
	Ok(api_response::ok(
		"Category updated successfully",
		CategoryResponse::from(&updated),
	))
}

/// Refused with the referencing ticket count while tickets use the category.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn delete_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<Response, ServerError> {
	load_category(&state, &category_id).await?;
	authorize(&current_user, Action::Delete, &ResourceAttrs::category())?;

	let ticket_count = state.categories.count_tickets(&category_id).await?;
	if ticket_count > 0 {
		return Err(category_in_use(ticket_count));
	}

	match state.categories.delete_category(&category_id).await {
		Ok(true) => {}
		Ok(false) => return Err(ServerError::NotFound("Category".to_string())),
		Err(DbError::Conflict(_)) => {
			let ticket_count = state.categories.count_tickets(&category_id).await?;
			return Err(category_in_use(ticket_count));
		}
		Err(e) => return Err(e.into()),
	}
	tracing::info!(category_id = %category_id, "category deleted");
	Ok(api_response::message("Category deleted successfully"))
}
