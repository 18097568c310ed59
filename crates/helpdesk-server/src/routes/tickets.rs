// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket HTTP handlers.

use axum::{extract::State, response::Response};
use chrono::Utc;
use helpdesk_server_api::{
	AssignTicketRequest, CreateTicketRequest, PageParams, PaginatedResponse, TicketListParams,
	TicketResponse, UpdateStatusRequest, UpdateTicketRequest,
};
use helpdesk_server_auth::{
	Action, CategoryId, ResourceAttrs, Role, TicketId, TicketPriority, UserId,
};
use helpdesk_server_db::{Ticket, TicketFilter, TicketScope};
use uuid::Uuid;

use super::{authorize, load_ticket, ticket_attrs};
use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::lifecycle::apply_status;
use crate::storage::delete_files_best_effort;
use crate::validation::{
	parse_optional, parse_priority, parse_status, validate_description, validate_title, FieldErrors,
};

const REQUIRED: &str = "This field is required";

/// Role-filtered listing with optional filters.
#[tracing::instrument(skip(state, params, page), fields(user_id = %current_user.user_id()))]
pub async fn list_tickets(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiQuery(params): ApiQuery<TicketListParams>,
	ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Response, ServerError> {
	let scope = match current_user.user.role {
		Role::SysAdmin => TicketScope::All,
		Role::Support => TicketScope::SupportQueue(current_user.user_id()),
		Role::User => TicketScope::CreatedBy(current_user.user_id()),
	};
	list_scoped(&state, scope, params, page).await
}

/// Tickets the caller created.
#[tracing::instrument(skip(state, params, page), fields(user_id = %current_user.user_id()))]
pub async fn my_tickets(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiQuery(params): ApiQuery<TicketListParams>,
	ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Response, ServerError> {
	list_scoped(
		&state,
		TicketScope::CreatedBy(current_user.user_id()),
		params,
		page,
	)
	.await
}

/// Tickets assigned to the calling staff member.
#[tracing::instrument(skip(state, params, page), fields(user_id = %current_user.user_id()))]
pub async fn assigned_tickets(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiQuery(params): ApiQuery<TicketListParams>,
	ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::List, &ResourceAttrs::ticket_queue())?;
	list_scoped(
		&state,
		TicketScope::AssignedTo(current_user.user_id()),
		params,
		page,
	)
	.await
}

/// The unassigned pool.
#[tracing::instrument(skip(state, params, page), fields(user_id = %current_user.user_id()))]
pub async fn unassigned_tickets(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiQuery(params): ApiQuery<TicketListParams>,
	ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Response, ServerError> {
	authorize(&current_user, Action::List, &ResourceAttrs::ticket_queue())?;
	list_scoped(&state, TicketScope::Unassigned, params, page).await
}

async fn list_scoped(
	state: &AppState,
	scope: TicketScope,
	params: TicketListParams,
	page: PageParams,
) -> Result<Response, ServerError> {
	let mut errors = FieldErrors::new();
	let status = parse_optional(&mut errors, "status", params.status.as_deref(), parse_status);
	let priority = parse_optional(
		&mut errors,
		"priority",
		params.priority.as_deref(),
		parse_priority,
	);
	errors.into_result()?;

	let filter = TicketFilter {
		scope,
		status,
		priority,
		category_id: params.category_id.map(CategoryId::new),
		search: params
			.search
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty()),
	};

	let (views, count) = state
		.tickets
		.list_tickets(&filter, page.limit(), page.offset())
		.await?;
	let results: Vec<TicketResponse> = views.iter().map(TicketResponse::from).collect();
	tracing::debug!(count, returned = results.len(), "tickets listed");

	Ok(api_response::ok(
		"Tickets retrieved successfully",
		PaginatedResponse::new(results, count, &page),
	))
}

#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn create_ticket(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(body): ApiJson<CreateTicketRequest>,
) -> Result<Response, ServerError> {
	let mut errors = FieldErrors::new();
	errors.check("title", validate_title(&body.title));
	errors.check("description", validate_description(&body.description));
	let priority = parse_optional(
		&mut errors,
		"priority",
		body.priority.as_deref(),
		parse_priority,
	)
	.unwrap_or(TicketPriority::Medium);
	let category_id = check_category(&state, &mut errors, body.category_id).await?;
	errors.into_result()?;

	let ticket = Ticket::new(
		current_user.user_id(),
		body.title.trim(),
		body.description.trim(),
		priority,
		category_id,
	);
	state.tickets.create_ticket(&ticket).await?;
	tracing::info!(ticket_id = %ticket.id, priority = %priority, "ticket created");

	state.lifecycle.auto_assign(&ticket.id).await;

	let view = state
		.tickets
		.get_ticket_view(&ticket.id)
		.await?
		.ok_or_else(|| ServerError::Internal("ticket vanished after creation".to_string()))?;
	Ok(api_response::created(
		"Ticket created successfully",
		TicketResponse::from(&view),
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn get_ticket(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<TicketId>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &id).await?;
	authorize(&current_user, Action::Read, &ticket_attrs(&ticket))?;
	respond_with_ticket(&state, &id, "Ticket retrieved successfully").await
}

/// General update. Status and assignee changes are staff-only; the creator
/// may edit the remaining fields while the ticket is open.
#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn update_ticket(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<TicketId>,
	ApiJson(body): ApiJson<UpdateTicketRequest>,
) -> Result<Response, ServerError> {
	let mut ticket = load_ticket(&state, &id).await?;
	authorize(&current_user, Action::Update, &ticket_attrs(&ticket))?;
	if body.touches_staff_fields() && !current_user.user.is_staff() {
		tracing::warn!(ticket_id = %id, "non-staff attempted to change status or assignee");
		return Err(ServerError::Forbidden(
			"Only support staff can change the status or assignee of a ticket".to_string(),
		));
	}

	let mut errors = FieldErrors::new();
	if let Some(title) = &body.title {
		errors.check("title", validate_title(title));
	}
	if let Some(description) = &body.description {
		errors.check("description", validate_description(description));
	}
	let priority = parse_optional(
		&mut errors,
		"priority",
		body.priority.as_deref(),
		parse_priority,
	);
	let status = parse_optional(&mut errors, "status", body.status.as_deref(), parse_status);
	let category_id = match body.category_id {
		Some(requested) => Some(check_category(&state, &mut errors, requested).await?),
		None => None,
	};
	let assignee_id = match body.assignee_id {
		Some(requested) => Some(check_assignee(&state, &mut errors, requested).await?),
		None => None,
	};
	errors.into_result()?;

	if let Some(title) = &body.title {
		ticket.title = title.trim().to_string();
	}
	if let Some(description) = &body.description {
		ticket.description = description.trim().to_string();
	}
	if let Some(priority) = priority {
		ticket.priority = priority;
	}
	if let Some(category_id) = category_id {
		ticket.category_id = category_id;
	}
	if let Some(assignee_id) = assignee_id {
		ticket.assignee_id = assignee_id;
	}
	let now = Utc::now();
	if let Some(status) = status {
		apply_status(&mut ticket, status, now)?;
	}
	ticket.updated_at = now;

	state.tickets.update_ticket(&ticket).await?;
	tracing::info!(ticket_id = %id, status = %ticket.status, "ticket updated");
	respond_with_ticket(&state, &id, "Ticket updated successfully").await
}

#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn update_status(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<TicketId>,
	ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Response, ServerError> {
	let mut ticket = load_ticket(&state, &id).await?;
	authorize(&current_user, Action::UpdateStatus, &ticket_attrs(&ticket))?;

	let Some(raw) = body.status.as_deref() else {
		return Err(ServerError::field("status", REQUIRED));
	};
	let status = parse_status(raw).map_err(|message| ServerError::field("status", message))?;

	let previous = ticket.status;
	let now = Utc::now();
	apply_status(&mut ticket, status, now)?;
	ticket.updated_at = now;

	state.tickets.update_ticket(&ticket).await?;
	tracing::info!(ticket_id = %id, from = %previous, to = %status, "ticket status changed");
	respond_with_ticket(&state, &id, "Ticket status updated successfully").await
}

#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn assign_ticket(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<TicketId>,
	ApiJson(body): ApiJson<AssignTicketRequest>,
) -> Result<Response, ServerError> {
	let mut ticket = load_ticket(&state, &id).await?;
	authorize(&current_user, Action::Assign, &ticket_attrs(&ticket))?;

	let Some(requested) = body.assignee_id else {
		return Err(ServerError::field("assigneeId", REQUIRED));
	};
	let mut errors = FieldErrors::new();
	let assignee_id = check_assignee(&state, &mut errors, requested).await?;
	errors.into_result()?;

	ticket.assignee_id = assignee_id;
	ticket.updated_at = Utc::now();
	state.tickets.update_ticket(&ticket).await?;

	match assignee_id {
		Some(assignee_id) => tracing::info!(ticket_id = %id, assignee_id = %assignee_id, "ticket assigned"),
		None => tracing::info!(ticket_id = %id, "ticket unassigned"),
	}
	respond_with_ticket(&state, &id, "Ticket assigned successfully").await
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn delete_ticket(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<TicketId>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &id).await?;
	authorize(&current_user, Action::Delete, &ticket_attrs(&ticket))?;

	let stored_paths = state.attachments.list_stored_paths_for_ticket(&id).await?;
	if !state.tickets.delete_ticket(&id).await? {
		return Err(ServerError::NotFound("Ticket".to_string()));
	}
	delete_files_best_effort(state.storage.as_ref(), &stored_paths).await;

	tracing::info!(ticket_id = %id, files = stored_paths.len(), "ticket deleted");
	Ok(api_response::message("Ticket deleted successfully"))
}

async fn respond_with_ticket(
	state: &AppState,
	id: &TicketId,
	message: &str,
) -> Result<Response, ServerError> {
	let view = state
		.tickets
		.get_ticket_view(id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Ticket".to_string()))?;
	Ok(api_response::ok(message, TicketResponse::from(&view)))
}

/// Resolves a requested category, recording an error if it does not exist.
async fn check_category(
	state: &AppState,
	errors: &mut FieldErrors,
	requested: Option<Uuid>,
) -> Result<Option<CategoryId>, ServerError> {
	let Some(uuid) = requested else {
		return Ok(None);
	};
	let id = CategoryId::new(uuid);
	if state.categories.get_category(&id).await?.is_none() {
		errors.add("categoryId", "Category does not exist");
	}
	Ok(Some(id))
}

/// Resolves a requested assignee. `None` unassigns; anyone else must be an
/// active support user or administrator.
async fn check_assignee(
	state: &AppState,
	errors: &mut FieldErrors,
	requested: Option<Uuid>,
) -> Result<Option<UserId>, ServerError> {
	let Some(uuid) = requested else {
		return Ok(None);
	};
	let id = UserId::new(uuid);
	match state.users.get_user_by_id(&id).await? {
		None => errors.add("assigneeId", "User does not exist"),
		Some(user) if !user.is_assignable() => errors.add(
			"assigneeId",
			"Assignee must be an active support user or administrator",
		),
		Some(_) => {}
	}
	Ok(Some(id))
}

