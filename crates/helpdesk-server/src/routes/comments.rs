// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket comment HTTP handlers.

use axum::{extract::State, response::Response};
use helpdesk_server_api::{
	CommentListResponse, CommentResponse, CreateCommentRequest, UpdateCommentRequest,
};
use helpdesk_server_auth::{Action, CommentId, ResourceAttrs, TicketId};
use helpdesk_server_db::{Comment, CommentView, Ticket};

use super::{activity_attrs, authorize, load_ticket};
use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::extract::{ApiJson, ApiPath};
use crate::validation::{validate_comment_text, FieldErrors};

fn comment_attrs(ticket: &Ticket, view: &CommentView) -> ResourceAttrs {
	ResourceAttrs::comment(view.comment.author_id, ticket.creator_id, ticket.assignee_id)
		.with_private(view.comment.is_private)
}

async fn load_comment(
	state: &AppState,
	ticket_id: &TicketId,
	comment_id: &CommentId,
) -> Result<CommentView, ServerError> {
	state
		.comments
		.get_comment(ticket_id, comment_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Comment".to_string()))
}

/// Comments oldest first. Private comments only reach staff.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn list_comments(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(ticket_id): ApiPath<TicketId>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	authorize(&current_user, Action::Read, &activity_attrs(&ticket))?;

	let include_private = current_user.user.is_staff();
	let comments: Vec<CommentResponse> = state
		.comments
		.list_comments(&ticket_id, include_private)
		.await?
		.iter()
		.map(CommentResponse::from)
		.collect();

	Ok(api_response::ok(
		"Comments retrieved successfully",
		CommentListResponse {
			count: comments.len(),
			comments,
		},
	))
}

#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn create_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(ticket_id): ApiPath<TicketId>,
	ApiJson(body): ApiJson<CreateCommentRequest>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let attrs = activity_attrs(&ticket);
	authorize(&current_user, Action::Create, &attrs)?;

	let mut errors = FieldErrors::new();
	errors.check("text", validate_comment_text(&body.text));
	if body.is_private
		&& !helpdesk_server_auth::is_allowed(&current_user.subject(), Action::CreatePrivate, &attrs)
	{
		errors.add("isPrivate", "Only support staff can create private comments");
	}
	errors.into_result()?;

	let comment = Comment::new(
		ticket_id,
		current_user.user_id(),
		body.text.trim(),
		body.is_private,
	);
	state.comments.create_comment(&comment).await?;
	tracing::info!(
		ticket_id = %ticket_id,
		comment_id = %comment.id,
		is_private = comment.is_private,
		"comment created"
	);

	let view = load_comment(&state, &ticket_id, &comment.id).await?;
	Ok(api_response::created(
		"Comment created successfully",
		CommentResponse::from(&view),
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn get_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((ticket_id, comment_id)): ApiPath<(TicketId, CommentId)>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let view = load_comment(&state, &ticket_id, &comment_id).await?;
	authorize(&current_user, Action::Read, &comment_attrs(&ticket, &view))?;

	Ok(api_response::ok(
		"Comment retrieved successfully",
		CommentResponse::from(&view),
	))
}

/// Author or administrator only.
#[tracing::instrument(skip(state, body), fields(user_id = %current_user.user_id()))]
pub async fn update_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((ticket_id, comment_id)): ApiPath<(TicketId, CommentId)>,
	ApiJson(body): ApiJson<UpdateCommentRequest>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let view = load_comment(&state, &ticket_id, &comment_id).await?;
	authorize(&current_user, Action::Update, &comment_attrs(&ticket, &view))?;

	let mut errors = FieldErrors::new();
	errors.check("text", validate_comment_text(&body.text));
	errors.into_result()?;

	state
		.comments
		.update_comment_text(&comment_id, body.text.trim())
		.await?;
	tracing::info!(ticket_id = %ticket_id, comment_id = %comment_id, "comment updated");

	let view = load_comment(&state, &ticket_id, &comment_id).await?;
	Ok(api_response::ok(
		"Comment updated successfully",
		CommentResponse::from(&view),
	))
}

/// Author or administrator only.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn delete_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((ticket_id, comment_id)): ApiPath<(TicketId, CommentId)>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let view = load_comment(&state, &ticket_id, &comment_id).await?;
	authorize(&current_user, Action::Delete, &comment_attrs(&ticket, &view))?;

	if !state.comments.delete_comment(&comment_id).await? {
		return Err(ServerError::NotFound("Comment".to_string()));
	}
	tracing::info!(ticket_id = %ticket_id, comment_id = %comment_id, "comment deleted");
	Ok(api_response::message("Comment deleted successfully"))
}
