// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket attachment HTTP handlers.

use axum::{
	extract::{multipart::MultipartRejection, Multipart, State},
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};
use chrono::Utc;
use helpdesk_server_api::{AttachmentListResponse, AttachmentResponse};
use helpdesk_server_auth::{is_allowed, Action, AttachmentId, ResourceAttrs, TicketId};
use helpdesk_server_db::{Attachment, AttachmentView, Ticket};

use super::{activity_attrs, authorize, load_ticket};
use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::extract::ApiPath;
use crate::storage::{delete_files_best_effort, guess_mime_type, validate_upload};
use crate::validation::FieldErrors;

/// A file read from the multipart body.
struct Upload {
	filename: String,
	bytes: Vec<u8>,
}

fn attachment_attrs(ticket: &Ticket, view: &AttachmentView) -> ResourceAttrs {
	ResourceAttrs::attachment(
		view.attachment.uploaded_by,
		ticket.creator_id,
		ticket.assignee_id,
	)
	.with_private(view.attachment.is_private)
}

async fn load_attachment(
	state: &AppState,
	ticket_id: &TicketId,
	attachment_id: &AttachmentId,
) -> Result<AttachmentView, ServerError> {
	state
		.attachments
		.get_attachment(ticket_id, attachment_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Attachment".to_string()))
}

fn parse_flag(value: &str) -> bool {
	matches!(
		value.trim().to_ascii_lowercase().as_str(),
		"true" | "1" | "on" | "yes"
	)
}

/// Reads the `file` and `isPrivate` parts.
async fn read_upload(mut multipart: Multipart) -> Result<(Option<Upload>, bool), ServerError> {
	let mut upload = None;
	let mut is_private = false;

	loop {
		let field = match multipart.next_field().await {
			Ok(Some(field)) => field,
			Ok(None) => break,
			Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
				return Err(ServerError::field("file", "File exceeds the maximum upload size"));
			}
			Err(e) => {
				return Err(ServerError::bad_request(format!(
					"Invalid multipart body: {}",
					e.body_text()
				)))
			}
		};

		let name = field.name().map(str::to_string);
		match name.as_deref() {
			Some("file") => {
				let filename = field.file_name().unwrap_or_default().to_string();
				let bytes = field.bytes().await.map_err(|e| {
					if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
						ServerError::field("file", "File exceeds the maximum upload size")
					} else {
						ServerError::bad_request(format!("Invalid multipart body: {}", e.body_text()))
					}
				})?;
				upload = Some(Upload {
					filename,
					bytes: bytes.to_vec(),
				});
			}
			Some("isPrivate") | Some("is_private") => {
				let text = field
					.text()
					.await
					.map_err(|e| ServerError::bad_request(format!("Invalid multipart body: {}", e.body_text())))?;
				is_private = parse_flag(&text);
			}
			_ => {}
		}
	}

	Ok((upload, is_private))
}

/// Attachments newest first. Private attachments only reach staff.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn list_attachments(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(ticket_id): ApiPath<TicketId>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	authorize(&current_user, Action::Read, &activity_attrs(&ticket))?;

	let include_private = current_user.user.is_staff();
	let attachments: Vec<AttachmentResponse> = state
		.attachments
		.list_attachments(&ticket_id, include_private)
		.await?
		.iter()
		.map(|view| AttachmentResponse::from_view(view, &state.base_url))
		.collect();

	Ok(api_response::ok(
		"Attachments retrieved successfully",
		AttachmentListResponse {
			count: attachments.len(),
			attachments,
		},
	))
}

#[tracing::instrument(skip(state, multipart), fields(user_id = %current_user.user_id()))]
pub async fn upload_attachment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(ticket_id): ApiPath<TicketId>,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let attrs = activity_attrs(&ticket);
	authorize(&current_user, Action::Create, &attrs)?;

	let multipart = multipart.map_err(|rejection| {
		ServerError::bad_request(format!(
			"Expected a multipart/form-data body: {}",
			rejection.body_text()
		))
	})?;
	let (upload, is_private) = read_upload(multipart).await?;

	let mut errors = FieldErrors::new();
	match &upload {
		None => errors.add("file", "This field is required"),
		Some(upload) => errors.check(
			"file",
			validate_upload(
				&upload.filename,
				upload.bytes.len() as u64,
				state.max_upload_bytes,
			)
			.map_err(|e| e.to_string()),
		),
	}
	if is_private && !is_allowed(&current_user.subject(), Action::CreatePrivate, &attrs) {
		errors.add("isPrivate", "Only support staff can upload private attachments");
	}
	errors.into_result()?;
	let Some(upload) = upload else {
		return Err(ServerError::field("file", "This field is required"));
	};

	let stored_path = state
		.storage
		.save(&ticket_id, &upload.filename, &upload.bytes)
		.await?;
	let attachment = Attachment {
		id: AttachmentId::generate(),
		ticket_id,
		uploaded_by: current_user.user_id(),
		mime_type: guess_mime_type(&upload.filename),
		original_filename: upload.filename,
		stored_path,
		file_size: upload.bytes.len() as i64,
		is_private,
		created_at: Utc::now(),
	};

	if let Err(e) = state.attachments.create_attachment(&attachment).await {
		delete_files_best_effort(
			state.storage.as_ref(),
			std::slice::from_ref(&attachment.stored_path),
		)
		.await;
		return Err(e.into());
	}
	tracing::info!(
		ticket_id = %ticket_id,
		attachment_id = %attachment.id,
		size = attachment.file_size,
		is_private,
		"attachment uploaded"
	);

	let view = load_attachment(&state, &ticket_id, &attachment.id).await?;
	Ok(api_response::created(
		"File uploaded successfully",
		AttachmentResponse::from_view(&view, &state.base_url),
	))
}

#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn get_attachment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((ticket_id, attachment_id)): ApiPath<(TicketId, AttachmentId)>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let view = load_attachment(&state, &ticket_id, &attachment_id).await?;
	authorize(&current_user, Action::Read, &attachment_attrs(&ticket, &view))?;

	Ok(api_response::ok(
		"Attachment retrieved successfully",
		AttachmentResponse::from_view(&view, &state.base_url),
	))
}

/// Raw file bytes with the stored MIME type.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn download_attachment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((ticket_id, attachment_id)): ApiPath<(TicketId, AttachmentId)>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let view = load_attachment(&state, &ticket_id, &attachment_id).await?;
	authorize(&current_user, Action::Read, &attachment_attrs(&ticket, &view))?;

	let bytes = state.storage.read(&view.attachment.stored_path).await?;
	tracing::debug!(attachment_id = %attachment_id, size = bytes.len(), "attachment downloaded");

	Ok((
		[
			(header::CONTENT_TYPE, view.attachment.mime_type.clone()),
			(
				header::CONTENT_DISPOSITION,
				content_disposition(&view.attachment.original_filename),
			),
		],
		bytes,
	)
		.into_response())
}

/// Uploader or administrator only. The record goes even if the file cannot
/// be removed.
#[tracing::instrument(skip(state), fields(user_id = %current_user.user_id()))]
pub async fn delete_attachment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((ticket_id, attachment_id)): ApiPath<(TicketId, AttachmentId)>,
) -> Result<Response, ServerError> {
	let ticket = load_ticket(&state, &ticket_id).await?;
	let view = load_attachment(&state, &ticket_id, &attachment_id).await?;
	authorize(&current_user, Action::Delete, &attachment_attrs(&ticket, &view))?;

	if !state.attachments.delete_attachment(&attachment_id).await? {
		return Err(ServerError::NotFound("Attachment".to_string()));
	}
	delete_files_best_effort(
		state.storage.as_ref(),
		std::slice::from_ref(&view.attachment.stored_path),
	)
	.await;

	tracing::info!(ticket_id = %ticket_id, attachment_id = %attachment_id, "attachment deleted");
	Ok(api_response::message("Attachment deleted successfully"))
}

/// `attachment; filename="..."` restricted to printable ASCII.
fn content_disposition(filename: &str) -> String {
	let safe: String = filename
		.chars()
		.map(|c| {
			if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
				c
			} else {
				'_'
			}
		})
		.collect();
	format!("attachment; filename=\"{safe}\"")
}
