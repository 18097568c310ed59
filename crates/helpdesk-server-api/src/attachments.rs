// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use helpdesk_server_auth::{AttachmentId, TicketId};
use helpdesk_server_db::AttachmentView;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::users::UserBriefResponse;

/// Attachment metadata. The bytes are served from `fileUrl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub id: AttachmentId,
	pub original_filename: String,
	pub file_url: String,
	pub file_size: i64,
	pub mime_type: String,
	pub uploaded_by: UserBriefResponse,
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub ticket_id: TicketId,
	pub created_at: DateTime<Utc>,
	pub is_private: bool,
}

impl AttachmentResponse {
	/// `base_url` is the public server origin without a trailing slash.
	pub fn from_view(view: &AttachmentView, base_url: &str) -> Self {
		let attachment = &view.attachment;
		Self {
			id: attachment.id,
			original_filename: attachment.original_filename.clone(),
			file_url: format!(
				"{base_url}/api/tickets/{}/attachments/{}/download",
				attachment.ticket_id, attachment.id
			),
			file_size: attachment.file_size,
			mime_type: attachment.mime_type.clone(),
			uploaded_by: UserBriefResponse::from(&view.uploader),
			ticket_id: attachment.ticket_id,
			created_at: attachment.created_at,
			is_private: attachment.is_private,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AttachmentListResponse {
	pub count: usize,
	pub attachments: Vec<AttachmentResponse>,
}
