// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use helpdesk_server_auth::{CommentId, TicketId};
use helpdesk_server_db::CommentView;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::users::UserBriefResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub id: CommentId,
	pub text: String,
	pub author: UserBriefResponse,
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub ticket_id: TicketId,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub is_private: bool,
}

impl From<&CommentView> for CommentResponse {
	fn from(view: &CommentView) -> Self {
		let comment = &view.comment;
		Self {
			id: comment.id,
			text: comment.text.clone(),
			author: UserBriefResponse::from(&view.author),
			ticket_id: comment.ticket_id,
			created_at: comment.created_at,
			updated_at: comment.updated_at,
			is_private: comment.is_private,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CommentListResponse {
	pub count: usize,
	pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
	#[serde(default)]
	pub text: String,
	#[serde(default)]
	pub is_private: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateCommentRequest {
	#[serde(default)]
	pub text: String,
}
