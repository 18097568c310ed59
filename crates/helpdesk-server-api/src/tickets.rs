// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use helpdesk_server_auth::{CategoryId, TicketId, TicketPriority, TicketStatus};
use helpdesk_server_db::{CategoryRef, TicketView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::deserialize_nullable;
use crate::users::UserBriefResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CategoryBrief {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub id: CategoryId,
	pub name: String,
}

impl From<&CategoryRef> for CategoryBrief {
	fn from(category: &CategoryRef) -> Self {
		Self {
			id: category.id,
			name: category.name.clone(),
		}
	}
}

/// A ticket with its people, category, and activity counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub id: TicketId,
	pub title: String,
	pub description: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, example = "in_progress"))]
	pub status: TicketStatus,
	pub display_status: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, example = "high"))]
	pub priority: TicketPriority,
	pub display_priority: String,
	pub creator: UserBriefResponse,
	pub assignee: Option<UserBriefResponse>,
	pub category: Option<CategoryBrief>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub resolved_at: Option<DateTime<Utc>>,
	pub comments_count: i64,
	pub attachments_count: i64,
}

impl From<&TicketView> for TicketResponse {
	fn from(view: &TicketView) -> Self {
		let ticket = &view.ticket;
		Self {
			id: ticket.id,
			title: ticket.title.clone(),
			description: ticket.description.clone(),
			status: ticket.status,
			display_status: ticket.status.display_name().to_string(),
			priority: ticket.priority,
			display_priority: ticket.priority.display_name().to_string(),
			creator: UserBriefResponse::from(&view.creator),
			assignee: view.assignee.as_ref().map(UserBriefResponse::from),
			category: view.category.as_ref().map(CategoryBrief::from),
			created_at: ticket.created_at,
			updated_at: ticket.updated_at,
			resolved_at: ticket.resolved_at,
			comments_count: view.comments_count,
			attachments_count: view.attachments_count,
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	/// Defaults to `medium`.
	pub priority: Option<String>,
	pub category_id: Option<Uuid>,
}

/// General ticket update. `assigneeId` and `categoryId` distinguish an
/// absent field from an explicit `null`, which clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
	pub title: Option<String>,
	pub description: Option<String>,
	pub priority: Option<String>,
	pub status: Option<String>,
	#[serde(default, deserialize_with = "deserialize_nullable")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
	pub assignee_id: Option<Option<Uuid>>,
	#[serde(default, deserialize_with = "deserialize_nullable")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
	pub category_id: Option<Option<Uuid>>,
}

impl UpdateTicketRequest {
	/// Whether the payload touches fields reserved for staff.
	pub fn touches_staff_fields(&self) -> bool {
		self.status.is_some() || self.assignee_id.is_some()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateStatusRequest {
	pub status: Option<String>,
}

/// `assigneeId` is required; `null` unassigns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketRequest {
	#[serde(default, deserialize_with = "deserialize_nullable")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
	pub assignee_id: Option<Option<Uuid>>,
}

/// Ticket list filters. Pagination comes from [`crate::PageParams`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct TicketListParams {
	pub status: Option<String>,
	pub priority: Option<String>,
	#[serde(alias = "category_id")]
	pub category_id: Option<Uuid>,
	pub search: Option<String>,
}
