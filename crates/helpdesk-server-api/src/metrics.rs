// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use helpdesk_server_auth::{Role, UserId};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusMetrics {
	pub total: i64,
	pub open: i64,
	pub in_progress: i64,
	pub resolved: i64,
	pub closed: i64,
	pub canceled: i64,
	pub unassigned: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PriorityMetrics {
	pub low: i64,
	pub medium: i64,
	pub high: i64,
	pub urgent: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TicketOverviewResponse {
	pub status_metrics: StatusMetrics,
	pub priority_metrics: PriorityMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetricsResponse {
	/// Hours, rounded to two decimals.
	pub average_resolution_time: f64,
	pub total_resolved: i64,
	pub total_created_today: i64,
	pub total_created_this_week: i64,
	pub total_created_this_month: i64,
	/// Percent of all tickets currently resolved, rounded to two decimals.
	pub resolution_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserActivityEntry {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub user_id: UserId,
	pub user_name: String,
	pub email: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String))]
	pub role: Role,
	pub tickets_created: i64,
	pub tickets_assigned: i64,
	pub tickets_resolved: i64,
	pub comments_posted: i64,
	pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserActivityResponse {
	pub count: usize,
	pub users: Vec<UserActivityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SystemHealthResponse {
	/// `healthy`, `warning`, or `critical`.
	pub status: String,
	pub total_users: i64,
	pub active_users: i64,
	pub total_tickets: i64,
	pub open_tickets: i64,
	pub urgent_tickets: i64,
	pub unassigned_tickets: i64,
	/// Hours, rounded to two decimals.
	pub average_response_time: f64,
}
