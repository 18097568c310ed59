// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Metric rollups over the raw counters in [`MetricsStore`].
//!
//! The store returns counts and timestamp pairs; averaging, rounding, and
//! the health classification happen here.

use chrono::{DateTime, Duration, Utc};
use helpdesk_server_api::{
	PerformanceMetricsResponse, PriorityMetrics, StatusMetrics, SystemHealthResponse,
	TicketOverviewResponse, UserActivityEntry, UserActivityResponse,
};
use helpdesk_server_db::{DbError, MetricsStore, TimeSpan, UserActivityRow};

/// Unassigned tickets above this count put the system in `warning`.
pub const UNASSIGNED_WARNING_THRESHOLD: i64 = 10;
/// Unassigned tickets above this count put the system in `critical`.
pub const UNASSIGNED_CRITICAL_THRESHOLD: i64 = 20;
/// Urgent tickets above this count put the system in `critical`.
pub const URGENT_CRITICAL_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
	Healthy,
	Warning,
	Critical,
}

impl HealthStatus {
	pub fn classify(unassigned: i64, urgent: i64) -> Self {
		if urgent > URGENT_CRITICAL_THRESHOLD || unassigned > UNASSIGNED_CRITICAL_THRESHOLD {
			HealthStatus::Critical
		} else if unassigned > UNASSIGNED_WARNING_THRESHOLD {
			HealthStatus::Warning
		} else {
			HealthStatus::Healthy
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			HealthStatus::Healthy => "healthy",
			HealthStatus::Warning => "warning",
			HealthStatus::Critical => "critical",
		}
	}
}

pub fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

/// Mean span length in hours, rounded to two places. Zero when empty.
pub fn average_hours(spans: &[TimeSpan]) -> f64 {
	if spans.is_empty() {
		return 0.0;
	}
	let total_seconds: i64 = spans
		.iter()
		.map(|span| (span.end - span.start).num_seconds())
		.sum();
	round2(total_seconds as f64 / 3600.0 / spans.len() as f64)
}

/// Percentage of `part` in `total`, rounded to two places.
pub fn percentage(part: i64, total: i64) -> f64 {
	if total <= 0 {
		return 0.0;
	}
	round2(part as f64 / total as f64 * 100.0)
}

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
	now.date_naive()
		.and_hms_opt(0, 0, 0)
		.map(|naive| naive.and_utc())
		.unwrap_or(now)
}

/// Most recent of the login, newest ticket, and newest comment. Accounts
/// with none of those fall back to their creation time.
pub fn last_activity(row: &UserActivityRow) -> DateTime<Utc> {
	[row.user.last_login, row.last_ticket_at, row.last_comment_at]
		.into_iter()
		.flatten()
		.max()
		.unwrap_or(row.user.created_at)
}

#[tracing::instrument(skip(store))]
pub async fn ticket_overview(store: &dyn MetricsStore) -> Result<TicketOverviewResponse, DbError> {
	let status = store.status_counts().await?;
	let priority = store.priority_counts().await?;
	Ok(TicketOverviewResponse {
		status_metrics: StatusMetrics {
			total: status.total,
			open: status.open,
			in_progress: status.in_progress,
			resolved: status.resolved,
			closed: status.closed,
			canceled: status.canceled,
			unassigned: status.unassigned,
		},
		priority_metrics: PriorityMetrics {
			low: priority.low,
			medium: priority.medium,
			high: priority.high,
			urgent: priority.urgent,
		},
	})
}

#[tracing::instrument(skip(store))]
pub async fn performance(
	store: &dyn MetricsStore,
	now: DateTime<Utc>,
) -> Result<PerformanceMetricsResponse, DbError> {
	let resolution_spans = store.resolution_spans().await?;
	let status = store.status_counts().await?;
	let total_resolved = resolution_spans.len() as i64;

	Ok(PerformanceMetricsResponse {
		average_resolution_time: average_hours(&resolution_spans),
		total_resolved,
		total_created_today: store.count_created_since(start_of_day(now)).await?,
		total_created_this_week: store.count_created_since(now - Duration::days(7)).await?,
		total_created_this_month: store.count_created_since(now - Duration::days(30)).await?,
		resolution_rate: percentage(total_resolved, status.total),
	})
}

#[tracing::instrument(skip(store))]
pub async fn user_activity(store: &dyn MetricsStore) -> Result<UserActivityResponse, DbError> {
	let mut users: Vec<UserActivityEntry> = store
		.user_activity()
		.await?
		.iter()
		.map(|row| UserActivityEntry {
			user_id: row.user.id,
			user_name: row.user.full_name(),
			email: row.user.email.clone(),
			role: row.user.role,
			tickets_created: row.tickets_created,
			tickets_assigned: row.tickets_assigned,
			tickets_resolved: row.tickets_resolved,
			comments_posted: row.comments_posted,
			last_activity: last_activity(row),
		})
		.collect();
	users.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));

	Ok(UserActivityResponse {
		count: users.len(),
		users,
	})
}

#[tracing::instrument(skip(store))]
pub async fn system_health(store: &dyn MetricsStore) -> Result<SystemHealthResponse, DbError> {
	let users = store.user_counts().await?;
	let status = store.status_counts().await?;
	let priority = store.priority_counts().await?;
	let response_spans = store.response_spans().await?;

	let health = HealthStatus::classify(status.unassigned, priority.urgent);
	if health != HealthStatus::Healthy {
		tracing::warn!(
			status = health.as_str(),
			unassigned = status.unassigned,
			urgent = priority.urgent,
			"ticket backlog needs attention"
		);
	}

	Ok(SystemHealthResponse {
		status: health.as_str().to_string(),
		total_users: users.total,
		active_users: users.active,
		total_tickets: status.total,
		open_tickets: status.open,
		urgent_tickets: priority.urgent,
		unassigned_tickets: status.unassigned,
		average_response_time: average_hours(&response_spans),
	})
}
