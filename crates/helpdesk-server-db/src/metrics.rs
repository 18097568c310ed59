// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only aggregate queries for the reporting endpoints.
//!
//! The store returns raw counts and timestamp spans; averaging, rounding and
//! health classification happen in the server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helpdesk_server_auth::User;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{format_timestamp, parse_optional_timestamp, parse_timestamp};
use crate::user::parse_user_row;

/// Ticket counts per status, plus the unassigned total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
	pub total: i64,
	pub open: i64,
	pub in_progress: i64,
	pub resolved: i64,
	pub closed: i64,
	pub canceled: i64,
	pub unassigned: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
	pub low: i64,
	pub medium: i64,
	pub high: i64,
	pub urgent: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
	pub total: i64,
	pub active: i64,
}

/// A start/end pair used for duration averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
	pub start: DateTime<Utc>,
	pub end: DateTime<Utc>,
}

/// Per-user activity counters for one active account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivityRow {
	pub user: User,
	pub tickets_created: i64,
	pub tickets_assigned: i64,
	/// Tickets assigned to the user that are currently resolved.
	pub tickets_resolved: i64,
	pub comments_posted: i64,
	pub last_ticket_at: Option<DateTime<Utc>>,
	pub last_comment_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait MetricsStore: Send + Sync {
	async fn status_counts(&self) -> Result<StatusCounts, DbError>;
	async fn priority_counts(&self) -> Result<PriorityCounts, DbError>;
	async fn user_counts(&self) -> Result<UserCounts, DbError>;
	async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, DbError>;
	async fn resolution_spans(&self) -> Result<Vec<TimeSpan>, DbError>;
	async fn response_spans(&self) -> Result<Vec<TimeSpan>, DbError>;
	async fn user_activity(&self) -> Result<Vec<UserActivityRow>, DbError>;
}

/// Repository for reporting queries.
#[derive(Clone)]
pub struct MetricsRepository {
	pool: SqlitePool,
}

impl MetricsRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn status_counts(&self) -> Result<StatusCounts, DbError> {
		let row = sqlx::query(
			r#"
			SELECT COUNT(*) AS total,
				   COALESCE(SUM(CASE WHEN status = 'open' THEN 1 ELSE 0 END), 0) AS open,
				   COALESCE(SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END), 0) AS in_progress,
				   COALESCE(SUM(CASE WHEN status = 'resolved' THEN 1 ELSE 0 END), 0) AS resolved,
				   COALESCE(SUM(CASE WHEN status = 'closed' THEN 1 ELSE 0 END), 0) AS closed,
				   COALESCE(SUM(CASE WHEN status = 'canceled' THEN 1 ELSE 0 END), 0) AS canceled,
				   COALESCE(SUM(CASE WHEN assignee_id IS NULL THEN 1 ELSE 0 END), 0) AS unassigned
			FROM tickets
			"#,
		)
		.fetch_one(&self.pool)
		.await?;

		Ok(StatusCounts {
			total: row.get("total"),
			open: row.get("open"),
			in_progress: row.get("in_progress"),
			resolved: row.get("resolved"),
			closed: row.get("closed"),
			canceled: row.get("canceled"),
			unassigned: row.get("unassigned"),
		})
	}

	#[tracing::instrument(skip(self))]
	pub async fn priority_counts(&self) -> Result<PriorityCounts, DbError> {
		let rows: Vec<(String, i64)> =
			sqlx::query_as("SELECT priority, COUNT(*) FROM tickets GROUP BY priority")
				.fetch_all(&self.pool)
				.await?;

		let mut counts = PriorityCounts::default();
		for (priority, count) in rows {
			match priority.as_str() {
				"low" => counts.low = count,
				"medium" => counts.medium = count,
				"high" => counts.high = count,
				"urgent" => counts.urgent = count,
				other => tracing::warn!(priority = other, "unknown ticket priority in store"),
			}
		}
		Ok(counts)
	}

	#[tracing::instrument(skip(self))]
	pub async fn user_counts(&self) -> Result<UserCounts, DbError> {
		let (total, active): (i64, i64) = sqlx::query_as(
			"SELECT COUNT(*), COALESCE(SUM(CASE WHEN is_active = 1 THEN 1 ELSE 0 END), 0) FROM users",
		)
		.fetch_one(&self.pool)
		.await?;
		Ok(UserCounts { total, active })
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, DbError> {
		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE created_at >= ?")
			.bind(format_timestamp(&since))
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	/// `created_at → resolved_at` for tickets currently resolved.
	#[tracing::instrument(skip(self))]
	pub async fn resolution_spans(&self) -> Result<Vec<TimeSpan>, DbError> {
		let rows: Vec<(String, String)> = sqlx::query_as(
			"SELECT created_at, resolved_at FROM tickets WHERE status = 'resolved' AND resolved_at IS NOT NULL",
		)
		.fetch_all(&self.pool)
		.await?;
		parse_spans(rows, "resolved_at")
	}

	/// `created_at → updated_at` for assigned tickets. Approximates time to
	/// first response, since assignment history is not kept.
	#[tracing::instrument(skip(self))]
	pub async fn response_spans(&self) -> Result<Vec<TimeSpan>, DbError> {
		let rows: Vec<(String, String)> = sqlx::query_as(
			"SELECT created_at, updated_at FROM tickets WHERE assignee_id IS NOT NULL",
		)
		.fetch_all(&self.pool)
		.await?;
		parse_spans(rows, "updated_at")
	}

	#[tracing::instrument(skip(self))]
	pub async fn user_activity(&self) -> Result<Vec<UserActivityRow>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT u.id, u.email, u.first_name, u.last_name, u.role, u.is_active,
				   u.created_at, u.updated_at, u.last_login,
				   (SELECT COUNT(*) FROM tickets t WHERE t.creator_id = u.id) AS tickets_created,
				   (SELECT COUNT(*) FROM tickets t WHERE t.assignee_id = u.id) AS tickets_assigned,
				   (SELECT COUNT(*) FROM tickets t
					 WHERE t.assignee_id = u.id AND t.status = 'resolved') AS tickets_resolved,
				   (SELECT COUNT(*) FROM comments c WHERE c.author_id = u.id) AS comments_posted,
				   (SELECT MAX(t.created_at) FROM tickets t WHERE t.creator_id = u.id) AS last_ticket_at,
				   (SELECT MAX(c.created_at) FROM comments c WHERE c.author_id = u.id) AS last_comment_at
			FROM users u
			WHERE u.is_active = 1
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		let activity = rows
			.iter()
			.map(|row| {
				Ok(UserActivityRow {
					user: parse_user_row(row)?,
					tickets_created: row.get("tickets_created"),
					tickets_assigned: row.get("tickets_assigned"),
					tickets_resolved: row.get("tickets_resolved"),
					comments_posted: row.get("comments_posted"),
					last_ticket_at: parse_optional_timestamp("last_ticket_at", row.get("last_ticket_at"))?,
					last_comment_at: parse_optional_timestamp(
						"last_comment_at",
						row.get("last_comment_at"),
					)?,
				})
			})
			.collect::<Result<Vec<_>, DbError>>()?;

		tracing::debug!(users = activity.len(), "user activity loaded");
		Ok(activity)
	}
}

#[async_trait]
impl MetricsStore for MetricsRepository {
	async fn status_counts(&self) -> Result<StatusCounts, DbError> {
		self.status_counts().await
	}

	async fn priority_counts(&self) -> Result<PriorityCounts, DbError> {
		self.priority_counts().await
	}

	async fn user_counts(&self) -> Result<UserCounts, DbError> {
		self.user_counts().await
	}

	async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, DbError> {
		self.count_created_since(since).await
	}

	async fn resolution_spans(&self) -> Result<Vec<TimeSpan>, DbError> {
		self.resolution_spans().await
	}

	async fn response_spans(&self) -> Result<Vec<TimeSpan>, DbError> {
		self.response_spans().await
	}

	async fn user_activity(&self) -> Result<Vec<UserActivityRow>, DbError> {
		self.user_activity().await
	}
}

fn parse_spans(rows: Vec<(String, String)>, end_field: &str) -> Result<Vec<TimeSpan>, DbError> {
	rows.into_iter()
		.map(|(start, end)| {
			Ok(TimeSpan {
				start: parse_timestamp("created_at", &start)?,
				end: parse_timestamp(end_field, &end)?,
			})
		})
		.collect()
}
