// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket repository.
//!
//! Tickets are read either as bare [`Ticket`] records (for authorization and
//! lifecycle decisions) or as [`TicketView`]s that join in the creator,
//! assignee, category, and activity counts for responses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helpdesk_server_auth::{
	CategoryId, Role, TicketId, TicketPriority, TicketStatus, UserId, UserSummary,
};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{conflict_on_foreign_key, DbError};
use crate::types::{
	format_optional_timestamp, format_timestamp, like_pattern, parse_enum, parse_optional_timestamp,
	parse_optional_uuid, parse_timestamp, parse_uuid,
};

/// A support ticket as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
	pub id: TicketId,
	pub title: String,
	pub description: String,
	pub status: TicketStatus,
	pub priority: TicketPriority,
	/// Fixed at creation.
	pub creator_id: UserId,
	pub assignee_id: Option<UserId>,
	pub category_id: Option<CategoryId>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	/// Set exactly while `status` is resolved.
	pub resolved_at: Option<DateTime<Utc>>,
}

impl Ticket {
	/// A new open, unassigned ticket.
	pub fn new(
		creator_id: UserId,
		title: impl Into<String>,
		description: impl Into<String>,
		priority: TicketPriority,
		category_id: Option<CategoryId>,
	) -> Self {
		let now = Utc::now();
		Self {
			id: TicketId::generate(),
			title: title.into(),
			description: description.into(),
			status: TicketStatus::Open,
			priority,
			creator_id,
			assignee_id: None,
			category_id,
			created_at: now,
			updated_at: now,
			resolved_at: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
	pub id: CategoryId,
	pub name: String,
}

/// A ticket with its related records resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketView {
	pub ticket: Ticket,
	pub creator: UserSummary,
	pub assignee: Option<UserSummary>,
	pub category: Option<CategoryRef>,
	pub comments_count: i64,
	pub attachments_count: i64,
}

/// Which tickets a listing may contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TicketScope {
	#[default]
	All,
	CreatedBy(UserId),
	AssignedTo(UserId),
	Unassigned,
	/// Unassigned tickets plus those assigned to the given user.
	SupportQueue(UserId),
}

#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
	pub scope: TicketScope,
	pub status: Option<TicketStatus>,
	pub priority: Option<TicketPriority>,
	pub category_id: Option<CategoryId>,
	/// Matched case-insensitively against title and description.
	pub search: Option<String>,
}

impl TicketFilter {
	pub fn scoped(scope: TicketScope) -> Self {
		Self {
			scope,
			..Default::default()
		}
	}
}

#[async_trait]
pub trait TicketStore: Send + Sync {
	async fn create_ticket(&self, ticket: &Ticket) -> Result<(), DbError>;
	async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, DbError>;
	async fn get_ticket_view(&self, id: &TicketId) -> Result<Option<TicketView>, DbError>;
	async fn list_tickets(
		&self,
		filter: &TicketFilter,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<TicketView>, i64), DbError>;
	async fn update_ticket(&self, ticket: &Ticket) -> Result<(), DbError>;
	async fn set_assignee(&self, id: &TicketId, assignee_id: Option<UserId>) -> Result<(), DbError>;
	async fn delete_ticket(&self, id: &TicketId) -> Result<bool, DbError>;
	async fn list_backlog(&self) -> Result<Vec<Ticket>, DbError>;
}

/// Repository for ticket database operations.
#[derive(Clone)]
pub struct TicketRepository {
	pool: SqlitePool,
}

const TICKET_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.priority, t.creator_id, \
	t.assignee_id, t.category_id, t.created_at, t.updated_at, t.resolved_at";

const VIEW_SELECT: &str = r#"
	SELECT t.id, t.title, t.description, t.status, t.priority, t.creator_id,
		   t.assignee_id, t.category_id, t.created_at, t.updated_at, t.resolved_at,
		   cu.email AS creator_email, cu.first_name AS creator_first_name,
		   cu.last_name AS creator_last_name, cu.role AS creator_role,
		   au.email AS assignee_email, au.first_name AS assignee_first_name,
		   au.last_name AS assignee_last_name, au.role AS assignee_role,
		   cat.name AS category_name,
		   (SELECT COUNT(*) FROM comments c WHERE c.ticket_id = t.id) AS comments_count,
		   (SELECT COUNT(*) FROM attachments a WHERE a.ticket_id = t.id) AS attachments_count
	FROM tickets t
	JOIN users cu ON cu.id = t.creator_id
	LEFT JOIN users au ON au.id = t.assignee_id
	LEFT JOIN categories cat ON cat.id = t.category_id
"#;

impl TicketRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a ticket.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the creator or category does not exist.
	#[tracing::instrument(skip(self, ticket), fields(ticket_id = %ticket.id, creator_id = %ticket.creator_id))]
	pub async fn create_ticket(&self, ticket: &Ticket) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO tickets (
				id, title, description, status, priority, creator_id, assignee_id,
				category_id, created_at, updated_at, resolved_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(ticket.id.to_string())
		.bind(&ticket.title)
		.bind(&ticket.description)
		.bind(ticket.status.as_str())
		.bind(ticket.priority.as_str())
		.bind(ticket.creator_id.to_string())
		.bind(ticket.assignee_id.map(|id| id.to_string()))
		.bind(ticket.category_id.map(|id| id.to_string()))
		.bind(format_timestamp(&ticket.created_at))
		.bind(format_timestamp(&ticket.updated_at))
		.bind(format_optional_timestamp(ticket.resolved_at.as_ref()))
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_foreign_key(e, "referenced user or category does not exist"))?;

		tracing::debug!(ticket_id = %ticket.id, "ticket created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(ticket_id = %id))]
	pub async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, DbError> {
		let row = sqlx::query(&format!("SELECT {TICKET_COLUMNS} FROM tickets t WHERE t.id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| parse_ticket_row(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(ticket_id = %id))]
	pub async fn get_ticket_view(&self, id: &TicketId) -> Result<Option<TicketView>, DbError> {
		let row = sqlx::query(&format!("{VIEW_SELECT} WHERE t.id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| parse_view_row(&r)).transpose()
	}

	/// Filtered listing, newest first. Returns the page and the filtered total.
	#[tracing::instrument(skip(self, filter), fields(scope = ?filter.scope))]
	pub async fn list_tickets(
		&self,
		filter: &TicketFilter,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<TicketView>, i64), DbError> {
		let mut clause = String::from(" WHERE 1 = 1");
		let mut binds: Vec<String> = Vec::new();

		match filter.scope {
			TicketScope::All => {}
			TicketScope::CreatedBy(user_id) => {
				clause.push_str(" AND t.creator_id = ?");
				binds.push(user_id.to_string());
			}
			TicketScope::AssignedTo(user_id) => {
				clause.push_str(" AND t.assignee_id = ?");
				binds.push(user_id.to_string());
			}
			TicketScope::Unassigned => clause.push_str(" AND t.assignee_id IS NULL"),
			TicketScope::SupportQueue(user_id) => {
				clause.push_str(" AND (t.assignee_id IS NULL OR t.assignee_id = ?)");
				binds.push(user_id.to_string());
			}
		}
		if let Some(status) = filter.status {
			clause.push_str(" AND t.status = ?");
			binds.push(status.as_str().to_string());
		}
		if let Some(priority) = filter.priority {
			clause.push_str(" AND t.priority = ?");
			binds.push(priority.as_str().to_string());
		}
		if let Some(category_id) = filter.category_id {
			clause.push_str(" AND t.category_id = ?");
			binds.push(category_id.to_string());
		}
		if let Some(ref search) = filter.search {
			clause.push_str(
				" AND (t.title LIKE ? ESCAPE '\\' OR t.description LIKE ? ESCAPE '\\')",
			);
			let pattern = like_pattern(search);
			binds.push(pattern.clone());
			binds.push(pattern);
		}

		let select = format!("{VIEW_SELECT}{clause} ORDER BY t.created_at DESC LIMIT ? OFFSET ?");
		let count = format!("SELECT COUNT(*) FROM tickets t{clause}");

		let mut rows_query = sqlx::query(&select);
		let mut count_query = sqlx::query_as::<_, (i64,)>(&count);
		for value in &binds {
			rows_query = rows_query.bind(value);
			count_query = count_query.bind(value);
		}

		let rows = rows_query
			.bind(limit)
			.bind(offset)
			.fetch_all(&self.pool)
			.await?;
		let (total,) = count_query.fetch_one(&self.pool).await?;

		let tickets = rows
			.iter()
			.map(parse_view_row)
			.collect::<Result<Vec<_>, _>>()?;
		tracing::debug!(count = tickets.len(), total, "tickets listed");
		Ok((tickets, total))
	}

	/// Persist every mutable field of `ticket`. `updated_at` is taken from the
	/// record, so callers stamp it.
	#[tracing::instrument(skip(self, ticket), fields(ticket_id = %ticket.id, status = %ticket.status))]
	pub async fn update_ticket(&self, ticket: &Ticket) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE tickets
			SET title = ?, description = ?, status = ?, priority = ?, assignee_id = ?,
				category_id = ?, updated_at = ?, resolved_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&ticket.title)
		.bind(&ticket.description)
		.bind(ticket.status.as_str())
		.bind(ticket.priority.as_str())
		.bind(ticket.assignee_id.map(|id| id.to_string()))
		.bind(ticket.category_id.map(|id| id.to_string()))
		.bind(format_timestamp(&ticket.updated_at))
		.bind(format_optional_timestamp(ticket.resolved_at.as_ref()))
		.bind(ticket.id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_foreign_key(e, "referenced user or category does not exist"))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("ticket {}", ticket.id)));
		}
		tracing::debug!(ticket_id = %ticket.id, "ticket updated");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(ticket_id = %id, assignee_id = ?assignee_id))]
	pub async fn set_assignee(&self, id: &TicketId, assignee_id: Option<UserId>) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE tickets SET assignee_id = ?, updated_at = ? WHERE id = ?")
			.bind(assignee_id.map(|id| id.to_string()))
			.bind(format_timestamp(&Utc::now()))
			.bind(id.to_string())
			.execute(&self.pool)
			.await
			.map_err(|e| conflict_on_foreign_key(e, "assignee does not exist"))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("ticket {id}")));
		}
		Ok(())
	}

	/// Delete a ticket with its comments and attachment records.
	#[tracing::instrument(skip(self), fields(ticket_id = %id))]
	pub async fn delete_ticket(&self, id: &TicketId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		tracing::debug!(ticket_id = %id, deleted, "ticket delete");
		Ok(deleted)
	}

	/// Unassigned tickets still being worked (open or in progress), oldest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_backlog(&self) -> Result<Vec<Ticket>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {TICKET_COLUMNS} FROM tickets t
			WHERE t.assignee_id IS NULL AND t.status IN ('open', 'in_progress')
			ORDER BY t.created_at ASC
			"#
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_ticket_row).collect()
	}
}

#[async_trait]
impl TicketStore for TicketRepository {
	async fn create_ticket(&self, ticket: &Ticket) -> Result<(), DbError> {
		self.create_ticket(ticket).await
	}

	async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, DbError> {
		self.get_ticket(id).await
	}

	async fn get_ticket_view(&self, id: &TicketId) -> Result<Option<TicketView>, DbError> {
		self.get_ticket_view(id).await
	}

	async fn list_tickets(
		&self,
		filter: &TicketFilter,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<TicketView>, i64), DbError> {
		self.list_tickets(filter, limit, offset).await
	}

	async fn update_ticket(&self, ticket: &Ticket) -> Result<(), DbError> {
		self.update_ticket(ticket).await
	}

	async fn set_assignee(&self, id: &TicketId, assignee_id: Option<UserId>) -> Result<(), DbError> {
		self.set_assignee(id, assignee_id).await
	}

	async fn delete_ticket(&self, id: &TicketId) -> Result<bool, DbError> {
		self.delete_ticket(id).await
	}

	async fn list_backlog(&self) -> Result<Vec<Ticket>, DbError> {
		self.list_backlog().await
	}
}

fn parse_ticket_row(row: &sqlx::sqlite::SqliteRow) -> Result<Ticket, DbError> {
	let id: String = row.get("id");
	let status: String = row.get("status");
	let priority: String = row.get("priority");
	let creator_id: String = row.get("creator_id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Ticket {
		id: TicketId::new(parse_uuid("ticket id", &id)?),
		title: row.get("title"),
		description: row.get("description"),
		status: parse_enum("status", &status)?,
		priority: parse_enum("priority", &priority)?,
		creator_id: UserId::new(parse_uuid("creator_id", &creator_id)?),
		assignee_id: parse_optional_uuid("assignee_id", row.get("assignee_id"))?.map(UserId::new),
		category_id: parse_optional_uuid("category_id", row.get("category_id"))?
			.map(CategoryId::new),
		created_at: parse_timestamp("created_at", &created_at)?,
		updated_at: parse_timestamp("updated_at", &updated_at)?,
		resolved_at: parse_optional_timestamp("resolved_at", row.get("resolved_at"))?,
	})
}

fn parse_view_row(row: &sqlx::sqlite::SqliteRow) -> Result<TicketView, DbError> {
	let ticket = parse_ticket_row(row)?;

	let creator = joined_summary(row, "creator", ticket.creator_id)?;
	let assignee = match ticket.assignee_id {
		Some(id) => Some(joined_summary(row, "assignee", id)?),
		None => None,
	};
	let category = match ticket.category_id {
		Some(id) => Some(CategoryRef {
			id,
			name: row.get("category_name"),
		}),
		None => None,
	};

	Ok(TicketView {
		ticket,
		creator,
		assignee,
		category,
		comments_count: row.get("comments_count"),
		attachments_count: row.get("attachments_count"),
	})
}

/// Reads the `{prefix}_email`, `{prefix}_first_name`, ... columns of a joined user.
pub(crate) fn joined_summary(
	row: &sqlx::sqlite::SqliteRow,
	prefix: &str,
	id: UserId,
) -> Result<UserSummary, DbError> {
	let first_name: String = row.get(format!("{prefix}_first_name").as_str());
	let last_name: String = row.get(format!("{prefix}_last_name").as_str());
	let role: String = row.get(format!("{prefix}_role").as_str());
	Ok(UserSummary {
		id,
		email: row.get(format!("{prefix}_email").as_str()),
		full_name: format!("{first_name} {last_name}"),
		role: parse_enum::<Role>("role", &role)?,
	})
}
