// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket comment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helpdesk_server_auth::{CommentId, TicketId, UserId, UserSummary};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{conflict_on_foreign_key, DbError};
use crate::ticket::joined_summary;
use crate::types::{format_timestamp, parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
	pub id: CommentId,
	pub ticket_id: TicketId,
	pub author_id: UserId,
	pub text: String,
	/// Hidden from regular users.
	pub is_private: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Comment {
	pub fn new(ticket_id: TicketId, author_id: UserId, text: impl Into<String>, is_private: bool) -> Self {
		let now = Utc::now();
		Self {
			id: CommentId::generate(),
			ticket_id,
			author_id,
			text: text.into(),
			is_private,
			created_at: now,
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
	pub comment: Comment,
	pub author: UserSummary,
}

#[async_trait]
pub trait CommentStore: Send + Sync {
	async fn create_comment(&self, comment: &Comment) -> Result<(), DbError>;
	async fn get_comment(
		&self,
		ticket_id: &TicketId,
		id: &CommentId,
	) -> Result<Option<CommentView>, DbError>;
	async fn list_comments(
		&self,
		ticket_id: &TicketId,
		include_private: bool,
	) -> Result<Vec<CommentView>, DbError>;
	async fn update_comment_text(&self, id: &CommentId, text: &str) -> Result<(), DbError>;
	async fn delete_comment(&self, id: &CommentId) -> Result<bool, DbError>;
}

/// Repository for comment database operations.
#[derive(Clone)]
pub struct CommentRepository {
	pool: SqlitePool,
}

const COMMENT_SELECT: &str = r#"
	SELECT c.id, c.ticket_id, c.author_id, c.text, c.is_private, c.created_at, c.updated_at,
		   u.email AS author_email, u.first_name AS author_first_name,
		   u.last_name AS author_last_name, u.role AS author_role
	FROM comments c
	JOIN users u ON u.id = c.author_id
"#;

impl CommentRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, comment), fields(comment_id = %comment.id, ticket_id = %comment.ticket_id, is_private = comment.is_private))]
	pub async fn create_comment(&self, comment: &Comment) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO comments (id, ticket_id, author_id, text, is_private, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(comment.id.to_string())
		.bind(comment.ticket_id.to_string())
		.bind(comment.author_id.to_string())
		.bind(&comment.text)
		.bind(comment.is_private)
		.bind(format_timestamp(&comment.created_at))
		.bind(format_timestamp(&comment.updated_at))
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_foreign_key(e, "ticket or author does not exist"))?;

		tracing::debug!(comment_id = %comment.id, "comment created");
		Ok(())
	}

	/// A comment, only if it belongs to `ticket_id`.
	#[tracing::instrument(skip(self), fields(ticket_id = %ticket_id, comment_id = %id))]
	pub async fn get_comment(
		&self,
		ticket_id: &TicketId,
		id: &CommentId,
	) -> Result<Option<CommentView>, DbError> {
		let row = sqlx::query(&format!("{COMMENT_SELECT} WHERE c.id = ? AND c.ticket_id = ?"))
			.bind(id.to_string())
			.bind(ticket_id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| parse_comment_row(&r)).transpose()
	}

	/// Comments on a ticket, oldest first.
	#[tracing::instrument(skip(self), fields(ticket_id = %ticket_id, include_private))]
	pub async fn list_comments(
		&self,
		ticket_id: &TicketId,
		include_private: bool,
	) -> Result<Vec<CommentView>, DbError> {
		let privacy = if include_private {
			""
		} else {
			" AND c.is_private = 0"
		};
		let rows = sqlx::query(&format!(
			"{COMMENT_SELECT} WHERE c.ticket_id = ?{privacy} ORDER BY c.created_at ASC"
		))
		.bind(ticket_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_comment_row).collect()
	}

	#[tracing::instrument(skip(self, text), fields(comment_id = %id))]
	pub async fn update_comment_text(&self, id: &CommentId, text: &str) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE comments SET text = ?, updated_at = ? WHERE id = ?")
			.bind(text)
			.bind(format_timestamp(&Utc::now()))
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("comment {id}")));
		}
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(comment_id = %id))]
	pub async fn delete_comment(&self, id: &CommentId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM comments WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}

#[async_trait]
impl CommentStore for CommentRepository {
	async fn create_comment(&self, comment: &Comment) -> Result<(), DbError> {
		self.create_comment(comment).await
	}

	async fn get_comment(
		&self,
		ticket_id: &TicketId,
		id: &CommentId,
	) -> Result<Option<CommentView>, DbError> {
		self.get_comment(ticket_id, id).await
	}

	async fn list_comments(
		&self,
		ticket_id: &TicketId,
		include_private: bool,
	) -> Result<Vec<CommentView>, DbError> {
		self.list_comments(ticket_id, include_private).await
	}

	async fn update_comment_text(&self, id: &CommentId, text: &str) -> Result<(), DbError> {
		self.update_comment_text(id, text).await
	}

	async fn delete_comment(&self, id: &CommentId) -> Result<bool, DbError> {
		self.delete_comment(id).await
	}
}

fn parse_comment_row(row: &sqlx::sqlite::SqliteRow) -> Result<CommentView, DbError> {
	let id: String = row.get("id");
	let ticket_id: String = row.get("ticket_id");
	let author_id: String = row.get("author_id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	let author_id = UserId::new(parse_uuid("author_id", &author_id)?);
	let comment = Comment {
		id: CommentId::new(parse_uuid("comment id", &id)?),
		ticket_id: TicketId::new(parse_uuid("ticket_id", &ticket_id)?),
		author_id,
		text: row.get("text"),
		is_private: row.get("is_private"),
		created_at: parse_timestamp("created_at", &created_at)?,
		updated_at: parse_timestamp("updated_at", &updated_at)?,
	};
	let author = joined_summary(row, "author", author_id)?;
	Ok(CommentView { comment, author })
}
