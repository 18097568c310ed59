// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket attachment repository.
//!
//! Only metadata lives here. `stored_path` is the key the attachment storage
//! backend understands; the bytes live there.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helpdesk_server_auth::{AttachmentId, TicketId, UserId, UserSummary};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{conflict_on_foreign_key, DbError};
use crate::ticket::joined_summary;
use crate::types::{format_timestamp, parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
	pub id: AttachmentId,
	pub ticket_id: TicketId,
	pub uploaded_by: UserId,
	pub original_filename: String,
	pub stored_path: String,
	pub file_size: i64,
	pub mime_type: String,
	pub is_private: bool,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentView {
	pub attachment: Attachment,
	pub uploader: UserSummary,
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
	async fn create_attachment(&self, attachment: &Attachment) -> Result<(), DbError>;
	async fn get_attachment(
		&self,
		ticket_id: &TicketId,
		id: &AttachmentId,
	) -> Result<Option<AttachmentView>, DbError>;
	async fn list_attachments(
		&self,
		ticket_id: &TicketId,
		include_private: bool,
	) -> Result<Vec<AttachmentView>, DbError>;
	async fn delete_attachment(&self, id: &AttachmentId) -> Result<bool, DbError>;
	async fn list_stored_paths_for_ticket(&self, ticket_id: &TicketId) -> Result<Vec<String>, DbError>;
	async fn list_stored_paths_for_user(&self, user_id: &UserId) -> Result<Vec<String>, DbError>;
}

/// Repository for attachment metadata.
#[derive(Clone)]
pub struct AttachmentRepository {
	pool: SqlitePool,
}

const ATTACHMENT_SELECT: &str = r#"
	SELECT a.id, a.ticket_id, a.uploaded_by, a.original_filename, a.stored_path, a.file_size,
		   a.mime_type, a.is_private, a.created_at,
		   u.email AS uploader_email, u.first_name AS uploader_first_name,
		   u.last_name AS uploader_last_name, u.role AS uploader_role
	FROM attachments a
	JOIN users u ON u.id = a.uploaded_by
"#;

impl AttachmentRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, attachment), fields(attachment_id = %attachment.id, ticket_id = %attachment.ticket_id, file_size = attachment.file_size))]
	pub async fn create_attachment(&self, attachment: &Attachment) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO attachments (
				id, ticket_id, uploaded_by, original_filename, stored_path,
				file_size, mime_type, is_private, created_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(attachment.id.to_string())
		.bind(attachment.ticket_id.to_string())
		.bind(attachment.uploaded_by.to_string())
		.bind(&attachment.original_filename)
		.bind(&attachment.stored_path)
		.bind(attachment.file_size)
		.bind(&attachment.mime_type)
		.bind(attachment.is_private)
		.bind(format_timestamp(&attachment.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_foreign_key(e, "ticket or uploader does not exist"))?;

		tracing::debug!(attachment_id = %attachment.id, "attachment recorded");
		Ok(())
	}

	/// An attachment, only if it belongs to `ticket_id`.
	#[tracing::instrument(skip(self), fields(ticket_id = %ticket_id, attachment_id = %id))]
	pub async fn get_attachment(
		&self,
		ticket_id: &TicketId,
		id: &AttachmentId,
	) -> Result<Option<AttachmentView>, DbError> {
		let row = sqlx::query(&format!(
			"{ATTACHMENT_SELECT} WHERE a.id = ? AND a.ticket_id = ?"
		))
		.bind(id.to_string())
		.bind(ticket_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| parse_attachment_row(&r)).transpose()
	}

	/// Attachments on a ticket, newest first.
	#[tracing::instrument(skip(self), fields(ticket_id = %ticket_id, include_private))]
	pub async fn list_attachments(
		&self,
		ticket_id: &TicketId,
		include_private: bool,
	) -> Result<Vec<AttachmentView>, DbError> {
		let privacy = if include_private {
			""
		} else {
			" AND a.is_private = 0"
		};
		let rows = sqlx::query(&format!(
			"{ATTACHMENT_SELECT} WHERE a.ticket_id = ?{privacy} ORDER BY a.created_at DESC"
		))
		.bind(ticket_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_attachment_row).collect()
	}

	#[tracing::instrument(skip(self), fields(attachment_id = %id))]
	pub async fn delete_attachment(&self, id: &AttachmentId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM attachments WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	/// Storage keys that a ticket delete will orphan.
	#[tracing::instrument(skip(self), fields(ticket_id = %ticket_id))]
	pub async fn list_stored_paths_for_ticket(
		&self,
		ticket_id: &TicketId,
	) -> Result<Vec<String>, DbError> {
		let rows: Vec<(String,)> =
			sqlx::query_as("SELECT stored_path FROM attachments WHERE ticket_id = ?")
				.bind(ticket_id.to_string())
				.fetch_all(&self.pool)
				.await?;
		Ok(rows.into_iter().map(|(path,)| path).collect())
	}

	/// Storage keys that a user delete will orphan: their own uploads and
	/// everything on tickets they created.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_stored_paths_for_user(&self, user_id: &UserId) -> Result<Vec<String>, DbError> {
		let rows: Vec<(String,)> = sqlx::query_as(
			r#"
			SELECT a.stored_path FROM attachments a
			JOIN tickets t ON t.id = a.ticket_id
			WHERE a.uploaded_by = ? OR t.creator_id = ?
			"#,
		)
		.bind(user_id.to_string())
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;
		Ok(rows.into_iter().map(|(path,)| path).collect())
	}
}

#[async_trait]
impl AttachmentStore for AttachmentRepository {
	async fn create_attachment(&self, attachment: &Attachment) -> Result<(), DbError> {
		self.create_attachment(attachment).await
	}

	async fn get_attachment(
		&self,
		ticket_id: &TicketId,
		id: &AttachmentId,
	) -> Result<Option<AttachmentView>, DbError> {
		self.get_attachment(ticket_id, id).await
	}

	async fn list_attachments(
		&self,
		ticket_id: &TicketId,
		include_private: bool,
	) -> Result<Vec<AttachmentView>, DbError> {
		self.list_attachments(ticket_id, include_private).await
	}

	async fn delete_attachment(&self, id: &AttachmentId) -> Result<bool, DbError> {
		self.delete_attachment(id).await
	}

	async fn list_stored_paths_for_ticket(&self, ticket_id: &TicketId) -> Result<Vec<String>, DbError> {
		self.list_stored_paths_for_ticket(ticket_id).await
	}

	async fn list_stored_paths_for_user(&self, user_id: &UserId) -> Result<Vec<String>, DbError> {
		self.list_stored_paths_for_user(user_id).await
	}
}

fn parse_attachment_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttachmentView, DbError> {
	let id: String = row.get("id");
	let ticket_id: String = row.get("ticket_id");
	let uploaded_by: String = row.get("uploaded_by");
	let created_at: String = row.get("created_at");

	let uploaded_by = UserId::new(parse_uuid("uploaded_by", &uploaded_by)?);
	let attachment = Attachment {
		id: AttachmentId::new(parse_uuid("attachment id", &id)?),
		ticket_id: TicketId::new(parse_uuid("ticket_id", &ticket_id)?),
		uploaded_by,
		original_filename: row.get("original_filename"),
		stored_path: row.get("stored_path"),
		file_size: row.get("file_size"),
		mime_type: row.get("mime_type"),
		is_private: row.get("is_private"),
		created_at: parse_timestamp("created_at", &created_at)?,
	};
	let uploader = joined_summary(row, "uploader", uploaded_by)?;
	Ok(AttachmentView {
		attachment,
		uploader,
	})
}
