// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket category repository.
//!
//! Names are unique case-insensitively (`COLLATE NOCASE`). A category cannot
//! be deleted while tickets reference it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helpdesk_server_auth::CategoryId;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{conflict_on_foreign_key, conflict_on_unique, DbError};
use crate::types::{format_timestamp, like_pattern, parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
	pub id: CategoryId,
	pub name: String,
	pub description: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Category {
	pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
		let now = Utc::now();
		Self {
			id: CategoryId::generate(),
			name: name.into(),
			description,
			created_at: now,
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
	pub category: Category,
	pub ticket_count: i64,
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
	async fn create_category(&self, category: &Category) -> Result<(), DbError>;
	async fn get_category(&self, id: &CategoryId) -> Result<Option<CategoryWithCount>, DbError>;
	async fn list_categories(&self, search: Option<&str>) -> Result<Vec<CategoryWithCount>, DbError>;
	async fn update_category(&self, category: &Category) -> Result<(), DbError>;
	async fn delete_category(&self, id: &CategoryId) -> Result<bool, DbError>;
	async fn count_tickets(&self, id: &CategoryId) -> Result<i64, DbError>;
}

/// Repository for category database operations.
#[derive(Clone)]
pub struct CategoryRepository {
	pool: SqlitePool,
}

const CATEGORY_SELECT: &str = r#"
	SELECT c.id, c.name, c.description, c.created_at, c.updated_at,
		   (SELECT COUNT(*) FROM tickets t WHERE t.category_id = c.id) AS ticket_count
	FROM categories c
"#;

const DUPLICATE_NAME: &str = "a category with this name already exists";

impl CategoryRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// # Errors
	/// Returns `DbError::Conflict` if the name is taken, ignoring case.
	#[tracing::instrument(skip(self, category), fields(category_id = %category.id))]
	pub async fn create_category(&self, category: &Category) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO categories (id, name, description, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(category.id.to_string())
		.bind(&category.name)
		.bind(&category.description)
		.bind(format_timestamp(&category.created_at))
		.bind(format_timestamp(&category.updated_at))
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

		tracing::debug!(category_id = %category.id, "category created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn get_category(&self, id: &CategoryId) -> Result<Option<CategoryWithCount>, DbError> {
		let row = sqlx::query(&format!("{CATEGORY_SELECT} WHERE c.id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| parse_category_row(&r)).transpose()
	}

	/// All categories ordered by name, optionally filtered by a name substring.
	#[tracing::instrument(skip(self))]
	pub async fn list_categories(
		&self,
		search: Option<&str>,
	) -> Result<Vec<CategoryWithCount>, DbError> {
		let rows = match search {
			Some(term) => {
				sqlx::query(&format!(
					"{CATEGORY_SELECT} WHERE c.name LIKE ? ESCAPE '\\' ORDER BY c.name COLLATE NOCASE ASC"
				))
				.bind(like_pattern(term))
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query(&format!(
					"{CATEGORY_SELECT} ORDER BY c.name COLLATE NOCASE ASC"
				))
				.fetch_all(&self.pool)
				.await?
			}
		};

		rows.iter().map(parse_category_row).collect()
	}

	/// # Errors
	/// Returns `DbError::NotFound` if the category is gone, or
	/// `DbError::Conflict` if the new name is taken.
	#[tracing::instrument(skip(self, category), fields(category_id = %category.id))]
	pub async fn update_category(&self, category: &Category) -> Result<(), DbError> {
		let result = sqlx::query(
			"UPDATE categories SET name = ?, description = ?, updated_at = ? WHERE id = ?",
		)
		.bind(&category.name)
		.bind(&category.description)
		.bind(format_timestamp(&Utc::now()))
		.bind(category.id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("category {}", category.id)));
		}
		Ok(())
	}

	/// # Errors
	/// Returns `DbError::Conflict` if tickets still reference the category.
	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn delete_category(&self, id: &CategoryId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM categories WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await
			.map_err(|e| conflict_on_foreign_key(e, "category is referenced by tickets"))?;
		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn count_tickets(&self, id: &CategoryId) -> Result<i64, DbError> {
		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE category_id = ?")
			.bind(id.to_string())
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}
}

#[async_trait]
impl CategoryStore for CategoryRepository {
	async fn create_category(&self, category: &Category) -> Result<(), DbError> {
		self.create_category(category).await
	}

	async fn get_category(&self, id: &CategoryId) -> Result<Option<CategoryWithCount>, DbError> {
		self.get_category(id).await
	}

	async fn list_categories(&self, search: Option<&str>) -> Result<Vec<CategoryWithCount>, DbError> {
		self.list_categories(search).await
	}

	async fn update_category(&self, category: &Category) -> Result<(), DbError> {
		self.update_category(category).await
	}

	async fn delete_category(&self, id: &CategoryId) -> Result<bool, DbError> {
		self.delete_category(id).await
	}

	async fn count_tickets(&self, id: &CategoryId) -> Result<i64, DbError> {
		self.count_tickets(id).await
	}
}

fn parse_category_row(row: &sqlx::sqlite::SqliteRow) -> Result<CategoryWithCount, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(CategoryWithCount {
		category: Category {
			id: CategoryId::new(parse_uuid("category id", &id)?),
			name: row.get("name"),
			description: row.get("description"),
			created_at: parse_timestamp("created_at", &created_at)?,
			updated_at: parse_timestamp("updated_at", &updated_at)?,
		},
		ticket_count: row.get("ticket_count"),
	})
}
