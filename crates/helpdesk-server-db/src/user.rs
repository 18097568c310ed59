// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.
//!
//! Accounts, their password hashes, roles, and active flags. The password
//! hash never leaves this module inside a [`User`]; callers that need it ask
//! for credentials explicitly.

use async_trait::async_trait;
use chrono::Utc;
use helpdesk_server_auth::{Role, User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{conflict_on_unique, DbError};
use crate::types::{
	format_optional_timestamp, format_timestamp, like_pattern, parse_enum, parse_optional_timestamp,
	parse_timestamp, parse_uuid,
};

const USER_COLUMNS: &str = "id, email, first_name, last_name, role, is_active, created_at, updated_at, last_login";

/// Filters for the administrator user directory.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
	pub role: Option<Role>,
	pub is_active: Option<bool>,
	/// Matched case-insensitively against first name, last name, and email.
	pub search: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
	async fn get_credentials_by_email(&self, email: &str)
		-> Result<Option<(User, String)>, DbError>;
	async fn get_password_hash(&self, id: &UserId) -> Result<Option<String>, DbError>;
	async fn update_profile(
		&self,
		id: &UserId,
		first_name: &str,
		last_name: &str,
	) -> Result<(), DbError>;
	async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DbError>;
	async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DbError>;
	async fn set_active(&self, id: &UserId, is_active: bool) -> Result<(), DbError>;
	async fn record_login(&self, id: &UserId) -> Result<(), DbError>;
	async fn delete_user(&self, id: &UserId) -> Result<bool, DbError>;
	async fn list_users(
		&self,
		filter: &UserFilter,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<User>, i64), DbError>;
	async fn list_active_support_users(&self) -> Result<Vec<User>, DbError>;
	async fn count_active_admins(&self) -> Result<i64, DbError>;
	async fn get_first_active_admin(&self) -> Result<Option<User>, DbError>;
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	/// Create a new repository with the given connection pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new user.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, user, password_hash), fields(user_id = %user.id, role = %user.role))]
	pub async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (
				id, email, password_hash, first_name, last_name, role,
				is_active, created_at, updated_at, last_login
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(password_hash)
		.bind(&user.first_name)
		.bind(&user.last_name)
		.bind(user.role.as_str())
		.bind(user.is_active)
		.bind(format_timestamp(&user.created_at))
		.bind(format_timestamp(&user.updated_at))
		.bind(format_optional_timestamp(user.last_login.as_ref()))
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_unique(e, "email is already registered"))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| parse_user_row(&r)).transpose()
	}

	/// Lookup by email; the caller's input is normalized by the caller.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
			.bind(email)
			.fetch_optional(&self.pool)
			.await?;

		let result = row.map(|r| parse_user_row(&r)).transpose()?;
		if let Some(ref user) = result {
			tracing::debug!(user_id = %user.id, "user found by email");
		}
		Ok(result)
	}

	/// The user and their stored password hash, for login.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_credentials_by_email(
		&self,
		email: &str,
	) -> Result<Option<(User, String)>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?"
		))
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row
			.map(|r| {
				let user = parse_user_row(&r)?;
				let hash: String = r.get("password_hash");
				Ok((user, hash))
			})
			.transpose()
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_password_hash(&self, id: &UserId) -> Result<Option<String>, DbError> {
		let row: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.map(|(hash,)| hash))
	}

	#[tracing::instrument(skip(self, first_name, last_name), fields(user_id = %id))]
	pub async fn update_profile(
		&self,
		id: &UserId,
		first_name: &str,
		last_name: &str,
	) -> Result<(), DbError> {
		let result = sqlx::query(
			"UPDATE users SET first_name = ?, last_name = ?, updated_at = ? WHERE id = ?",
		)
		.bind(first_name)
		.bind(last_name)
		.bind(format_timestamp(&Utc::now()))
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		require_row(result.rows_affected(), id)?;
		tracing::debug!(user_id = %id, "profile updated");
		Ok(())
	}

	#[tracing::instrument(skip(self, password_hash), fields(user_id = %id))]
	pub async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
			.bind(password_hash)
			.bind(format_timestamp(&Utc::now()))
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		require_row(result.rows_affected(), id)?;
		tracing::debug!(user_id = %id, "password updated");
		Ok(())
	}

	/// Change a user's role. Only staff may hold assignments, so a demotion to
	/// [`Role::User`] also unassigns their tickets.
	#[tracing::instrument(skip(self), fields(user_id = %id, role = %role))]
	pub async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DbError> {
		let now = format_timestamp(&Utc::now());
		let mut tx = self.pool.begin().await?;

		let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
			.bind(role.as_str())
			.bind(&now)
			.bind(id.to_string())
			.execute(&mut *tx)
			.await?;
		require_row(result.rows_affected(), id)?;

		let mut unassigned = 0;
		if !role.is_staff() {
			unassigned = sqlx::query(
				"UPDATE tickets SET assignee_id = NULL, updated_at = ? WHERE assignee_id = ?",
			)
			.bind(&now)
			.bind(id.to_string())
			.execute(&mut *tx)
			.await?
			.rows_affected();
		}

		tx.commit().await?;
		tracing::debug!(user_id = %id, role = %role, unassigned, "role updated");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id, is_active))]
	pub async fn set_active(&self, id: &UserId, is_active: bool) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
			.bind(is_active)
			.bind(format_timestamp(&Utc::now()))
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		require_row(result.rows_affected(), id)?;
		tracing::debug!(user_id = %id, is_active, "active flag updated");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn record_login(&self, id: &UserId) -> Result<(), DbError> {
		sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
			.bind(format_timestamp(&Utc::now()))
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	/// Hard-delete a user. Their tickets, comments, attachments, and tokens
	/// go with them; tickets assigned to them become unassigned.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM users WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		tracing::debug!(user_id = %id, deleted, "user delete");
		Ok(deleted)
	}

	/// Paginated directory, newest first. Returns the page and the filtered total.
	#[tracing::instrument(skip(self, filter))]
	pub async fn list_users(
		&self,
		filter: &UserFilter,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<User>, i64), DbError> {
		let mut clause = String::from(" WHERE 1 = 1");
		if filter.role.is_some() {
			clause.push_str(" AND role = ?");
		}
		if filter.is_active.is_some() {
			clause.push_str(" AND is_active = ?");
		}
		if filter.search.is_some() {
			clause.push_str(
				" AND (first_name LIKE ? ESCAPE '\\' OR last_name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\')",
			);
		}

		let select = format!(
			"SELECT {USER_COLUMNS} FROM users{clause} ORDER BY created_at DESC LIMIT ? OFFSET ?"
		);
		let count = format!("SELECT COUNT(*) FROM users{clause}");
		let pattern = filter.search.as_deref().map(like_pattern);

		let mut rows_query = sqlx::query(&select);
		let mut count_query = sqlx::query_as::<_, (i64,)>(&count);
		if let Some(role) = filter.role {
			rows_query = rows_query.bind(role.as_str());
			count_query = count_query.bind(role.as_str());
		}
		if let Some(is_active) = filter.is_active {
			rows_query = rows_query.bind(is_active);
			count_query = count_query.bind(is_active);
		}
		if let Some(ref pattern) = pattern {
			for _ in 0..3 {
				rows_query = rows_query.bind(pattern);
				count_query = count_query.bind(pattern);
			}
		}

		let rows = rows_query
			.bind(limit)
			.bind(offset)
			.fetch_all(&self.pool)
			.await?;
		let (total,) = count_query.fetch_one(&self.pool).await?;

		let users = rows
			.iter()
			.map(parse_user_row)
			.collect::<Result<Vec<_>, _>>()?;
		tracing::debug!(count = users.len(), total, "users listed");
		Ok((users, total))
	}

	/// The support pool: active support users ordered by name.
	#[tracing::instrument(skip(self))]
	pub async fn list_active_support_users(&self) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {USER_COLUMNS} FROM users
			WHERE role = 'support' AND is_active = 1
			ORDER BY first_name ASC, last_name ASC
			"#
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_user_row).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_active_admins(&self) -> Result<i64, DbError> {
		let (count,): (i64,) =
			sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'sysAdmin' AND is_active = 1")
				.fetch_one(&self.pool)
				.await?;
		Ok(count)
	}

	/// The longest-standing active administrator, used as the dev-mode caller.
	#[tracing::instrument(skip(self))]
	pub async fn get_first_active_admin(&self) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!(
			r#"
			SELECT {USER_COLUMNS} FROM users
			WHERE role = 'sysAdmin' AND is_active = 1
			ORDER BY created_at ASC
			LIMIT 1
			"#
		))
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| parse_user_row(&r)).transpose()
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), DbError> {
		self.create_user(user, password_hash).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_email(email).await
	}

	async fn get_credentials_by_email(
		&self,
		email: &str,
	) -> Result<Option<(User, String)>, DbError> {
		self.get_credentials_by_email(email).await
	}

	async fn get_password_hash(&self, id: &UserId) -> Result<Option<String>, DbError> {
		self.get_password_hash(id).await
	}

	async fn update_profile(
		&self,
		id: &UserId,
		first_name: &str,
		last_name: &str,
	) -> Result<(), DbError> {
		self.update_profile(id, first_name, last_name).await
	}

	async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DbError> {
		self.update_password(id, password_hash).await
	}

	async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DbError> {
		self.update_role(id, role).await
	}

	async fn set_active(&self, id: &UserId, is_active: bool) -> Result<(), DbError> {
		self.set_active(id, is_active).await
	}

	async fn record_login(&self, id: &UserId) -> Result<(), DbError> {
		self.record_login(id).await
	}

	async fn delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		self.delete_user(id).await
	}

	async fn list_users(
		&self,
		filter: &UserFilter,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<User>, i64), DbError> {
		self.list_users(filter, limit, offset).await
	}

	async fn list_active_support_users(&self) -> Result<Vec<User>, DbError> {
		self.list_active_support_users().await
	}

	async fn count_active_admins(&self) -> Result<i64, DbError> {
		self.count_active_admins().await
	}

	async fn get_first_active_admin(&self) -> Result<Option<User>, DbError> {
		self.get_first_active_admin().await
	}
}

fn require_row(rows_affected: u64, id: &UserId) -> Result<(), DbError> {
	if rows_affected == 0 {
		return Err(DbError::NotFound(format!("user {id}")));
	}
	Ok(())
}

pub(crate) fn parse_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let role: String = row.get("role");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: UserId::new(parse_uuid("user id", &id)?),
		email: row.get("email"),
		first_name: row.get("first_name"),
		last_name: row.get("last_name"),
		role: parse_enum("role", &role)?,
		is_active: row.get("is_active"),
		created_at: parse_timestamp("created_at", &created_at)?,
		updated_at: parse_timestamp("updated_at", &updated_at)?,
		last_login: parse_optional_timestamp("last_login", row.get("last_login"))?,
	})
}
