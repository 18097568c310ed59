// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token repository.
//!
//! Tokens are looked up by SHA-256 hash only; the plaintext is never stored.

use async_trait::async_trait;
use chrono::Utc;
use helpdesk_server_auth::{AuthToken, TokenId, TokenKind, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{
	format_optional_timestamp, format_timestamp, parse_enum, parse_optional_timestamp,
	parse_timestamp, parse_uuid,
};

#[async_trait]
pub trait TokenStore: Send + Sync {
	async fn create_token(&self, token: &AuthToken) -> Result<(), DbError>;
	async fn get_token_by_hash(&self, token_hash: &str) -> Result<Option<AuthToken>, DbError>;
	async fn revoke_token(&self, id: &TokenId) -> Result<bool, DbError>;
	async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, DbError>;
	async fn delete_expired_tokens(&self) -> Result<u64, DbError>;
}

/// Repository for bearer token operations.
#[derive(Clone)]
pub struct TokenRepository {
	pool: SqlitePool,
}

impl TokenRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, token), fields(token_id = %token.id, user_id = %token.user_id, kind = %token.kind))]
	pub async fn create_token(&self, token: &AuthToken) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO auth_tokens (id, user_id, kind, token_hash, created_at, expires_at, revoked_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(token.id.to_string())
		.bind(token.user_id.to_string())
		.bind(token.kind.as_str())
		.bind(&token.token_hash)
		.bind(format_timestamp(&token.created_at))
		.bind(format_timestamp(&token.expires_at))
		.bind(format_optional_timestamp(token.revoked_at.as_ref()))
		.execute(&self.pool)
		.await?;

		tracing::debug!(token_id = %token.id, "token stored");
		Ok(())
	}

	/// Returns the token whatever its state; callers check [`AuthToken::is_valid`].
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_token_by_hash(&self, token_hash: &str) -> Result<Option<AuthToken>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, kind, token_hash, created_at, expires_at, revoked_at
			FROM auth_tokens
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| parse_token_row(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(token_id = %id))]
	pub async fn revoke_token(&self, id: &TokenId) -> Result<bool, DbError> {
		let result =
			sqlx::query("UPDATE auth_tokens SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL")
				.bind(format_timestamp(&Utc::now()))
				.bind(id.to_string())
				.execute(&self.pool)
				.await?;
		Ok(result.rows_affected() > 0)
	}

	/// Revoke every live token a user holds. Returns how many were revoked.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		let result = sqlx::query(
			"UPDATE auth_tokens SET revoked_at = ? WHERE user_id = ? AND revoked_at IS NULL",
		)
		.bind(format_timestamp(&Utc::now()))
		.bind(user_id.to_string())
		.execute(&self.pool)
		.await?;

		let revoked = result.rows_affected();
		tracing::debug!(user_id = %user_id, revoked, "tokens revoked");
		Ok(revoked)
	}

	#[tracing::instrument(skip(self))]
	pub async fn delete_expired_tokens(&self) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at < ?")
			.bind(format_timestamp(&Utc::now()))
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected())
	}
}

#[async_trait]
impl TokenStore for TokenRepository {
	async fn create_token(&self, token: &AuthToken) -> Result<(), DbError> {
		self.create_token(token).await
	}

	async fn get_token_by_hash(&self, token_hash: &str) -> Result<Option<AuthToken>, DbError> {
		self.get_token_by_hash(token_hash).await
	}

	async fn revoke_token(&self, id: &TokenId) -> Result<bool, DbError> {
		self.revoke_token(id).await
	}

	async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		self.revoke_all_for_user(user_id).await
	}

	async fn delete_expired_tokens(&self) -> Result<u64, DbError> {
		self.delete_expired_tokens().await
	}
}

fn parse_token_row(row: &sqlx::sqlite::SqliteRow) -> Result<AuthToken, DbError> {
	let id: String = row.get("id");
	let user_id: String = row.get("user_id");
	let kind: String = row.get("kind");
	let created_at: String = row.get("created_at");
	let expires_at: String = row.get("expires_at");

	Ok(AuthToken {
		id: TokenId::new(parse_uuid("token id", &id)?),
		user_id: UserId::new(parse_uuid("user id", &user_id)?),
		kind: parse_enum::<TokenKind>("kind", &kind)?,
		token_hash: row.get("token_hash"),
		created_at: parse_timestamp("created_at", &created_at)?,
		expires_at: parse_timestamp("expires_at", &expires_at)?,
		revoked_at: parse_optional_timestamp("revoked_at", row.get("revoked_at"))?,
	})
}
