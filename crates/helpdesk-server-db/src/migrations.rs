// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema migrations.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const M001_HELPDESK: &str = include_str!("../migrations/001_helpdesk.sql");

/// Run all database migrations.
///
/// # Errors
/// Returns `DbError::Sqlx` if a statement fails.
///
/// # Note
/// Migrations are idempotent - safe to run multiple times.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for stmt in statements(M001_HELPDESK) {
		sqlx::query(stmt).execute(pool).await?;
	}
	tracing::debug!("migrations applied");
	Ok(())
}

/// Splits a migration file into executable statements, dropping comment-only
/// fragments.
fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|stmt| {
		stmt
			.lines()
			.any(|line| !line.trim().is_empty() && !line.trim_start().starts_with("--"))
	})
}
