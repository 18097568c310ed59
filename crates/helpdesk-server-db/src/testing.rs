// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::Utc;
use helpdesk_server_auth::{Role, TicketPriority, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::migrations::run_migrations;
use crate::ticket::Ticket;
use crate::types::format_timestamp;

/// A single-connection in-memory pool; every connection to `:memory:` is a
/// separate database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")
		.unwrap()
		.foreign_keys(true);
	SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.unwrap()
}

/// In-memory pool with the full schema applied.
pub async fn create_migrated_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	run_migrations(&pool).await.unwrap();
	pool
}

/// Inserts a user directly, bypassing the repository.
pub async fn insert_user(pool: &SqlitePool, email: &str, role: Role) -> User {
	let user = User::new(email, "Test", "User", role);
	let now = format_timestamp(&Utc::now());
	sqlx::query(
		r#"
		INSERT INTO users (id, email, password_hash, first_name, last_name, role, is_active, created_at, updated_at)
		VALUES (?, ?, 'not-a-hash', ?, ?, ?, 1, ?, ?)
		"#,
	)
	.bind(user.id.to_string())
	.bind(&user.email)
	.bind(&user.first_name)
	.bind(&user.last_name)
	.bind(user.role.as_str())
	.bind(&now)
	.bind(&now)
	.execute(pool)
	.await
	.unwrap();
	user
}

/// Inserts an open, unassigned ticket directly.
pub async fn insert_ticket(pool: &SqlitePool, creator: &User, title: &str) -> Ticket {
	let ticket = Ticket::new(
		creator.id,
		title,
		"a description long enough",
		TicketPriority::Medium,
		None,
	);
	sqlx::query(
		r#"
		INSERT INTO tickets (id, title, description, status, priority, creator_id, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(ticket.id.to_string())
	.bind(&ticket.title)
	.bind(&ticket.description)
	.bind(ticket.status.as_str())
	.bind(ticket.priority.as_str())
	.bind(ticket.creator_id.to_string())
	.bind(format_timestamp(&ticket.created_at))
	.bind(format_timestamp(&ticket.updated_at))
	.execute(pool)
	.await
	.unwrap();
	ticket
}
