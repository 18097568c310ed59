// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # helpdesk-server-db
//!
//! Persistence layer for the helpdesk server using SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! Each domain has two components:
//! - **`*Store` trait**: the interface (e.g., `TicketStore`, `CommentStore`)
//! - **`*Repository` struct**: concrete implementation holding a `SqlitePool`
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait FooStore: Send + Sync {
//!     async fn get_foo(&self, id: &FooId) -> Result<Option<Foo>, DbError>;
//!     async fn create_foo(&self, foo: &Foo) -> Result<(), DbError>;
//! }
//!
//! #[derive(Clone)]
//! pub struct FooRepository {
//!     pool: SqlitePool,
//! }
//!
//! #[async_trait]
//! impl FooStore for FooRepository { /* delegate to inherent methods */ }
//! ```
//!
//! ## Error Handling
//!
//! | Variant | When to use |
//! |---------|-------------|
//! | `NotFound` | Update by an ID that should exist |
//! | `Conflict` | Unique or foreign-key violation (duplicate email, category in use) |
//! | `Sqlx` | Unexpected database errors, propagated with `?` |
//! | `Internal` | Unparseable stored data (bad UUID, timestamp, or enum name) |
//!
//! Lookups return `Result<Option<T>>`; absence is normal there.
//!
//! ## Storage Encoding
//!
//! IDs are hyphenated UUID text. Timestamps are RFC 3339 UTC with fixed
//! microsecond precision, so string comparison in SQL is chronological.
//! Enums are stored by their wire names (`in_progress`, `sysAdmin`).
//!
//! ## Testing
//!
//! Tests run against a single-connection in-memory pool with the migrations
//! applied (see `testing::create_migrated_test_pool`).

pub mod attachment;
pub mod category;
pub mod comment;
mod error;
pub mod metrics;
pub mod migrations;
pub mod pool;
pub mod ticket;
pub mod token;
mod types;
pub mod user;

#[cfg(test)]
pub mod testing;

pub use attachment::{Attachment, AttachmentRepository, AttachmentStore, AttachmentView};
pub use category::{Category, CategoryRepository, CategoryStore, CategoryWithCount};
pub use comment::{Comment, CommentRepository, CommentStore, CommentView};
pub use error::{DbError, Result};
pub use metrics::{
	MetricsRepository, MetricsStore, PriorityCounts, StatusCounts, TimeSpan, UserActivityRow,
	UserCounts,
};
pub use migrations::run_migrations;
pub use pool::{create_pool, ping};
pub use ticket::{
	CategoryRef, Ticket, TicketFilter, TicketRepository, TicketScope, TicketStore, TicketView,
};
pub use token::{TokenRepository, TokenStore};
pub use user::{UserFilter, UserRepository, UserStore};
