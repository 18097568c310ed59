// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpdesk ticketing server.
//!
//! An axum HTTP API over SQLite for support tickets, their comments and
//! attachments, categories, user administration, and dashboard metrics.

pub mod accounts;
pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod error;
pub mod extract;
pub mod lifecycle;
pub mod metrics;
pub mod routes;
pub mod storage;
pub mod typed_router;
pub mod validation;
pub mod version;

pub use api::{create_app_state, create_app_state_with, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use helpdesk_server_config::ServerConfig;
pub use lifecycle::{AssigneePicker, RandomAssigneePicker, TicketLifecycle};
pub use storage::{AttachmentStorage, LocalAttachmentStorage};
pub use typed_router::{AuthedRouter, PublicRouter};
