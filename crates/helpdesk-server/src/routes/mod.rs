// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP route handlers.
//!
//! Every handler follows the same order: load the target (404), check the
//! caller's capability (403), then validate the payload (400).

pub mod attachments;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod metrics;
pub mod system;
pub mod tickets;
pub mod users;

use helpdesk_server_auth::{is_allowed, Action, CurrentUser, ResourceAttrs, TicketId};
use helpdesk_server_db::Ticket;

use crate::api::AppState;
use crate::error::ServerError;

/// Fails with 403 unless the ABAC engine allows `action`.
pub(crate) fn authorize(
	current_user: &CurrentUser,
	action: Action,
	resource: &ResourceAttrs,
) -> Result<(), ServerError> {
	if is_allowed(&current_user.subject(), action, resource) {
		Ok(())
	} else {
		tracing::warn!(
			user_id = %current_user.user_id(),
			role = %current_user.user.role,
			action = ?action,
			resource_type = ?resource.resource_type,
			"access denied"
		);
		Err(ServerError::forbidden())
	}
}

pub(crate) async fn load_ticket(state: &AppState, id: &TicketId) -> Result<Ticket, ServerError> {
	state
		.tickets
		.get_ticket(id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Ticket".to_string()))
}

pub(crate) fn ticket_attrs(ticket: &Ticket) -> ResourceAttrs {
	ResourceAttrs::ticket(ticket.creator_id, ticket.assignee_id, ticket.status)
}

pub(crate) fn activity_attrs(ticket: &Ticket) -> ResourceAttrs {
	ResourceAttrs::ticket_activity(ticket.creator_id, ticket.assignee_id)
}
