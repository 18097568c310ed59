// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket status state machine and support-pool assignment.
//!
//! Status rules:
//!
//! - `closed` is terminal; any change away from it is rejected
//! - entering `resolved` requires an assignee
//! - `resolved_at` is stamped on entering `resolved` and cleared on leaving it
//!
//! Assignment at creation is a best-effort step taken after the ticket is
//! committed: an empty support pool or a store failure leaves it unassigned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use helpdesk_server_auth::{TicketId, TicketStatus, User, UserId};
use helpdesk_server_db::{DbError, Ticket, TicketStore, UserStore};

use crate::error::ServerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
	#[error("cannot reopen a closed ticket")]
	ClosedIsTerminal,

	#[error("a ticket must have an assignee before it can be resolved")]
	ResolveWithoutAssignee,
}

impl From<LifecycleError> for ServerError {
	fn from(err: LifecycleError) -> Self {
		ServerError::field("status", err.to_string())
	}
}

/// Chooses which support user receives a new ticket.
pub trait AssigneePicker: Send + Sync {
	/// Picks one member of `pool`, or `None` to leave the ticket unassigned.
	fn pick<'a>(&self, pool: &'a [User]) -> Option<&'a User>;
}

/// Uniformly random choice over the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAssigneePicker;

impl AssigneePicker for RandomAssigneePicker {
	fn pick<'a>(&self, pool: &'a [User]) -> Option<&'a User> {
		if pool.is_empty() {
			return None;
		}
		pool.get(fastrand::usize(..pool.len()))
	}
}

/// Checks a status change against the state machine. `assignee_id` is the
/// assignee the ticket will have once the surrounding update is applied.
pub fn validate_transition(
	current: TicketStatus,
	next: TicketStatus,
	assignee_id: Option<UserId>,
) -> Result<(), LifecycleError> {
	if current.is_terminal() && next != current {
		return Err(LifecycleError::ClosedIsTerminal);
	}
	if next == TicketStatus::Resolved && assignee_id.is_none() {
		return Err(LifecycleError::ResolveWithoutAssignee);
	}
	Ok(())
}

/// Moves `ticket` to `next`, maintaining `resolved_at`. Apply assignee
/// changes from the same update first.
pub fn apply_status(
	ticket: &mut Ticket,
	next: TicketStatus,
	now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
	validate_transition(ticket.status, next, ticket.assignee_id)?;
	if next == TicketStatus::Resolved {
		if ticket.status != TicketStatus::Resolved || ticket.resolved_at.is_none() {
			ticket.resolved_at = Some(now);
		}
	} else {
		ticket.resolved_at = None;
	}
	ticket.status = next;
	Ok(())
}

/// Ticket operations that touch more than one store.
#[derive(Clone)]
pub struct TicketLifecycle {
	users: Arc<dyn UserStore>,
	tickets: Arc<dyn TicketStore>,
	picker: Arc<dyn AssigneePicker>,
}

impl TicketLifecycle {
	pub fn new(
		users: Arc<dyn UserStore>,
		tickets: Arc<dyn TicketStore>,
		picker: Arc<dyn AssigneePicker>,
	) -> Self {
		Self {
			users,
			tickets,
			picker,
		}
	}

	/// Assigns a freshly created ticket to someone in the support pool.
	/// Returns the chosen assignee; never fails the caller.
	#[tracing::instrument(skip(self), fields(ticket_id = %ticket_id))]
	pub async fn auto_assign(&self, ticket_id: &TicketId) -> Option<UserId> {
		let pool = match self.users.list_active_support_users().await {
			Ok(pool) => pool,
			Err(e) => {
				tracing::warn!(error = %e, "failed to load support pool; leaving ticket unassigned");
				return None;
			}
		};

		let assignee = self.picker.pick(&pool)?.id;
		match self.tickets.set_assignee(ticket_id, Some(assignee)).await {
			Ok(()) => {
				tracing::info!(assignee_id = %assignee, "ticket auto-assigned");
				Some(assignee)
			}
			Err(e) => {
				tracing::warn!(error = %e, "auto-assignment failed; leaving ticket unassigned");
				None
			}
		}
	}

	/// Assigns every unassigned open or in-progress ticket. Returns how many
	/// tickets received an assignee.
	#[tracing::instrument(skip(self))]
	pub async fn assign_backlog(&self) -> Result<usize, DbError> {
		let backlog = self.tickets.list_backlog().await?;
		let pool = self.users.list_active_support_users().await?;
		if pool.is_empty() {
			tracing::warn!(backlog = backlog.len(), "no active support users; backlog left as is");
			return Ok(0);
		}

		let mut assigned = 0;
		for ticket in &backlog {
			let Some(user) = self.picker.pick(&pool) else {
				continue;
			};
			self.tickets.set_assignee(&ticket.id, Some(user.id)).await?;
			assigned += 1;
		}
		tracing::info!(assigned, backlog = backlog.len(), "backlog assigned");
		Ok(assigned)
	}
}
