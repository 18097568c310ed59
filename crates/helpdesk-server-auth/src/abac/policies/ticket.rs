// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket access policies.
//!
//! Administrators never reach these functions; the engine grants them access
//! before dispatch. What remains is the support/creator split:
//!
//! | action         | support                         | regular user                  |
//! |----------------|---------------------------------|-------------------------------|
//! | read           | unassigned or assigned to self  | creator                       |
//! | update         | unassigned or assigned to self  | creator while status is open  |
//! | update status  | assigned to self                | never                         |
//! | assign         | unassigned or assigned to self  | never                         |
//! | delete         | never                           | never                         |
//!
//! A support user who created a ticket also passes the creator rule for
//! `update`.

use crate::abac::{Action, ResourceAttrs, SubjectAttrs};
use crate::{Role, TicketStatus};

/// Evaluates ticket access policies.
pub fn evaluate(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	match action {
		Action::Read => can_view(subject, resource),
		Action::Create => true,
		Action::List => subject.is_staff(),
		Action::Update => works_queue(subject, resource) || is_open_and_created_by(subject, resource),
		Action::UpdateStatus => {
			subject.is_support() && subject.is(resource.ticket_assignee_id)
		}
		Action::Assign => works_queue(subject, resource),
		_ => false,
	}
}

/// Evaluates access to a ticket's comment and attachment collections.
///
/// This rule is broader than [`can_view`]: the creator is always let in,
/// whatever their role.
pub fn evaluate_activity(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	let visible = works_queue(subject, resource) || subject.is(resource.ticket_creator_id);
	match action {
		Action::Read | Action::Create => visible,
		Action::CreatePrivate => visible && subject.is_staff(),
		_ => false,
	}
}

/// Whether `subject` may see the ticket. Unknown combinations fail closed.
fn can_view(subject: &SubjectAttrs, resource: &ResourceAttrs) -> bool {
	match subject.role {
		Role::SysAdmin => true,
		Role::Support => is_unassigned_or_self(subject, resource),
		Role::User => subject.is(resource.ticket_creator_id),
	}
}

/// Support users work the unassigned pool and their own queue.
fn works_queue(subject: &SubjectAttrs, resource: &ResourceAttrs) -> bool {
	subject.is_support() && is_unassigned_or_self(subject, resource)
}

fn is_unassigned_or_self(subject: &SubjectAttrs, resource: &ResourceAttrs) -> bool {
	resource.is_unassigned() || subject.is(resource.ticket_assignee_id)
}

fn is_open_and_created_by(subject: &SubjectAttrs, resource: &ResourceAttrs) -> bool {
	subject.is(resource.ticket_creator_id) && resource.ticket_status == Some(TicketStatus::Open)
}
