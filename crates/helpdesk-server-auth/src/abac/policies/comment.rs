// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Comment access policies.

use crate::abac::policies::ticket;
use crate::abac::{Action, ResourceAttrs, SubjectAttrs};

/// Evaluates comment access policies.
///
/// Reading requires access to the parent ticket's activity; private comments
/// are additionally limited to staff. Only the author edits or deletes.
pub fn evaluate(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	match action {
		Action::Read => can_read_entry(subject, resource),
		Action::Update | Action::Delete => subject.is(resource.owner_user_id),
		_ => false,
	}
}

/// Shared by comments and attachments.
pub(crate) fn can_read_entry(subject: &SubjectAttrs, resource: &ResourceAttrs) -> bool {
	let Some(creator_id) = resource.ticket_creator_id else {
		return false;
	};
	let activity = ResourceAttrs::ticket_activity(creator_id, resource.ticket_assignee_id);
	ticket::evaluate_activity(subject, Action::Read, &activity)
		&& (!resource.is_private || subject.is_staff())
}
