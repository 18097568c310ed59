// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ABAC policy evaluation engine.
//!
//! [`is_allowed`] evaluates in three phases:
//!
//! 1. **Hard denies**: inactive subjects, and administrators acting on their own
//!    role, active flag, or account
//! 2. **Global role check**: SysAdmin gets full access
//! 3. **Resource-specific policy**: delegates to the policy modules
//!
//! All policy decisions are pure functions with no side effects.

use super::policies::{attachment, category, comment, metrics, ticket, user};
use super::types::{Action, ResourceAttrs, ResourceType, SubjectAttrs};
use tracing::instrument;

/// Evaluates whether a subject is allowed to perform an action on a resource.
///
/// The decision and the attributes it was based on are logged at debug level.
#[instrument(
    level = "debug",
    skip(subject, resource),
    fields(
        user_id = %subject.user_id,
        role = %subject.role,
        action = ?action,
        resource_type = ?resource.resource_type,
    )
)]
pub fn is_allowed(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	if is_hard_denied(subject, action, resource) {
		return false;
	}

	if check_global_roles(subject) {
		return true;
	}

	match resource.resource_type {
		ResourceType::Ticket => ticket::evaluate(subject, action, resource),
		ResourceType::TicketActivity => ticket::evaluate_activity(subject, action, resource),
		ResourceType::Comment => comment::evaluate(subject, action, resource),
		ResourceType::Attachment => attachment::evaluate(subject, action, resource),
		ResourceType::User => user::evaluate(subject, action, resource),
		ResourceType::Category => category::evaluate(subject, action, resource),
		ResourceType::Metrics => metrics::evaluate(subject, action, resource),
	}
}

/// Denials that no role overrides.
fn is_hard_denied(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	if !subject.is_active {
		return true;
	}

	resource.resource_type == ResourceType::User
		&& subject.is(resource.owner_user_id)
		&& matches!(
			action,
			Action::ChangeRole | Action::SetActive | Action::Delete
		)
}

fn check_global_roles(subject: &SubjectAttrs) -> bool {
	subject.is_system_admin()
}
