// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for ABAC policy evaluation.
//!
//! - [`SubjectAttrs`]: the user making a request (id, role, active flag)
//! - [`ResourceAttrs`]: the thing being accessed (type, ownership, ticket state, privacy)
//! - [`Action`]: the operation being performed
//!
//! # Design Principles
//!
//! 1. **Immutable evaluation**: All attributes are computed before policy evaluation
//! 2. **No database access**: Policy functions are pure; all data is pre-loaded
//! 3. **Explicit attributes**: Every relevant fact is an explicit field, not derived

use crate::{Role, TicketStatus, User, UserId};
use serde::{Deserialize, Serialize};

/// Attributes describing the subject (user) requesting access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAttrs {
	pub user_id: UserId,
	pub role: Role,
	pub is_active: bool,
}

impl SubjectAttrs {
	/// Creates an active subject with the given role.
	pub fn new(user_id: UserId, role: Role) -> Self {
		Self {
			user_id,
			role,
			is_active: true,
		}
	}

	pub fn from_user(user: &User) -> Self {
		Self {
			user_id: user.id,
			role: user.role,
			is_active: user.is_active,
		}
	}

	pub fn is_system_admin(&self) -> bool {
		self.role == Role::SysAdmin
	}

	pub fn is_support(&self) -> bool {
		self.role == Role::Support
	}

	/// Support or administrator.
	pub fn is_staff(&self) -> bool {
		self.role.is_staff()
	}

	pub fn is(&self, user_id: Option<UserId>) -> bool {
		user_id == Some(self.user_id)
	}
}

/// Attributes describing the resource being accessed.
///
/// For comments, attachments, and ticket activity, the `ticket_*` fields
/// describe the parent ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAttrs {
	pub resource_type: ResourceType,
	/// Ticket creator, comment author, attachment uploader, or the user itself.
	pub owner_user_id: Option<UserId>,
	pub ticket_creator_id: Option<UserId>,
	pub ticket_assignee_id: Option<UserId>,
	pub ticket_status: Option<TicketStatus>,
	pub is_private: bool,
}

impl ResourceAttrs {
	fn bare(resource_type: ResourceType) -> Self {
		Self {
			resource_type,
			owner_user_id: None,
			ticket_creator_id: None,
			ticket_assignee_id: None,
			ticket_status: None,
			is_private: false,
		}
	}

	/// A ticket owned by `creator_id`.
	pub fn ticket(
		creator_id: UserId,
		assignee_id: Option<UserId>,
		status: TicketStatus,
	) -> Self {
		Self {
			owner_user_id: Some(creator_id),
			ticket_creator_id: Some(creator_id),
			ticket_assignee_id: assignee_id,
			ticket_status: Some(status),
			..Self::bare(ResourceType::Ticket)
		}
	}

	/// The ticket collection as a whole, for queue listings.
	pub fn ticket_queue() -> Self {
		Self::bare(ResourceType::Ticket)
	}

	/// The comment and attachment collections of a ticket.
	pub fn ticket_activity(creator_id: UserId, assignee_id: Option<UserId>) -> Self {
		Self {
			ticket_creator_id: Some(creator_id),
			ticket_assignee_id: assignee_id,
			..Self::bare(ResourceType::TicketActivity)
		}
	}

	/// A comment written by `author_id` on a ticket.
	pub fn comment(
		author_id: UserId,
		ticket_creator_id: UserId,
		ticket_assignee_id: Option<UserId>,
	) -> Self {
		Self {
			owner_user_id: Some(author_id),
			ticket_creator_id: Some(ticket_creator_id),
			ticket_assignee_id,
			..Self::bare(ResourceType::Comment)
		}
	}

	/// An attachment uploaded by `uploader_id` to a ticket.
	pub fn attachment(
		uploader_id: UserId,
		ticket_creator_id: UserId,
		ticket_assignee_id: Option<UserId>,
	) -> Self {
		Self {
			owner_user_id: Some(uploader_id),
			ticket_creator_id: Some(ticket_creator_id),
			ticket_assignee_id,
			..Self::bare(ResourceType::Attachment)
		}
	}

	/// A user account.
	pub fn user(user_id: UserId) -> Self {
		Self {
			owner_user_id: Some(user_id),
			..Self::bare(ResourceType::User)
		}
	}

	pub fn category() -> Self {
		Self::bare(ResourceType::Category)
	}

	pub fn metrics() -> Self {
		Self::bare(ResourceType::Metrics)
	}

	/// Builder: set is_private.
	pub fn with_private(mut self, is_private: bool) -> Self {
		self.is_private = is_private;
		self
	}

	pub fn is_unassigned(&self) -> bool {
		self.ticket_assignee_id.is_none()
	}
}

/// Types of resources that can be protected by ABAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	Ticket,
	TicketActivity,
	Comment,
	Attachment,
	User,
	Category,
	Metrics,
}

/// Actions that can be performed on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Read,
	/// Enumerate every instance (user directory, support queues).
	List,
	Create,
	/// Create a comment or attachment hidden from regular users.
	CreatePrivate,
	Update,
	/// Change only the status of a ticket.
	UpdateStatus,
	/// Change the assignee of a ticket.
	Assign,
	Delete,
	/// Change another user's role.
	ChangeRole,
	/// Activate or deactivate another user.
	SetActive,
	/// Per-user activity report.
	ViewActivity,
}
