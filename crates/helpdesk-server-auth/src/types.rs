// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared by authentication, authorization, and storage.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`], [`TicketId`],
//!   [`CommentId`], ...) so a ticket id can never be passed where a user id is expected
//! - **Roles**: the fixed [`Role`] set every authorization decision is based on
//! - **Ticket enums**: [`TicketStatus`] and [`TicketPriority`] with their wire names
//!
//! All ID types serialize transparently as UUID strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(TicketId, "Unique identifier for a ticket.");
define_id_type!(CommentId, "Unique identifier for a ticket comment.");
define_id_type!(AttachmentId, "Unique identifier for a ticket attachment.");
define_id_type!(CategoryId, "Unique identifier for a ticket category.");
define_id_type!(TokenId, "Unique identifier for an issued bearer token.");

/// Error returned when parsing one of the string-backed enums fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
	pub kind: &'static str,
	pub value: String,
}

impl fmt::Display for UnknownVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown {}: {}", self.kind, self.value)
	}
}

impl std::error::Error for UnknownVariant {}

// =============================================================================
// Roles
// =============================================================================

/// The role a user holds. There is no role hierarchy beyond what the
/// policies in [`crate::abac`] encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
	/// Regular user: creates tickets and follows their own.
	#[default]
	User,
	/// Support staff: works the unassigned pool and their own queue.
	Support,
	/// System administrator: full access.
	SysAdmin,
}

impl Role {
	/// Returns all available roles.
	pub fn all() -> &'static [Role] {
		&[Role::User, Role::Support, Role::SysAdmin]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Support => "support",
			Role::SysAdmin => "sysAdmin",
		}
	}

	/// Human readable label.
	pub fn display_name(&self) -> &'static str {
		match self {
			Role::User => "User",
			Role::Support => "Support",
			Role::SysAdmin => "System Administrator",
		}
	}

	/// Support and administrators form the staff that may see private
	/// comments and attachments and be assigned tickets.
	pub fn is_staff(&self) -> bool {
		matches!(self, Role::Support | Role::SysAdmin)
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"user" => Ok(Role::User),
			"support" => Ok(Role::Support),
			"sysAdmin" => Ok(Role::SysAdmin),
			other => Err(UnknownVariant {
				kind: "role",
				value: other.to_string(),
			}),
		}
	}
}

// =============================================================================
// Ticket Status
// =============================================================================

/// Lifecycle status of a ticket. `Closed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
	#[default]
	Open,
	InProgress,
	Resolved,
	Closed,
	Canceled,
}

impl TicketStatus {
	pub fn all() -> &'static [TicketStatus] {
		&[
			TicketStatus::Open,
			TicketStatus::InProgress,
			TicketStatus::Resolved,
			TicketStatus::Closed,
			TicketStatus::Canceled,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			TicketStatus::Open => "open",
			TicketStatus::InProgress => "in_progress",
			TicketStatus::Resolved => "resolved",
			TicketStatus::Closed => "closed",
			TicketStatus::Canceled => "canceled",
		}
	}

	pub fn display_name(&self) -> &'static str {
		match self {
			TicketStatus::Open => "Open",
			TicketStatus::InProgress => "In Progress",
			TicketStatus::Resolved => "Resolved",
			TicketStatus::Closed => "Closed",
			TicketStatus::Canceled => "Canceled",
		}
	}

	pub fn is_terminal(&self) -> bool {
		matches!(self, TicketStatus::Closed)
	}
}

impl fmt::Display for TicketStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TicketStatus {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TicketStatus::all()
			.iter()
			.copied()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| UnknownVariant {
				kind: "ticket status",
				value: s.to_string(),
			})
	}
}

// =============================================================================
// Ticket Priority
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
	Low,
	#[default]
	Medium,
	High,
	Urgent,
}

impl TicketPriority {
	pub fn all() -> &'static [TicketPriority] {
		&[
			TicketPriority::Low,
			TicketPriority::Medium,
			TicketPriority::High,
			TicketPriority::Urgent,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			TicketPriority::Low => "low",
			TicketPriority::Medium => "medium",
			TicketPriority::High => "high",
			TicketPriority::Urgent => "urgent",
		}
	}

	pub fn display_name(&self) -> &'static str {
		match self {
			TicketPriority::Low => "Low",
			TicketPriority::Medium => "Medium",
			TicketPriority::High => "High",
			TicketPriority::Urgent => "Urgent",
		}
	}
}

impl fmt::Display for TicketPriority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TicketPriority {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TicketPriority::all()
			.iter()
			.copied()
			.find(|priority| priority.as_str() == s)
			.ok_or_else(|| UnknownVariant {
				kind: "ticket priority",
				value: s.to_string(),
			})
	}
}
