// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-Based Access Control (ABAC) engine.
//!
//! Every authorization question the server asks goes through [`is_allowed`]:
//!
//! 1. **Types** ([`types`]): subjects, resources, and actions
//! 2. **Policies** ([`policies`]): one pure evaluator per resource type
//! 3. **Engine** ([`engine`]): hard denies, global roles, then dispatch
//!
//! ```text
//! is_allowed(subject, action, resource)
//!     │
//!     ├── Hard denies (inactive subject, admin managing own account)
//!     ├── SysAdmin → always allowed
//!     └── Route to resource-specific policy:
//!         ├── Ticket / TicketActivity → ticket
//!         ├── Comment → comment
//!         ├── Attachment → attachment
//!         ├── User → user
//!         ├── Category → category
//!         └── Metrics → metrics
//! ```
//!
//! # Example
//!
//! ```
//! use helpdesk_server_auth::abac::{is_allowed, Action, ResourceAttrs, SubjectAttrs};
//! use helpdesk_server_auth::{Role, TicketStatus, UserId};
//!
//! let creator = SubjectAttrs::new(UserId::generate(), Role::User);
//! let ticket = ResourceAttrs::ticket(creator.user_id, None, TicketStatus::Open);
//!
//! assert!(is_allowed(&creator, Action::Read, &ticket));
//! assert!(is_allowed(&creator, Action::Update, &ticket));
//! assert!(!is_allowed(&creator, Action::UpdateStatus, &ticket));
//! ```

pub mod engine;
pub mod policies;
pub mod types;

pub use engine::*;
pub use types::*;
