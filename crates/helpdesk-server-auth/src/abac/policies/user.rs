// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User account policies.
//!
//! Non-administrators may read and edit their own profile. Everything else is
//! administrator-only, and administrators are stopped from managing their own
//! account before this module is reached.

use crate::abac::{Action, ResourceAttrs, SubjectAttrs};

pub fn evaluate(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	match action {
		Action::Read | Action::Update => subject.is(resource.owner_user_id),
		_ => false,
	}
}
