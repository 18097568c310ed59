// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Metrics policies. Support reads the ticket rollups; the per-user activity
//! report stays with administrators.

use crate::abac::{Action, ResourceAttrs, SubjectAttrs};

pub fn evaluate(subject: &SubjectAttrs, action: Action, _resource: &ResourceAttrs) -> bool {
	match action {
		Action::Read => subject.is_staff(),
		_ => false,
	}
}
