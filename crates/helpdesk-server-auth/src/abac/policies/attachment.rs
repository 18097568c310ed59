// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attachment access policies.

use crate::abac::policies::comment::can_read_entry;
use crate::abac::{Action, ResourceAttrs, SubjectAttrs};

/// Evaluates attachment access policies. Attachments are immutable; only the
/// uploader deletes.
pub fn evaluate(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	match action {
		Action::Read => can_read_entry(subject, resource),
		Action::Delete => subject.is(resource.owner_user_id),
		_ => false,
	}
}
