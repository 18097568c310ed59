// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Category policies: readable by every authenticated user, managed by administrators.

use crate::abac::{Action, ResourceAttrs, SubjectAttrs};

pub fn evaluate(_subject: &SubjectAttrs, action: Action, _resource: &ResourceAttrs) -> bool {
	matches!(action, Action::Read | Action::List)
}
