// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Administrator account-management checks.
//!
//! These mirror the hard denies in the ABAC engine but carry a reason, so
//! handlers can tell an administrator why their request was refused.
//!
//! # Rules
//!
//! - Only system admins manage other accounts
//! - An administrator cannot change their own role
//! - An administrator cannot deactivate or delete their own account

use crate::error::AuthError;
use crate::user::User;

/// Check if the actor can change the target's role.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` if the actor is not an administrator or is
/// the target.
pub fn check_can_change_role(actor: &User, target: &User) -> Result<(), AuthError> {
	require_admin(actor, "Only system admins can change user roles")?;
	if actor.id == target.id {
		return Err(AuthError::Forbidden("Cannot change your own role".into()));
	}
	Ok(())
}

/// Check if the actor can activate or deactivate the target.
pub fn check_can_set_active(actor: &User, target: &User) -> Result<(), AuthError> {
	require_admin(actor, "Only system admins can change account status")?;
	if actor.id == target.id {
		return Err(AuthError::Forbidden(
			"Cannot change your own account status".into(),
		));
	}
	Ok(())
}

/// Check if the actor can delete the target.
pub fn check_can_delete_user(actor: &User, target: &User) -> Result<(), AuthError> {
	require_admin(actor, "Only system admins can delete users")?;
	if actor.id == target.id {
		return Err(AuthError::Forbidden("Cannot delete your own account".into()));
	}
	Ok(())
}

fn require_admin(actor: &User, message: &str) -> Result<(), AuthError> {
	if !actor.is_system_admin() || !actor.is_active {
		return Err(AuthError::Forbidden(message.into()));
	}
	Ok(())
}
