// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account provisioning shared by registration, administrator user creation,
//! the `create-admin` command, and the startup bootstrap admin.

use helpdesk_server_auth::{
	check_password_strength, hash_password, normalize_email, validate_email, validate_name, Role,
	User,
};
use helpdesk_server_config::BootstrapAdminConfig;
use helpdesk_server_db::{DbError, UserStore};

use crate::error::ServerError;
use crate::validation::FieldErrors;

/// Input for a new account before validation.
#[derive(Clone)]
pub struct NewAccount<'a> {
	pub first_name: &'a str,
	pub last_name: &'a str,
	pub email: &'a str,
	pub password: &'a str,
	pub role: Role,
}

impl std::fmt::Debug for NewAccount<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NewAccount")
			.field("email", &self.email)
			.field("role", &self.role)
			.finish_non_exhaustive()
	}
}

/// Checks names, email format, and password strength, adding any problems
/// to `errors`.
pub fn validate_account_fields(errors: &mut FieldErrors, account: &NewAccount<'_>) {
	errors.check("firstName", validate_name(account.first_name));
	errors.check("lastName", validate_name(account.last_name));
	errors.check("email", validate_email(account.email));
	if account.password.is_empty() {
		errors.add("password", "This field is required");
	} else {
		for problem in check_password_strength(account.password) {
			errors.add("password", problem);
		}
	}
}

/// Validates and stores a new account.
///
/// # Errors
///
/// `ServerError::Validation` for bad input or an email already in use.
#[tracing::instrument(skip(users, account), fields(role = %account.role))]
pub async fn create_account(
	users: &dyn UserStore,
	account: NewAccount<'_>,
	mut errors: FieldErrors,
) -> Result<User, ServerError> {
	validate_account_fields(&mut errors, &account);
	let email = normalize_email(account.email);
	if !errors.contains("email") && users.get_user_by_email(&email).await?.is_some() {
		errors.add("email", "A user with this email already exists");
	}
	errors.into_result()?;

	let password_hash = hash_password(account.password)?;
	let user = User::new(
		email,
		account.first_name.trim(),
		account.last_name.trim(),
		account.role,
	);

	match users.create_user(&user, &password_hash).await {
		Ok(()) => {}
		Err(DbError::Conflict(_)) => {
			return Err(ServerError::field(
				"email",
				"A user with this email already exists",
			))
		}
		Err(e) => return Err(e.into()),
	}

	tracing::info!(user_id = %user.id, role = %user.role, "account created");
	Ok(user)
}

/// Creates the configured administrator when no active administrator exists.
///
/// Returns the new account, or `None` when an administrator is already
/// present.
#[tracing::instrument(skip_all, fields(email = %config.email))]
pub async fn ensure_bootstrap_admin(
	users: &dyn UserStore,
	config: &BootstrapAdminConfig,
) -> Result<Option<User>, ServerError> {
	if users.count_active_admins().await? > 0 {
		tracing::debug!("active administrator present, skipping bootstrap");
		return Ok(None);
	}

	let account = NewAccount {
		first_name: &config.first_name,
		last_name: &config.last_name,
		email: &config.email,
		password: &config.password,
		role: Role::SysAdmin,
	};
	let user = create_account(users, account, FieldErrors::new()).await?;
	tracing::info!(user_id = %user.id, "bootstrap administrator created");
	Ok(Some(user))
}
