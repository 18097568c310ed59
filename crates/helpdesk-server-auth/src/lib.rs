// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and ABAC (Attribute-Based Access Control) for the helpdesk.
//!
//! This crate provides:
//! - User identity, roles, and the ticket status/priority vocabularies
//! - Argon2 password hashing and strength checks
//! - Opaque bearer tokens (access and refresh) stored as SHA-256 hashes
//! - ABAC policy engine deciding every ticket, comment, attachment, user,
//!   category, and metrics request
//!
//! # ABAC Design Rationale
//!
//! Every authorization decision is evaluated from:
//!
//! - **Subject attributes**: who is asking (user ID, role, active flag)
//! - **Resource attributes**: what is being accessed (creator, assignee, status, privacy)
//! - **Action**: what operation is requested (read, update, assign, delete, ...)
//!
//! Keeping the rules in pure functions means they are unit-tested without the
//! HTTP layer, and handlers only load attributes and ask.
//!
//! # Security Considerations
//!
//! - Passwords are stored as Argon2id hashes
//! - Bearer tokens are stored as SHA-256 hashes, never plaintext
//! - Token values and passwords are never logged

pub mod abac;
pub mod admin;
mod argon2_config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod token;
pub mod types;
pub mod user;

pub use abac::{is_allowed, Action, ResourceAttrs, ResourceType, SubjectAttrs};
pub use admin::{check_can_change_role, check_can_delete_user, check_can_set_active};
pub use error::AuthError;
pub use middleware::{
	extract_bearer_token, identify_bearer_token, is_access_token, is_refresh_token, AuthConfig,
	AuthContext, AuthRequired, BearerTokenType, CurrentUser, DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
	DEFAULT_REFRESH_TOKEN_TTL_DAYS,
};
pub use password::{
	check_password_strength, hash_password, verify_password, PasswordError, PASSWORD_MIN_CHARS,
	PASSWORD_SPECIAL_CHARS,
};
pub use token::{
	generate_token, is_valid_token_format, AuthToken, TokenKind, ACCESS_TOKEN_PREFIX,
	REFRESH_TOKEN_PREFIX, TOKEN_BYTES,
};
pub use types::*;
pub use user::{
	normalize_email, validate_email, validate_name, User, UserSummary, NAME_MAX_CHARS,
	NAME_MIN_CHARS,
};

/// Hash a token using SHA-256 and return the hex-encoded result.
///
/// Tokens are hashed before database lookup so raw tokens are never stored.
/// The output is safe to log and store; the input is not.
pub fn hash_token(token: &str) -> String {
	use sha2::{Digest, Sha256};
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}
