// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing and strength rules.
//!
//! Passwords are stored as PHC-format Argon2id strings. Plaintext passwords
//! never leave this module except as the caller's own input.

use crate::argon2_config::argon2_instance;
use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use thiserror::Error;

pub const PASSWORD_MIN_CHARS: usize = 8;

/// Characters accepted as the required "special" character.
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Error)]
pub enum PasswordError {
	#[error("password hashing failed: {0}")]
	Hashing(String),
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verify a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
	let parsed_hash = match PasswordHash::new(hash) {
		Ok(h) => h,
		Err(_) => return false,
	};
	argon2_instance()
		.verify_password(password.as_bytes(), &parsed_hash)
		.is_ok()
}

/// Checks the strength rules and returns every violated rule.
///
/// A password needs at least 8 characters, an uppercase letter, a lowercase
/// letter, a digit, and one of [`PASSWORD_SPECIAL_CHARS`].
pub fn check_password_strength(password: &str) -> Vec<&'static str> {
	let mut problems = Vec::new();
	if password.chars().count() < PASSWORD_MIN_CHARS {
		problems.push("must be at least 8 characters");
	}
	if !password.chars().any(|c| c.is_ascii_uppercase()) {
		problems.push("must contain an uppercase letter");
	}
	if !password.chars().any(|c| c.is_ascii_lowercase()) {
		problems.push("must contain a lowercase letter");
	}
	if !password.chars().any(|c| c.is_ascii_digit()) {
		problems.push("must contain a number");
	}
	if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
		problems.push("must contain a special character");
	}
	problems
}
