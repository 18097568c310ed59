// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token pairs issued at login and registration.
//!
//! Access tokens (`hd_at_`) authenticate API requests; refresh tokens
//! (`hd_rt_`) mint new access tokens. Both are 32 random bytes, hex encoded
//! behind the prefix, and only their SHA-256 hash is stored.

use crate::{hash_token, TokenId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TOKEN_BYTES: usize = 32;
pub const ACCESS_TOKEN_PREFIX: &str = "hd_at_";
pub const REFRESH_TOKEN_PREFIX: &str = "hd_rt_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	Access,
	Refresh,
}

impl TokenKind {
	pub fn prefix(&self) -> &'static str {
		match self {
			TokenKind::Access => ACCESS_TOKEN_PREFIX,
			TokenKind::Refresh => REFRESH_TOKEN_PREFIX,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			TokenKind::Access => "access",
			TokenKind::Refresh => "refresh",
		}
	}
}

impl fmt::Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TokenKind {
	type Err = crate::types::UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"access" => Ok(TokenKind::Access),
			"refresh" => Ok(TokenKind::Refresh),
			other => Err(crate::types::UnknownVariant {
				kind: "token kind",
				value: other.to_string(),
			}),
		}
	}
}

/// A stored bearer token. The plaintext is only available from [`AuthToken::issue`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
	pub id: TokenId,
	pub user_id: UserId,
	pub kind: TokenKind,
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
	pub revoked_at: Option<DateTime<Utc>>,
}

impl AuthToken {
	/// Issue a new token for `user_id` that lives for `ttl`.
	///
	/// Returns the record to persist and the plaintext to hand to the client.
	pub fn issue(user_id: UserId, kind: TokenKind, ttl: Duration) -> (Self, String) {
		let (plaintext, token_hash) = generate_token(kind);
		let now = Utc::now();
		let token = Self {
			id: TokenId::generate(),
			user_id,
			kind,
			token_hash,
			created_at: now,
			expires_at: now + ttl,
			revoked_at: None,
		};
		(token, plaintext)
	}

	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}

	pub fn is_revoked(&self) -> bool {
		self.revoked_at.is_some()
	}

	pub fn is_valid(&self) -> bool {
		!self.is_expired() && !self.is_revoked()
	}
}

/// Generate a token of the given kind. Returns (plaintext, sha256_hash).
pub fn generate_token(kind: TokenKind) -> (String, String) {
	use rand::Rng;
	let mut rng = rand::thread_rng();
	let bytes: [u8; TOKEN_BYTES] = rng.gen();
	let token = format!("{}{}", kind.prefix(), hex::encode(bytes));
	let hash = hash_token(&token);
	(token, hash)
}

/// Check whether a string has the exact shape of a token of `kind`.
pub fn is_valid_token_format(token: &str, kind: TokenKind) -> bool {
	match token.strip_prefix(kind.prefix()) {
		Some(hex_part) => {
			hex_part.len() == TOKEN_BYTES * 2 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
		}
		None => false,
	}
}
