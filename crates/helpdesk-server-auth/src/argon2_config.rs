// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argon2 configuration for password hashing.
//!
//! Release builds use `Argon2::default()` (Argon2id, 19 MiB, 2 iterations).
//! Unit tests and the `fast-hash` feature use minimal parameters; neither may
//! be enabled in a deployed binary.

use argon2::Argon2;
#[cfg(any(test, feature = "fast-hash"))]
use argon2::{Algorithm, Params, Version};

#[inline]
pub(crate) fn argon2_instance() -> Argon2<'static> {
	#[cfg(any(test, feature = "fast-hash"))]
	{
		// 1 MiB, 1 iteration, 1 lane. These constants are always valid.
		match Params::new(1024, 1, 1, None) {
			Ok(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
			Err(_) => Argon2::default(),
		}
	}

	#[cfg(not(any(test, feature = "fast-hash")))]
	{
		Argon2::default()
	}
}
