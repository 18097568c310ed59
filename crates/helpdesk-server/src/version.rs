// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for helpdesk-server.

/// Crate version from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the HTTP surface under `/api`.
pub const API_VERSION: &str = "v1";

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"helpdesk-server version: {VERSION}\n\
		 API version:             {API_VERSION}\n\
		 Platform:                {}-{}",
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}
