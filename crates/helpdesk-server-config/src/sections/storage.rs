// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attachment storage configuration.

use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_ATTACHMENTS_DIR: &str = "./data/attachments";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct StorageConfig {
	/// Root directory for uploaded files.
	pub attachments_dir: PathBuf,
	pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
	fn default() -> Self {
		StorageConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfigLayer {
	#[serde(default)]
	pub attachments_dir: Option<PathBuf>,
	#[serde(default)]
	pub max_upload_bytes: Option<u64>,
}

impl StorageConfigLayer {
	pub fn merge(&mut self, other: StorageConfigLayer) {
		if other.attachments_dir.is_some() {
			self.attachments_dir = other.attachments_dir;
		}
		if other.max_upload_bytes.is_some() {
			self.max_upload_bytes = other.max_upload_bytes;
		}
	}

	pub fn finalize(self) -> StorageConfig {
		StorageConfig {
			attachments_dir: self
				.attachments_dir
				.unwrap_or_else(|| PathBuf::from(DEFAULT_ATTACHMENTS_DIR)),
			max_upload_bytes: self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
		}
	}
}
