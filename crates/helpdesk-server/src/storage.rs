// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attachment file storage.
//!
//! Files live under a root directory as `<ticket id>/<random id>_<safe name>`.
//! Only that relative path is recorded in the database; the root comes from
//! configuration.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use helpdesk_server_auth::TicketId;
use regex::Regex;
use uuid::Uuid;

use crate::error::ServerError;

pub const ALLOWED_EXTENSIONS: &[&str] = &[
	"pdf", "doc", "docx", "txt", "xlsx", "xls", "jpg", "jpeg", "png", "gif", "bmp", "zip", "rar",
	"7z",
];

const MAX_STORED_NAME_CHARS: usize = 100;

static UNSAFE_FILENAME_CHARS: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").ok());

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("file has no extension")]
	MissingExtension,

	#[error("file type .{0} is not allowed")]
	DisallowedExtension(String),

	#[error("file is empty")]
	Empty,

	#[error("file exceeds the maximum size of {max} bytes")]
	TooLarge { max: u64 },

	#[error("invalid stored path")]
	InvalidPath,

	#[error("stored file not found")]
	NotFound,

	#[error("storage I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl From<StorageError> for ServerError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::MissingExtension
			| StorageError::DisallowedExtension(_)
			| StorageError::Empty
			| StorageError::TooLarge { .. } => ServerError::field("file", err.to_string()),
			StorageError::NotFound => ServerError::NotFound("File".to_string()),
			StorageError::InvalidPath | StorageError::Io(_) => ServerError::Internal(err.to_string()),
		}
	}
}

/// Where attachment bytes are kept.
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
	/// Stores `bytes` and returns the path to record.
	async fn save(
		&self,
		ticket_id: &TicketId,
		original_filename: &str,
		bytes: &[u8],
	) -> Result<String, StorageError>;

	async fn read(&self, stored_path: &str) -> Result<Vec<u8>, StorageError>;

	async fn delete(&self, stored_path: &str) -> Result<(), StorageError>;
}

/// Stores files on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalAttachmentStorage {
	root: PathBuf,
}

impl LocalAttachmentStorage {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Joins a recorded path onto the root, refusing anything that could
	/// escape it.
	fn resolve(&self, stored_path: &str) -> Result<PathBuf, StorageError> {
		let relative = Path::new(stored_path);
		let is_plain = relative
			.components()
			.all(|component| matches!(component, Component::Normal(_)));
		if stored_path.is_empty() || !is_plain {
			return Err(StorageError::InvalidPath);
		}
		Ok(self.root.join(relative))
	}
}

#[async_trait]
impl AttachmentStorage for LocalAttachmentStorage {
	#[tracing::instrument(skip(self, original_filename, bytes), fields(ticket_id = %ticket_id, size = bytes.len()))]
	async fn save(
		&self,
		ticket_id: &TicketId,
		original_filename: &str,
		bytes: &[u8],
	) -> Result<String, StorageError> {
		let stored_path = format!(
			"{ticket_id}/{}_{}",
			Uuid::new_v4().simple(),
			safe_filename(original_filename)
		);
		let full_path = self.resolve(&stored_path)?;
		if let Some(parent) = full_path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(&full_path, bytes).await?;
		tracing::debug!(stored_path = %stored_path, "attachment stored");
		Ok(stored_path)
	}

	async fn read(&self, stored_path: &str) -> Result<Vec<u8>, StorageError> {
		let full_path = self.resolve(stored_path)?;
		match tokio::fs::read(&full_path).await {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Io(e)),
		}
	}

	async fn delete(&self, stored_path: &str) -> Result<(), StorageError> {
		let full_path = self.resolve(stored_path)?;
		match tokio::fs::remove_file(&full_path).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Io(e)),
		}
	}
}

/// Lowercased extension of `filename`, without the dot.
pub fn extension_of(filename: &str) -> Option<String> {
	Path::new(filename)
		.extension()
		.and_then(|ext| ext.to_str())
		.filter(|ext| !ext.is_empty())
		.map(|ext| ext.to_ascii_lowercase())
}

/// Checks the extension whitelist and size limit.
pub fn validate_upload(filename: &str, size: u64, max_bytes: u64) -> Result<(), StorageError> {
	let ext = extension_of(filename).ok_or(StorageError::MissingExtension)?;
	if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
		return Err(StorageError::DisallowedExtension(ext));
	}
	if size == 0 {
		return Err(StorageError::Empty);
	}
	if size > max_bytes {
		return Err(StorageError::TooLarge { max: max_bytes });
	}
	Ok(())
}

/// MIME type guessed from the file name.
pub fn guess_mime_type(filename: &str) -> String {
	mime_guess::from_path(filename)
		.first_or_octet_stream()
		.essence_str()
		.to_string()
}

/// A file name reduced to characters safe on any filesystem.
pub fn safe_filename(filename: &str) -> String {
	let base = Path::new(filename)
		.file_name()
		.and_then(|name| name.to_str())
		.unwrap_or("file");
	let cleaned = match UNSAFE_FILENAME_CHARS.as_ref() {
		Some(re) => re.replace_all(base, "_").into_owned(),
		None => base.to_string(),
	};
	let cleaned = cleaned.trim_start_matches('.');
	let truncated: String = cleaned.chars().rev().take(MAX_STORED_NAME_CHARS).collect::<Vec<_>>().into_iter().rev().collect();
	if truncated.is_empty() {
		"file".to_string()
	} else {
		truncated
	}
}

/// Deletes stored files, logging and swallowing failures.
pub async fn delete_files_best_effort(storage: &dyn AttachmentStorage, stored_paths: &[String]) {
	for path in stored_paths {
		if let Err(e) = storage.delete(path).await {
			tracing::warn!(stored_path = %path, error = %e, "failed to delete attachment file");
		}
	}
}
