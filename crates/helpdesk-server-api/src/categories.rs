// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use helpdesk_server_auth::CategoryId;
use helpdesk_server_db::CategoryWithCount;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::deserialize_nullable;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
	pub id: CategoryId,
	pub name: String,
	pub description: Option<String>,
	pub created_at: DateTime<Utc>,
	pub ticket_count: i64,
}

impl From<&CategoryWithCount> for CategoryResponse {
	fn from(entry: &CategoryWithCount) -> Self {
		Self {
			id: entry.category.id,
			name: entry.category.name.clone(),
			description: entry.category.description.clone(),
			created_at: entry.category.created_at,
			ticket_count: entry.ticket_count,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CategoryListResponse {
	pub count: usize,
	pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct CategoryListParams {
	pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateCategoryRequest {
	#[serde(default)]
	pub name: String,
	pub description: Option<String>,
}

/// `description: null` clears the description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateCategoryRequest {
	pub name: Option<String>,
	#[serde(default, deserialize_with = "deserialize_nullable")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub description: Option<Option<String>>,
}
