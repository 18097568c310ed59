// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::IntoParams;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `page` (1-based) and `pageSize` query parameters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
	pub page: Option<u32>,
	#[serde(alias = "page_size")]
	pub page_size: Option<u32>,
}

impl PageParams {
	/// Page number, at least 1.
	pub fn page(&self) -> u32 {
		self.page.unwrap_or(1).max(1)
	}

	/// Page size clamped to `1..=MAX_PAGE_SIZE`.
	pub fn page_size(&self) -> u32 {
		self.page_size
			.unwrap_or(DEFAULT_PAGE_SIZE)
			.clamp(1, MAX_PAGE_SIZE)
	}

	pub fn limit(&self) -> i64 {
		i64::from(self.page_size())
	}

	pub fn offset(&self) -> i64 {
		i64::from(self.page() - 1) * self.limit()
	}
}

/// One page of results with the overall count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
	pub count: i64,
	pub page: u32,
	pub page_size: u32,
	pub total_pages: u32,
	pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
	pub fn new(results: Vec<T>, count: i64, params: &PageParams) -> Self {
		let page_size = params.page_size();
		let total_pages = if count <= 0 {
			0
		} else {
			u32::try_from((count + i64::from(page_size) - 1) / i64::from(page_size))
				.unwrap_or(u32::MAX)
		};
		Self {
			count,
			page: params.page(),
			page_size,
			total_pages,
			results,
		}
	}
}
