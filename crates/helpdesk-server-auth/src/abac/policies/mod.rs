// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource-specific ABAC policy modules.

pub mod attachment;
pub mod category;
pub mod comment;
pub mod metrics;
pub mod ticket;
pub mod user;
