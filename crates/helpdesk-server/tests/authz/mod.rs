// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod attachments;
mod auth;
mod categories;
mod comments;
mod metrics;
mod support;
mod tickets;
mod users;
