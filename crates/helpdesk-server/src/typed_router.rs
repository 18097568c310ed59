// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `/api` routers whose type says whether callers must be signed in.
//!
//! Routes added to an [`AuthedRouter`] are wrapped in bearer-token resolution
//! and a sign-in gate before any handler extractor runs. [`PublicRouter`]
//! routes see neither.

use std::marker::PhantomData;

use axum::{
	body::Body,
	extract::DefaultBodyLimit,
	http::{Request, StatusCode},
	middleware::{from_fn, from_fn_with_state, Next},
	response::Response,
	routing::MethodRouter,
	Router,
};
use helpdesk_server_auth::AuthContext;

use crate::{api::AppState, api_response, auth_middleware::auth_layer};

const API_PREFIX: &str = "/api";

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// How a finished router is guarded.
pub trait Access {
	fn guard(router: Router<AppState>, state: &AppState) -> Router<AppState>;
}

/// No caller resolution at all.
pub enum Public {}

/// Caller resolved from the bearer token and required.
pub enum SignedIn {}

impl Access for Public {
	fn guard(router: Router<AppState>, _state: &AppState) -> Router<AppState> {
		router
	}
}

impl Access for SignedIn {
	fn guard(router: Router<AppState>, state: &AppState) -> Router<AppState> {
		router
			.layer(from_fn(require_signed_in))
			.layer(from_fn_with_state(state.clone(), auth_layer))
	}
}

pub type PublicRouter = ApiRouter<Public>;
pub type AuthedRouter = ApiRouter<SignedIn>;

/// Rejects requests that `auth_layer` could not attach a user to.
#[tracing::instrument(skip_all, fields(signed_in = tracing::field::Empty))]
pub async fn require_signed_in(request: Request<Body>, next: Next) -> Response {
	let signed_in = request
		.extensions()
		.get::<AuthContext>()
		.is_some_and(|ctx| ctx.current_user.is_some());
	tracing::Span::current().record("signed_in", signed_in);

	if !signed_in {
		return api_response::error(StatusCode::UNAUTHORIZED, "Authentication required", None);
	}
	next.run(request).await
}

/// Request body limit for an upload route accepting files of up to
/// `max_upload_bytes`.
pub fn upload_body_limit(max_upload_bytes: u64) -> usize {
	usize::try_from(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
}

fn api_path(path: &str) -> String {
	format!("{API_PREFIX}{path}")
}

pub struct ApiRouter<A> {
	router: Router<AppState>,
	upload_limit: usize,
	access: PhantomData<A>,
}

impl<A: Access> ApiRouter<A> {
	pub fn new() -> Self {
		Self {
			router: Router::new(),
			upload_limit: upload_body_limit(0),
			access: PhantomData,
		}
	}

	/// Sets the file size that [`ApiRouter::upload`] routes accept.
	pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
		self.upload_limit = upload_body_limit(max_upload_bytes);
		self
	}

	/// Registers `path` below `/api`.
	pub fn route(mut self, path: &str, method_router: MethodRouter<AppState>) -> Self {
		self.router = self.router.route(&api_path(path), method_router);
		self
	}

	/// Like [`ApiRouter::route`], with the body limit raised for multipart files.
	pub fn upload(self, path: &str, method_router: MethodRouter<AppState>) -> Self {
		let limit = self.upload_limit;
		self.route(path, method_router.layer(DefaultBodyLimit::max(limit)))
	}

	pub fn build(self, state: &AppState) -> Router<AppState> {
		A::guard(self.router, state)
	}
}

impl<A: Access> Default for ApiRouter<A> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::routing::get;
	use helpdesk_server_auth::{CurrentUser, Role, User};
	use tower::ServiceExt;

	async fn ok() -> &'static str {
		"ok"
	}

	async fn call(router: Router, context: Option<AuthContext>) -> StatusCode {
		let mut request = Request::builder().uri("/me").body(Body::empty()).unwrap();
		if let Some(context) = context {
			request.extensions_mut().insert(context);
		}
		router.oneshot(request).await.unwrap().status()
	}

	#[test]
	fn paths_are_mounted_under_api() {
		assert_eq!(api_path("/tickets/{id}"), "/api/tickets/{id}");
	}

	#[test]
	fn upload_limit_covers_multipart_framing() {
		assert_eq!(upload_body_limit(1024), 1024 + 64 * 1024);
		assert_eq!(upload_body_limit(u64::MAX), usize::try_from(u64::MAX).unwrap_or(usize::MAX));
	}

	#[tokio::test]
	async fn sign_in_gate_rejects_anonymous_callers() {
		let router = Router::new()
			.route("/me", get(ok))
			.layer(from_fn(require_signed_in));

		assert_eq!(call(router.clone(), None).await, StatusCode::UNAUTHORIZED);
		assert_eq!(
			call(router.clone(), Some(AuthContext::unauthenticated())).await,
			StatusCode::UNAUTHORIZED
		);

		let user = User::new("agent@example.com", "Anna", "Agent", Role::Support);
		assert_eq!(
			call(router, Some(AuthContext::authenticated(CurrentUser::dev(user)))).await,
			StatusCode::OK
		);
	}
}
