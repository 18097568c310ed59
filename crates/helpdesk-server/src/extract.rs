// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Extractors whose rejections render as error envelopes.
//!
//! axum's stock `Json`, `Query`, and `Path` reject with plain-text bodies;
//! these wrappers keep every failure in the same shape as handler errors.

use axum::{
	extract::{FromRequest, FromRequestParts, OptionalFromRequest, Path, Query, Request},
	http::request::Parts,
	Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ServerError;

/// JSON body. Malformed or mistyped bodies are a 400 with the parser message.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		match <Json<T> as FromRequest<S>>::from_request(req, state).await {
			Ok(Json(value)) => Ok(ApiJson(value)),
			Err(rejection) => Err(ServerError::BadRequest {
				message: "Invalid request body".to_string(),
				details: Some(json!({ "body": [rejection.body_text()] })),
			}),
		}
	}
}

/// Body-less requests (no `Content-Type`) extract as `None`.
impl<S, T> OptionalFromRequest<S> for ApiJson<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
		match <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await {
			Ok(value) => Ok(value.map(|Json(value)| ApiJson(value))),
			Err(rejection) => Err(ServerError::BadRequest {
				message: "Invalid request body".to_string(),
				details: Some(json!({ "body": [rejection.body_text()] })),
			}),
		}
	}
}

/// Query string. Unparseable parameters are a 400.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		match <Query<T> as FromRequestParts<S>>::from_request_parts(parts, state).await {
			Ok(Query(value)) => Ok(ApiQuery(value)),
			Err(rejection) => Err(ServerError::BadRequest {
				message: "Invalid query parameters".to_string(),
				details: Some(json!({ "query": [rejection.body_text()] })),
			}),
		}
	}
}

/// Path parameters. An id that does not parse cannot name a resource, so it
/// is a 404 like any other unknown id.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
	T: DeserializeOwned + Send,
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		match <Path<T> as FromRequestParts<S>>::from_request_parts(parts, state).await {
			Ok(Path(value)) => Ok(ApiPath(value)),
			Err(rejection) => {
				tracing::debug!(error = %rejection.body_text(), "unparseable path parameter");
				Err(ServerError::NotFound("Resource".to_string()))
			}
		}
	}
}
