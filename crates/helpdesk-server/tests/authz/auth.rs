// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration, sessions, and public endpoints.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::support::{expect_json, TestApp, PASSWORD};

fn registration(email: &str) -> Value {
	json!({
		"firstName": "Hana",
		"lastName": "Newcomer",
		"email": email,
		"password": PASSWORD,
		"confirmPassword": PASSWORD,
	})
}

async fn login(app: &TestApp, email: &str, password: &str) -> axum::response::Response {
	app.post(
		"/api/auth/login",
		None,
		json!({"email": email, "password": password}),
	)
	.await
}

#[tokio::test]
async fn register_issues_working_tokens() {
	let app = TestApp::new().await;

	let body = expect_json(
		app.post("/api/auth/register", None, registration("hana@example.test"))
			.await,
		StatusCode::CREATED,
	)
	.await;
	let data = &body["data"];
	assert_eq!(data["user"]["role"], "user");
	assert_eq!(data["user"]["email"], "hana@example.test");
	assert!(data["refreshToken"].is_string());

	let token = data["accessToken"].as_str().unwrap();
	let me = expect_json(app.get_with_token("/api/auth/me", token).await, StatusCode::OK).await;
	assert_eq!(me["data"]["fullName"], "Hana Newcomer");
}

#[tokio::test]
async fn register_validation() {
	let app = TestApp::new().await;

	let mut mismatch = registration("ivan@example.test");
	mismatch["confirmPassword"] = json!("Different1!");
	let body = expect_json(
		app.post("/api/auth/register", None, mismatch).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["details"]["confirmPassword"][0], "Passwords do not match");

	let weak = json!({
		"firstName": "Ivan",
		"lastName": "Weak",
		"email": "ivan@example.test",
		"password": "password",
		"confirmPassword": "password",
	});
	let body = expect_json(
		app.post("/api/auth/register", None, weak).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	let problems = body["details"]["password"].as_array().unwrap();
	assert!(problems.iter().any(|p| p == "must contain an uppercase letter"));
	assert!(problems.iter().any(|p| p == "must contain a number"));

	let body = expect_json(
		app.post("/api/auth/register", None, registration("CARLA@example.test"))
			.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(
		body["details"]["email"][0],
		"A user with this email already exists"
	);

	let body = expect_json(
		app.post("/api/auth/register", None, json!({})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	for field in ["firstName", "lastName", "email", "password", "confirmPassword"] {
		assert!(body["details"][field].is_array(), "{field}");
	}
}

#[tokio::test]
async fn login_outcomes() {
	let app = TestApp::new().await;

	let body = expect_json(login(&app, "carla@example.test", PASSWORD).await, StatusCode::OK).await;
	assert_eq!(body["data"]["user"]["id"], app.fixtures.user_a.id().to_string());
	assert!(body["data"]["user"]["lastLogin"].is_string());

	let body = expect_json(
		login(&app, "carla@example.test", "Wrong-pass1").await,
		StatusCode::UNAUTHORIZED,
	)
	.await;
	assert_eq!(body["error"], "Invalid email or password");

	let body = expect_json(
		login(&app, "nobody@example.test", PASSWORD).await,
		StatusCode::UNAUTHORIZED,
	)
	.await;
	assert_eq!(body["error"], "Invalid email or password");

	let body = expect_json(login(&app, "", "").await, StatusCode::BAD_REQUEST).await;
	assert!(body["details"]["email"].is_array());
	assert!(body["details"]["password"].is_array());
}

#[tokio::test]
async fn refresh_exchanges_only_refresh_tokens() {
	let app = TestApp::new().await;

	let body = expect_json(
		app.post("/api/auth/refresh", None, json!({})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["refreshToken"].is_array());

	let access = app.fixtures.user_a.access_token.clone();
	expect_json(
		app.post("/api/auth/refresh", None, json!({"refreshToken": access}))
			.await,
		StatusCode::UNAUTHORIZED,
	)
	.await;

	let session = expect_json(login(&app, "carla@example.test", PASSWORD).await, StatusCode::OK).await;
	let refresh_token = session["data"]["refreshToken"].as_str().unwrap();
	let body = expect_json(
		app.post(
			"/api/auth/refresh",
			None,
			json!({"refreshToken": refresh_token}),
		)
		.await,
		StatusCode::OK,
	)
	.await;
	let new_access = body["data"]["accessToken"].as_str().unwrap();
	expect_json(
		app.get_with_token("/api/auth/me", new_access).await,
		StatusCode::OK,
	)
	.await;
}

#[tokio::test]
async fn logout_revokes_tokens() {
	let app = TestApp::new().await;
	let session = expect_json(login(&app, "carla@example.test", PASSWORD).await, StatusCode::OK).await;
	let access = session["data"]["accessToken"].as_str().unwrap().to_string();
	let refresh = session["data"]["refreshToken"].as_str().unwrap().to_string();

	let response = app
		.router
		.clone()
		.oneshot(
			axum::http::Request::builder()
				.method("POST")
				.uri("/api/auth/logout")
				.header("authorization", format!("Bearer {access}"))
				.header("content-type", "application/json")
				.body(axum::body::Body::from(
					json!({"refreshToken": refresh}).to_string(),
				))
				.unwrap(),
		)
		.await
		.unwrap();
	expect_json(response, StatusCode::OK).await;

	let response = app.get_with_token("/api/auth/me", &access).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	expect_json(
		app.post("/api/auth/refresh", None, json!({"refreshToken": refresh}))
			.await,
		StatusCode::UNAUTHORIZED,
	)
	.await;

	// Other sessions stay valid.
	expect_json(
		app.get("/api/auth/me", Some(&app.fixtures.user_a)).await,
		StatusCode::OK,
	)
	.await;
}

#[tokio::test]
async fn logout_without_body() {
	let app = TestApp::new().await;
	let user = &app.fixtures.user_b;
	let response = app
		.router
		.clone()
		.oneshot(
			axum::http::Request::builder()
				.method("POST")
				.uri("/api/auth/logout")
				.header("authorization", format!("Bearer {}", user.access_token))
				.body(axum::body::Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	expect_json(response, StatusCode::OK).await;
	assert_eq!(
		app.get("/api/auth/me", Some(user)).await.status(),
		StatusCode::UNAUTHORIZED
	);
}

#[tokio::test]
async fn change_password_flow() {
	let app = TestApp::new().await;
	let user = &app.fixtures.user_a;
	let new_password = "N3w-Passw0rd!";

	let body = expect_json(
		app.post(
			"/api/auth/change-password",
			Some(user),
			json!({
				"currentPassword": "not-it",
				"newPassword": new_password,
				"confirmPassword": new_password,
			}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(
		body["details"]["currentPassword"][0],
		"Current password is incorrect"
	);

	let body = expect_json(
		app.post(
			"/api/auth/change-password",
			Some(user),
			json!({
				"currentPassword": PASSWORD,
				"newPassword": new_password,
				"confirmPassword": "N3w-Passw0rd?",
			}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["confirmPassword"].is_array());

	expect_json(
		app.post(
			"/api/auth/change-password",
			Some(user),
			json!({
				"currentPassword": PASSWORD,
				"newPassword": new_password,
				"confirmPassword": new_password,
			}),
		)
		.await,
		StatusCode::OK,
	)
	.await;

	expect_json(
		login(&app, "carla@example.test", PASSWORD).await,
		StatusCode::UNAUTHORIZED,
	)
	.await;
	expect_json(
		login(&app, "carla@example.test", new_password).await,
		StatusCode::OK,
	)
	.await;
}

#[tokio::test]
async fn password_reset_never_reveals_accounts() {
	let app = TestApp::new().await;
	let known = expect_json(
		app.post(
			"/api/auth/password-reset",
			None,
			json!({"email": "carla@example.test"}),
		)
		.await,
		StatusCode::OK,
	)
	.await;
	let unknown = expect_json(
		app.post(
			"/api/auth/password-reset",
			None,
			json!({"email": "ghost@example.test"}),
		)
		.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(known["message"], unknown["message"]);
}

#[tokio::test]
async fn public_endpoints() {
	let app = TestApp::new().await;

	let body = expect_json(app.get("/api/health", None).await, StatusCode::OK).await;
	assert_eq!(body["data"]["status"], "healthy");
	assert_eq!(body["data"]["database"], "connected");

	let body = expect_json(app.get("/api/version", None).await, StatusCode::OK).await;
	assert_eq!(body["data"]["apiVersion"], "v1");

	expect_json(app.get("/api/info", None).await, StatusCode::OK).await;

	let response = app.get("/api/openapi.json", None).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = expect_json(app.get("/api/auth/me", None).await, StatusCode::UNAUTHORIZED).await;
	assert_eq!(body["success"], false);

	let body = expect_json(
		app.get_with_token("/api/auth/me", "not-a-real-token").await,
		StatusCode::UNAUTHORIZED,
	)
	.await;
	assert_eq!(body["success"], false);
}
