// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::support::{expect_json, run_authz_cases, AuthzCase, TestApp, PASSWORD};

#[tokio::test]
async fn admins_cannot_manage_themselves() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let base = format!("/api/users/{}", admin.id());

	let cases = vec![
		AuthzCase {
			name: "own role, empty body",
			method: Method::PATCH,
			path: format!("{base}/role"),
			user: Some(admin.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "own role",
			method: Method::PUT,
			path: format!("{base}/role"),
			user: Some(admin.clone()),
			body: Some(json!({"role": "user"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "own role, mistyped body",
			method: Method::PATCH,
			path: format!("{base}/role"),
			user: Some(admin.clone()),
			body: Some(json!({"role": 5})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "own activation, mistyped body",
			method: Method::PATCH,
			path: format!("{base}/activation"),
			user: Some(admin.clone()),
			body: Some(json!({"isActive": "yes"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "own activation, empty body",
			method: Method::PATCH,
			path: format!("{base}/activation"),
			user: Some(admin.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "own deletion",
			method: Method::DELETE,
			path: format!("{base}/delete"),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];
	run_authz_cases(&app, &cases).await;

	for path in [format!("{base}/role"), format!("{base}/activation")] {
		let response = app
			.router
			.clone()
			.oneshot(
				axum::http::Request::builder()
					.method("PATCH")
					.uri(path.as_str())
					.header("authorization", format!("Bearer {}", admin.access_token))
					.header("content-type", "application/json")
					.body(axum::body::Body::from("{not json"))
					.unwrap(),
			)
			.await
			.unwrap();
		expect_json(response, StatusCode::FORBIDDEN).await;
	}

	let body = expect_json(app.get("/api/auth/me", Some(admin)).await, StatusCode::OK).await;
	assert_eq!(body["data"]["role"], "sysAdmin");
	assert_eq!(body["data"]["isActive"], true);
}

#[tokio::test]
async fn user_management_is_admin_only() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let target = format!("/api/users/{}", f.user_b.id());

	let cases = vec![
		AuthzCase {
			name: "user cannot list users",
			method: Method::GET,
			path: "/api/users".to_string(),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "support cannot list users",
			method: Method::GET,
			path: "/api/users".to_string(),
			user: Some(f.support_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user cannot read another user",
			method: Method::GET,
			path: target.clone(),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user reads self",
			method: Method::GET,
			path: format!("/api/users/{}", f.user_a.id()),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "support cannot change roles",
			method: Method::PATCH,
			path: format!("{target}/role"),
			user: Some(f.support_a.clone()),
			body: Some(json!({"role": "support"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user cannot create users",
			method: Method::POST,
			path: "/api/users".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"firstName": "Eve",
				"lastName": "Intruder",
				"email": "eve@example.test",
				"password": PASSWORD,
				"role": "sysAdmin",
			})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin lists users",
			method: Method::GET,
			path: "/api/users".to_string(),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unknown user",
			method: Method::GET,
			path: format!("/api/users/{}", uuid::Uuid::new_v4()),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn admin_listing_filters() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let body = expect_json(app.get("/api/users", Some(admin)).await, StatusCode::OK).await;
	assert_eq!(body["data"]["count"], 5);

	let body = expect_json(
		app.get("/api/users?role=support", Some(admin)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 2);

	let body = expect_json(
		app.get("/api/users?search=dmitri", Some(admin)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 1);

	let body = expect_json(
		app.get("/api/users?role=manager", Some(admin)).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["role"].is_array());
}

#[tokio::test]
async fn role_changes() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/users/{}/role", f.user_b.id());

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["details"]["role"][0], "This field is required");

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({"role": 5})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["body"].is_array());

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({"role": "root"})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["role"].is_array());

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({"role": "support"})).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["role"], "support");

	let body = expect_json(
		app.get("/api/users/support", Some(&f.user_a)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 3);
}

#[tokio::test]
async fn demoting_support_unassigns_their_tickets() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	expect_json(
		app.patch(
			&format!("/api/users/{}/role", f.support_a.id()),
			Some(&f.admin),
			json!({"role": "user"}),
		)
		.await,
		StatusCode::OK,
	)
	.await;

	let body = expect_json(
		app.get(&format!("/api/tickets/{}", f.ticket_a.id), Some(&f.admin))
			.await,
		StatusCode::OK,
	)
	.await;
	assert!(body["data"]["assignee"].is_null());

	let body = expect_json(
		app.get(&format!("/api/tickets/{}", f.ticket_b.id), Some(&f.admin))
			.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["assignee"]["id"], f.support_b.id().to_string());
}

#[tokio::test]
async fn deactivation_revokes_access() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/users/{}/activation", f.user_b.id());

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["isActive"].is_array());

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({"isActive": false})).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["isActive"], false);

	let response = app.get("/api/auth/me", Some(&f.user_b)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let body = expect_json(
		app.post(
			"/api/auth/login",
			None,
			json!({"email": "dmitri@example.test", "password": PASSWORD}),
		)
		.await,
		StatusCode::UNAUTHORIZED,
	)
	.await;
	assert_eq!(body["error"], "This account has been deactivated");

	expect_json(
		app.patch(&path, Some(&f.admin), json!({"isActive": true})).await,
		StatusCode::OK,
	)
	.await;
	expect_json(
		app.post(
			"/api/auth/login",
			None,
			json!({"email": "dmitri@example.test", "password": PASSWORD}),
		)
		.await,
		StatusCode::OK,
	)
	.await;
}

#[tokio::test]
async fn profile_updates() {
	let app = TestApp::new().await;
	let user = &app.fixtures.user_a;

	let body = expect_json(app.get("/api/users/profile", Some(user)).await, StatusCode::OK).await;
	assert_eq!(body["data"]["email"], "carla@example.test");
	assert_eq!(body["data"]["fullName"], "Carla Customer");

	let body = expect_json(
		app.patch("/api/users/profile/update", Some(user), json!({"firstName": "   "}))
			.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["firstName"].is_array());

	let body = expect_json(
		app.put("/api/users/profile/update", Some(user), json!({"lastName": "Consumer"}))
			.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["firstName"], "Carla");
	assert_eq!(body["data"]["lastName"], "Consumer");
	assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn support_directory() {
	let app = TestApp::new().await;
	let body = expect_json(
		app.get("/api/users/support", Some(&app.fixtures.user_a)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 2);
	assert_eq!(body["data"]["users"][0]["fullName"], "Anna Agent");
}

#[tokio::test]
async fn admin_provisions_accounts() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let account = json!({
		"firstName": "Fiona",
		"lastName": "Fixit",
		"email": "Fiona@Helpdesk.Test",
		"password": PASSWORD,
		"role": "support",
	});

	let body = expect_json(
		app.post("/api/users", Some(admin), account.clone()).await,
		StatusCode::CREATED,
	)
	.await;
	assert_eq!(body["data"]["role"], "support");
	assert_eq!(body["data"]["email"], "fiona@helpdesk.test");

	let body = expect_json(
		app.post("/api/users", Some(admin), account).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["email"].is_array());

	let body = expect_json(
		app.post(
			"/api/users",
			Some(admin),
			json!({"firstName": "G", "lastName": "", "email": "nope", "password": "short"}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	for field in ["lastName", "email", "password"] {
		assert!(body["details"][field].is_array(), "{field}");
	}
}

#[tokio::test]
async fn deleting_a_user_removes_their_tickets() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	expect_json(
		app.delete(&format!("/api/users/{}/delete", f.user_b.id()), Some(&f.admin))
			.await,
		StatusCode::OK,
	)
	.await;
	expect_json(
		app.get(&format!("/api/tickets/{}", f.ticket_b.id), Some(&f.admin))
			.await,
		StatusCode::NOT_FOUND,
	)
	.await;

	let response = app.get("/api/auth/me", Some(&f.user_b)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleting_an_assignee_unassigns_tickets() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	expect_json(
		app.delete(&format!("/api/users/{}/delete", f.support_a.id()), Some(&f.admin))
			.await,
		StatusCode::OK,
	)
	.await;
	let body = expect_json(
		app.get(&format!("/api/tickets/{}", f.ticket_a.id), Some(&f.admin))
			.await,
		StatusCode::OK,
	)
	.await;
	assert!(body["data"]["assignee"].is_null());
}
