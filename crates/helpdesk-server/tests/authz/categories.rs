// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{expect_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn everyone_reads_only_admins_write() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let category = format!("/api/categories/{}", f.category.id);

	let cases = vec![
		AuthzCase {
			name: "user lists categories",
			method: Method::GET,
			path: "/api/categories".to_string(),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "user reads a category",
			method: Method::GET,
			path: category.clone(),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "user cannot create",
			method: Method::POST,
			path: "/api/categories".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({"name": "Software"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "support cannot create",
			method: Method::POST,
			path: "/api/categories/create".to_string(),
			user: Some(f.support_a.clone()),
			body: Some(json!({"name": "Software"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "support cannot rename",
			method: Method::PATCH,
			path: format!("{category}/update"),
			user: Some(f.support_a.clone()),
			body: Some(json!({"name": "Hardware and more"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user cannot delete",
			method: Method::DELETE,
			path: format!("{category}/delete"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unknown category",
			method: Method::GET,
			path: format!("/api/categories/{}", uuid::Uuid::new_v4()),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "anonymous cannot list",
			method: Method::GET,
			path: "/api/categories".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn names_are_validated_and_unique() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let body = expect_json(
		app.post(
			"/api/categories",
			Some(admin),
			json!({"name": "  Software  ", "description": "   "}),
		)
		.await,
		StatusCode::CREATED,
	)
	.await;
	assert_eq!(body["data"]["name"], "Software");
	assert!(body["data"]["description"].is_null());
	assert_eq!(body["data"]["ticketCount"], 0);

	let body = expect_json(
		app.post("/api/categories", Some(admin), json!({"name": "hardware"}))
			.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(
		body["details"]["name"][0],
		"A category with this name already exists"
	);

	let body = expect_json(
		app.post("/api/categories", Some(admin), json!({"name": "X"})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["name"].is_array());

	let body = expect_json(
		app.patch(
			&format!("/api/categories/{}/update", app.fixtures.category.id),
			Some(admin),
			json!({"name": "SOFTWARE"}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["name"].is_array());
}

#[tokio::test]
async fn list_search_and_update() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	expect_json(
		app.post("/api/categories", Some(admin), json!({"name": "Network"}))
			.await,
		StatusCode::CREATED,
	)
	.await;

	let body = expect_json(
		app.get("/api/categories", Some(&app.fixtures.user_a)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 2);
	assert_eq!(body["data"]["categories"][0]["name"], "Hardware");

	let body = expect_json(
		app.get("/api/categories?search=net", Some(&app.fixtures.user_a))
			.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 1);
	assert_eq!(body["data"]["categories"][0]["name"], "Network");

	let path = format!("/api/categories/{}/update", app.fixtures.category.id);
	let body = expect_json(
		app.put(&path, Some(admin), json!({"description": null})).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["name"], "Hardware");
	assert!(body["data"]["description"].is_null());
}

#[tokio::test]
async fn categories_in_use_cannot_be_deleted() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let delete_path = format!("/api/categories/{}/delete", f.category.id);

	expect_json(
		app.patch(
			&format!("/api/tickets/{}/update", f.ticket_a.id),
			Some(&f.admin),
			json!({"categoryId": f.category.id.to_string()}),
		)
		.await,
		StatusCode::OK,
	)
	.await;

	let body = expect_json(
		app.delete(&delete_path, Some(&f.admin)).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["details"]["ticketCount"], 1);

	expect_json(
		app.delete(&format!("/api/tickets/{}", f.ticket_a.id), Some(&f.admin))
			.await,
		StatusCode::OK,
	)
	.await;
	expect_json(app.delete(&delete_path, Some(&f.admin)).await, StatusCode::OK).await;
	expect_json(
		app.get(&format!("/api/categories/{}", f.category.id), Some(&f.admin))
			.await,
		StatusCode::NOT_FOUND,
	)
	.await;
}
