// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket visibility, mutation, and lifecycle tests.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{expect_json, run_authz_cases, AuthzCase, TestApp};

// ============================================================================
// Visibility
// ============================================================================

#[tokio::test]
async fn ticket_detail_follows_visibility_rules() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let ticket_a = format!("/api/tickets/{}", f.ticket_a.id);
	let pool = format!("/api/tickets/{}", f.ticket_pool.id);

	let case = |name, path: &str, user: Option<&super::support::TestUser>, status| AuthzCase {
		name,
		method: Method::GET,
		path: path.to_string(),
		user: user.cloned(),
		body: None,
		expected_status: status,
	};

	let cases = vec![
		case("admin sees any ticket", &ticket_a, Some(&f.admin), StatusCode::OK),
		case("assignee sees ticket", &ticket_a, Some(&f.support_a), StatusCode::OK),
		case(
			"other support user is denied",
			&ticket_a,
			Some(&f.support_b),
			StatusCode::FORBIDDEN,
		),
		case("creator sees ticket", &ticket_a, Some(&f.user_a), StatusCode::OK),
		case(
			"other user is denied",
			&ticket_a,
			Some(&f.user_b),
			StatusCode::FORBIDDEN,
		),
		case(
			"any support user sees unassigned ticket",
			&pool,
			Some(&f.support_b),
			StatusCode::OK,
		),
		case("anonymous is rejected", &ticket_a, None, StatusCode::UNAUTHORIZED),
		case(
			"unknown id is not found",
			&format!("/api/tickets/{}", uuid::Uuid::new_v4()),
			Some(&f.admin),
			StatusCode::NOT_FOUND,
		),
		case(
			"malformed id is not found",
			"/api/tickets/not-a-uuid",
			Some(&f.admin),
			StatusCode::NOT_FOUND,
		),
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn unknown_ticket_is_404_before_403() {
	let app = TestApp::new().await;
	let path = format!("/api/tickets/{}/delete", uuid::Uuid::new_v4());
	let response = app.delete(&path, Some(&app.fixtures.user_b)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_scoped_by_role() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = expect_json(app.get("/api/tickets", Some(&f.admin)).await, StatusCode::OK).await;
	assert_eq!(body["data"]["count"], 3);

	let body = expect_json(app.get("/api/tickets", Some(&f.user_a)).await, StatusCode::OK).await;
	assert_eq!(body["data"]["count"], 2);

	let body = expect_json(app.get("/api/tickets", Some(&f.support_b)).await, StatusCode::OK).await;
	assert_eq!(body["data"]["count"], 2);
	let ids: Vec<String> = body["data"]["results"]
		.as_array()
		.unwrap()
		.iter()
		.map(|t| t["id"].as_str().unwrap().to_string())
		.collect();
	assert!(ids.contains(&f.ticket_b.id.to_string()));
	assert!(ids.contains(&f.ticket_pool.id.to_string()));
	assert!(!ids.contains(&f.ticket_a.id.to_string()));
}

#[tokio::test]
async fn queue_listings_are_staff_only() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase {
			name: "user cannot list unassigned tickets",
			method: Method::GET,
			path: "/api/tickets/unassigned".to_string(),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user cannot list assigned tickets",
			method: Method::GET,
			path: "/api/tickets/assigned".to_string(),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user lists own tickets",
			method: Method::GET,
			path: "/api/tickets/my-tickets".to_string(),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];
	run_authz_cases(&app, &cases).await;

	let body = expect_json(
		app.get("/api/tickets/unassigned", Some(&f.support_a)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 1);

	let body = expect_json(
		app.get("/api/tickets/assigned", Some(&f.support_a)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 1);
	assert_eq!(body["data"]["results"][0]["id"], f.ticket_a.id.to_string());
}

#[tokio::test]
async fn listing_filters_validate_and_apply() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let body = expect_json(
		app.get("/api/tickets?status=bogus", Some(admin)).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["status"].is_array());

	let body = expect_json(
		app.get("/api/tickets?search=printer", Some(admin)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 1);
	assert_eq!(body["data"]["results"][0]["title"], "Printer is jammed");

	let body = expect_json(
		app.get("/api/tickets?page=1&pageSize=2", Some(admin)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["results"].as_array().unwrap().len(), 2);
	assert_eq!(body["data"]["totalPages"], 2);
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn create_rejects_short_title() {
	let app = TestApp::new().await;
	let body = expect_json(
		app.post(
			"/api/tickets",
			Some(&app.fixtures.user_a),
			json!({"title": "abcd", "description": "long enough text", "priority": "high"}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["success"], false);
	assert!(body["details"]["title"].is_array());
}

#[tokio::test]
async fn create_opens_and_auto_assigns() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let body = expect_json(
		app.post(
			"/api/tickets/create",
			Some(&f.user_a),
			json!({
				"title": "abcde",
				"description": "0123456789",
				"priority": "high",
				"categoryId": f.category.id.to_string(),
			}),
		)
		.await,
		StatusCode::CREATED,
	)
	.await;

	let ticket = &body["data"];
	assert_eq!(ticket["status"], "open");
	assert_eq!(ticket["priority"], "high");
	assert!(ticket["resolvedAt"].is_null());
	assert_eq!(ticket["creator"]["id"], f.user_a.id().to_string());
	assert_eq!(ticket["category"]["name"], "Hardware");
	let assignee = ticket["assignee"]["id"].as_str().unwrap().to_string();
	assert!(
		assignee == f.support_a.id().to_string() || assignee == f.support_b.id().to_string(),
		"assigned to a support user"
	);
}

#[tokio::test]
async fn create_without_support_pool_leaves_ticket_unassigned() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	app.state.users.set_active(&f.support_a.id(), false).await.unwrap();
	app.state.users.set_active(&f.support_b.id(), false).await.unwrap();

	let body = expect_json(
		app.post(
			"/api/tickets",
			Some(&f.user_a),
			json!({"title": "Mouse is broken", "description": "The left button stopped working"}),
		)
		.await,
		StatusCode::CREATED,
	)
	.await;
	assert!(body["data"]["assignee"].is_null());
	assert_eq!(body["data"]["priority"], "medium");
}

#[tokio::test]
async fn create_rejects_unknown_category() {
	let app = TestApp::new().await;
	let body = expect_json(
		app.post(
			"/api/tickets",
			Some(&app.fixtures.user_a),
			json!({
				"title": "Keyboard missing keys",
				"description": "Several keys fell off",
				"categoryId": uuid::Uuid::new_v4().to_string(),
			}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["categoryId"].is_array());
}

// ============================================================================
// Updates and lifecycle
// ============================================================================

#[tokio::test]
async fn resolving_requires_an_assignee() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let base = format!("/api/tickets/{}", f.ticket_pool.id);

	let body = expect_json(
		app.patch(&format!("{base}/status"), Some(&f.admin), json!({"status": "resolved"}))
			.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["status"].is_array());

	expect_json(
		app.patch(
			&format!("{base}/assign"),
			Some(&f.admin),
			json!({"assigneeId": f.support_a.id().to_string()}),
		)
		.await,
		StatusCode::OK,
	)
	.await;

	let body = expect_json(
		app.patch(&format!("{base}/status"), Some(&f.admin), json!({"status": "resolved"}))
			.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["status"], "resolved");
	assert!(body["data"]["resolvedAt"].is_string());

	let body = expect_json(
		app.patch(
			&format!("{base}/status"),
			Some(&f.admin),
			json!({"status": "in_progress"}),
		)
		.await,
		StatusCode::OK,
	)
	.await;
	assert!(body["data"]["resolvedAt"].is_null());
}

#[tokio::test]
async fn general_update_can_assign_and_resolve_together() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let body = expect_json(
		app.put(
			&format!("/api/tickets/{}/update", f.ticket_pool.id),
			Some(&f.support_b),
			json!({"assigneeId": f.support_b.id().to_string(), "status": "resolved"}),
		)
		.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["status"], "resolved");
	assert_eq!(body["data"]["assignee"]["id"], f.support_b.id().to_string());
	assert!(body["data"]["resolvedAt"].is_string());
}

#[tokio::test]
async fn closed_tickets_are_terminal() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/tickets/{}/status", f.ticket_a.id);

	expect_json(
		app.patch(&path, Some(&f.support_a), json!({"status": "closed"})).await,
		StatusCode::OK,
	)
	.await;

	for status in ["open", "in_progress", "resolved", "canceled"] {
		let body = expect_json(
			app.patch(&path, Some(&f.admin), json!({"status": status})).await,
			StatusCode::BAD_REQUEST,
		)
		.await;
		assert!(body["details"]["status"].is_array(), "{status}");
	}
}

#[tokio::test]
async fn status_endpoint_requires_status() {
	let app = TestApp::new().await;
	let body = expect_json(
		app.patch(
			&format!("/api/tickets/{}/status", app.fixtures.ticket_a.id),
			Some(&app.fixtures.support_a),
			json!({}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["details"]["status"][0], "This field is required");
}

#[tokio::test]
async fn update_permissions() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let ticket_a = format!("/api/tickets/{}", f.ticket_a.id);
	let pool = format!("/api/tickets/{}", f.ticket_pool.id);

	let cases = vec![
		AuthzCase {
			name: "creator edits open ticket",
			method: Method::PATCH,
			path: format!("{ticket_a}/update"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"title": "Laptop still will not boot"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "creator cannot change status",
			method: Method::PATCH,
			path: format!("{ticket_a}/update"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"status": "canceled"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "creator cannot change assignee",
			method: Method::PATCH,
			path: format!("{ticket_a}/update"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"assigneeId": null})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other user cannot edit",
			method: Method::PATCH,
			path: format!("{ticket_a}/update"),
			user: Some(f.user_b.clone()),
			body: Some(json!({"title": "Hijacked title"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other support user cannot edit",
			method: Method::PATCH,
			path: format!("{ticket_a}/update"),
			user: Some(f.support_b.clone()),
			body: Some(json!({"priority": "low"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "support edits unassigned ticket",
			method: Method::PATCH,
			path: format!("{pool}/update"),
			user: Some(f.support_b.clone()),
			body: Some(json!({"priority": "urgent"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "support cannot set status of unassigned ticket",
			method: Method::PATCH,
			path: format!("{pool}/status"),
			user: Some(f.support_b.clone()),
			body: Some(json!({"status": "in_progress"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user cannot use status endpoint",
			method: Method::PATCH,
			path: format!("{ticket_a}/status"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"status": "canceled"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "assignee sets status",
			method: Method::PATCH,
			path: format!("{ticket_a}/status"),
			user: Some(f.support_a.clone()),
			body: Some(json!({"status": "in_progress"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "creator cannot edit once in progress",
			method: Method::PATCH,
			path: format!("{ticket_a}/update"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"title": "Another new title"})),
			expected_status: StatusCode::FORBIDDEN,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn assignment_validation() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/tickets/{}/assign", f.ticket_pool.id);

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({})).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["details"]["assigneeId"][0], "This field is required");

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({"assigneeId": f.user_b.id().to_string()}))
			.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["assigneeId"].is_array());

	let body = expect_json(
		app.patch(
			&path,
			Some(&f.admin),
			json!({"assigneeId": uuid::Uuid::new_v4().to_string()}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["details"]["assigneeId"][0], "User does not exist");

	expect_json(
		app.patch(&path, Some(&f.user_a), json!({"assigneeId": f.support_a.id().to_string()}))
			.await,
		StatusCode::FORBIDDEN,
	)
	.await;

	let body = expect_json(
		app.patch(&path, Some(&f.support_a), json!({"assigneeId": f.support_a.id().to_string()}))
			.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["assignee"]["id"], f.support_a.id().to_string());

	let body = expect_json(
		app.patch(&path, Some(&f.admin), json!({"assigneeId": null})).await,
		StatusCode::OK,
	)
	.await;
	assert!(body["data"]["assignee"].is_null());
}

#[tokio::test]
async fn only_admin_deletes_tickets() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/tickets/{}", f.ticket_a.id);

	for user in [&f.user_a, &f.support_a] {
		expect_json(
			app.delete(&format!("{path}/delete"), Some(user)).await,
			StatusCode::FORBIDDEN,
		)
		.await;
	}
	expect_json(app.delete(&path, Some(&f.admin)).await, StatusCode::OK).await;
	expect_json(app.get(&path, Some(&f.admin)).await, StatusCode::NOT_FOUND).await;
}
