// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{expect_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn metrics_are_staff_only() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let get = |name, path: &str, user: &super::support::TestUser, status| AuthzCase {
		name,
		method: Method::GET,
		path: path.to_string(),
		user: Some(user.clone()),
		body: None,
		expected_status: status,
	};

	let cases = vec![
		get(
			"user cannot see overview",
			"/api/metrics/tickets/overview",
			&f.user_a,
			StatusCode::FORBIDDEN,
		),
		get(
			"support sees overview",
			"/api/metrics/tickets/overview",
			&f.support_a,
			StatusCode::OK,
		),
		get(
			"user cannot see performance",
			"/api/metrics/tickets/performance",
			&f.user_b,
			StatusCode::FORBIDDEN,
		),
		get(
			"support sees performance",
			"/api/metrics/tickets/performance",
			&f.support_b,
			StatusCode::OK,
		),
		get(
			"support cannot see user activity",
			"/api/metrics/users/activity",
			&f.support_a,
			StatusCode::FORBIDDEN,
		),
		get(
			"admin sees user activity",
			"/api/metrics/users/activity",
			&f.admin,
			StatusCode::OK,
		),
		get(
			"user cannot see system health",
			"/api/metrics/system/health",
			&f.user_a,
			StatusCode::FORBIDDEN,
		),
		get(
			"support sees system health",
			"/api/metrics/system/health",
			&f.support_a,
			StatusCode::OK,
		),
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn overview_counts_every_ticket() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	expect_json(
		app.patch(
			&format!("/api/tickets/{}/status", f.ticket_a.id),
			Some(&f.support_a),
			json!({"status": "resolved"}),
		)
		.await,
		StatusCode::OK,
	)
	.await;

	let body = expect_json(
		app.get("/api/metrics/tickets/overview", Some(&f.support_b)).await,
		StatusCode::OK,
	)
	.await;
	let status = &body["data"]["statusMetrics"];
	assert_eq!(status["total"], 3);
	assert_eq!(status["open"], 2);
	assert_eq!(status["resolved"], 1);
	assert_eq!(status["unassigned"], 1);
	assert_eq!(body["data"]["priorityMetrics"]["medium"], 3);

	let body = expect_json(
		app.get("/api/metrics/tickets/performance", Some(&f.admin)).await,
		StatusCode::OK,
	)
	.await;
	let perf = &body["data"];
	assert_eq!(perf["totalResolved"], 1);
	assert_eq!(perf["totalCreatedToday"], 3);
	assert_eq!(perf["resolutionRate"], 33.33);
}

#[tokio::test]
async fn activity_and_health() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = expect_json(
		app.get("/api/metrics/users/activity", Some(&f.admin)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["count"], 5);
	let carla = body["data"]["users"]
		.as_array()
		.unwrap()
		.iter()
		.find(|u| u["email"] == "carla@example.test")
		.cloned()
		.unwrap();
	assert_eq!(carla["ticketsCreated"], 2);
	let anna = body["data"]["users"]
		.as_array()
		.unwrap()
		.iter()
		.find(|u| u["email"] == "anna@helpdesk.test")
		.cloned()
		.unwrap();
	assert_eq!(anna["ticketsAssigned"], 1);

	let body = expect_json(
		app.get("/api/metrics/system/health", Some(&f.admin)).await,
		StatusCode::OK,
	)
	.await;
	let health = &body["data"];
	assert_eq!(health["status"], "healthy");
	assert_eq!(health["totalUsers"], 5);
	assert_eq!(health["totalTickets"], 3);
	assert_eq!(health["unassignedTickets"], 1);
	assert_eq!(health["urgentTickets"], 0);
}
