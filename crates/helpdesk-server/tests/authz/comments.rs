// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{expect_json, run_authz_cases, AuthzCase, TestApp, TestUser};

async fn post_comment(
	app: &TestApp,
	ticket: &str,
	user: &TestUser,
	text: &str,
	is_private: bool,
) -> serde_json::Value {
	let body = expect_json(
		app.post(
			&format!("/api/tickets/{ticket}/comments"),
			Some(user),
			json!({"text": text, "isPrivate": is_private}),
		)
		.await,
		StatusCode::CREATED,
	)
	.await;
	body["data"].clone()
}

#[tokio::test]
async fn only_staff_write_private_comments() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let ticket = f.ticket_a.id.to_string();

	let body = expect_json(
		app.post(
			&format!("/api/tickets/{ticket}/comments/create"),
			Some(&f.user_a),
			json!({"text": "Just between us", "isPrivate": true}),
		)
		.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["isPrivate"].is_array());

	let public = post_comment(&app, &ticket, &f.user_a, "Still broken today", false).await;
	assert_eq!(public["author"]["id"], f.user_a.id().to_string());
	assert_eq!(public["isPrivate"], false);

	let private = post_comment(&app, &ticket, &f.support_a, "Suspect the disk", true).await;
	assert_eq!(private["isPrivate"], true);

	let list = expect_json(
		app.get(&format!("/api/tickets/{ticket}/comments"), Some(&f.user_a)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(list["data"]["count"], 1);
	assert_eq!(list["data"]["comments"][0]["text"], "Still broken today");

	let list = expect_json(
		app.get(&format!("/api/tickets/{ticket}/comments"), Some(&f.support_a)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(list["data"]["count"], 2);
	assert_eq!(list["data"]["comments"][0]["text"], "Still broken today");

	let private_path = format!(
		"/api/tickets/{ticket}/comments/{}",
		private["id"].as_str().unwrap()
	);
	expect_json(app.get(&private_path, Some(&f.user_a)).await, StatusCode::FORBIDDEN).await;
	expect_json(app.get(&private_path, Some(&f.admin)).await, StatusCode::OK).await;
}

#[tokio::test]
async fn comment_access_follows_ticket_access() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let ticket_a = f.ticket_a.id;

	let cases = vec![
		AuthzCase {
			name: "other user cannot list comments",
			method: Method::GET,
			path: format!("/api/tickets/{ticket_a}/comments"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other support user cannot comment",
			method: Method::POST,
			path: format!("/api/tickets/{ticket_a}/comments"),
			user: Some(f.support_b.clone()),
			body: Some(json!({"text": "Drive-by remark"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "assignee comments",
			method: Method::POST,
			path: format!("/api/tickets/{ticket_a}/comments"),
			user: Some(f.support_a.clone()),
			body: Some(json!({"text": "Looking into it"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "admin comments anywhere",
			method: Method::POST,
			path: format!("/api/tickets/{ticket_a}/comments"),
			user: Some(f.admin.clone()),
			body: Some(json!({"text": "Escalated"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "comments on a missing ticket",
			method: Method::GET,
			path: format!("/api/tickets/{}/comments", uuid::Uuid::new_v4()),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn authors_edit_and_admins_delete() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let ticket = f.ticket_a.id.to_string();
	let comment = post_comment(&app, &ticket, &f.user_a, "First draft", false).await;
	let path = format!(
		"/api/tickets/{ticket}/comments/{}",
		comment["id"].as_str().unwrap()
	);

	expect_json(
		app.put(&format!("{path}/update"), Some(&f.support_a), json!({"text": "Rewritten"}))
			.await,
		StatusCode::FORBIDDEN,
	)
	.await;

	let body = expect_json(
		app.patch(&format!("{path}/update"), Some(&f.user_a), json!({"text": ""}))
			.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["text"].is_array());

	let body = expect_json(
		app.patch(&format!("{path}/update"), Some(&f.user_a), json!({"text": "Final wording"}))
			.await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["text"], "Final wording");

	expect_json(
		app.delete(&format!("{path}/delete"), Some(&f.support_a)).await,
		StatusCode::FORBIDDEN,
	)
	.await;
	expect_json(
		app.delete(&format!("{path}/delete"), Some(&f.admin)).await,
		StatusCode::OK,
	)
	.await;
	expect_json(app.get(&path, Some(&f.admin)).await, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn comment_counts_appear_on_ticket() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let ticket = f.ticket_a.id.to_string();
	post_comment(&app, &ticket, &f.user_a, "One", false).await;
	post_comment(&app, &ticket, &f.support_a, "Two", true).await;

	let body = expect_json(
		app.get(&format!("/api/tickets/{ticket}"), Some(&f.admin)).await,
		StatusCode::OK,
	)
	.await;
	assert_eq!(body["data"]["commentsCount"], 2);
}
