// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{header, StatusCode};
use helpdesk_server_auth::{AttachmentId, TicketId};

use super::support::{expect_json, TestApp};

fn attachment_id(body: &serde_json::Value) -> AttachmentId {
	AttachmentId::new(body["data"]["id"].as_str().unwrap().parse().unwrap())
}

#[tokio::test]
async fn upload_and_download_roundtrip() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let base = format!("/api/tickets/{}/attachments", f.ticket_a.id);

	let body = expect_json(
		app.upload(&base, Some(&f.user_a), "boot log.txt", b"kernel panic", None)
			.await,
		StatusCode::CREATED,
	)
	.await;
	let data = &body["data"];
	assert_eq!(data["originalFilename"], "boot log.txt");
	assert_eq!(data["mimeType"], "text/plain");
	assert_eq!(data["fileSize"], 12);
	assert_eq!(data["isPrivate"], false);
	let id = attachment_id(&body);
	assert_eq!(
		data["fileUrl"],
		format!("http://helpdesk.test{base}/{id}/download")
	);

	let response = app.get(&format!("{base}/{id}/download"), Some(&f.support_a)).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
	assert!(response.headers()[header::CONTENT_DISPOSITION]
		.to_str()
		.unwrap()
		.contains("boot log.txt"));
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	assert_eq!(&bytes[..], b"kernel panic");

	let response = app.get(&format!("{base}/{id}/download"), Some(&f.user_b)).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_validation() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let base = format!("/api/tickets/{}/attachments/upload", f.ticket_a.id);

	let body = expect_json(
		app.upload(&base, Some(&f.user_a), "setup.exe", b"MZ", None).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["file"].is_array());

	let body = expect_json(
		app.upload_without_file(&base, Some(&f.user_a)).await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert_eq!(body["details"]["file"][0], "This field is required");

	let body = expect_json(
		app.upload(&base, Some(&f.user_a), "notes.txt", b"secret", Some("true"))
			.await,
		StatusCode::BAD_REQUEST,
	)
	.await;
	assert!(body["details"]["isPrivate"].is_array());

	expect_json(
		app.upload(&base, Some(&f.user_b), "notes.txt", b"hello", None).await,
		StatusCode::FORBIDDEN,
	)
	.await;
}

#[tokio::test]
async fn private_attachments_are_hidden_from_users() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let base = format!("/api/tickets/{}/attachments", f.ticket_a.id);

	expect_json(
		app.upload(&base, Some(&f.user_a), "photo.png", b"\x89PNG", None).await,
		StatusCode::CREATED,
	)
	.await;
	let private = expect_json(
		app.upload(&base, Some(&f.support_a), "diagnostics.txt", b"smart: failing", Some("on"))
			.await,
		StatusCode::CREATED,
	)
	.await;
	assert_eq!(private["data"]["isPrivate"], true);
	let private_id = attachment_id(&private);

	let list = expect_json(app.get(&base, Some(&f.user_a)).await, StatusCode::OK).await;
	assert_eq!(list["data"]["count"], 1);
	assert_eq!(list["data"]["attachments"][0]["originalFilename"], "photo.png");

	let list = expect_json(app.get(&base, Some(&f.support_a)).await, StatusCode::OK).await;
	assert_eq!(list["data"]["count"], 2);

	expect_json(
		app.get(&format!("{base}/{private_id}"), Some(&f.user_a)).await,
		StatusCode::FORBIDDEN,
	)
	.await;
	expect_json(
		app.get(&format!("{base}/{private_id}/download"), Some(&f.user_a)).await,
		StatusCode::FORBIDDEN,
	)
	.await;
}

#[tokio::test]
async fn uploader_deletes_and_file_is_removed() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let base = format!("/api/tickets/{}/attachments", f.ticket_a.id);

	let body = expect_json(
		app.upload(&base, Some(&f.user_a), "report.pdf", b"%PDF-1.4", None).await,
		StatusCode::CREATED,
	)
	.await;
	let id = attachment_id(&body);
	let stored_path = app
		.state
		.attachments
		.get_attachment(&f.ticket_a.id, &id)
		.await
		.unwrap()
		.unwrap()
		.attachment
		.stored_path;
	assert!(app.state.storage.read(&stored_path).await.is_ok());

	expect_json(
		app.delete(&format!("{base}/{id}/delete"), Some(&f.support_a)).await,
		StatusCode::FORBIDDEN,
	)
	.await;
	expect_json(
		app.delete(&format!("{base}/{id}/delete"), Some(&f.user_a)).await,
		StatusCode::OK,
	)
	.await;

	assert!(app.state.storage.read(&stored_path).await.is_err());
	expect_json(
		app.get(&format!("{base}/{id}"), Some(&f.user_a)).await,
		StatusCode::NOT_FOUND,
	)
	.await;
}

#[tokio::test]
async fn deleting_ticket_removes_its_files() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let ticket_id: TicketId = f.ticket_a.id;
	let base = format!("/api/tickets/{ticket_id}/attachments");

	let body = expect_json(
		app.upload(&base, Some(&f.user_a), "scan.jpg", b"\xff\xd8\xff", None).await,
		StatusCode::CREATED,
	)
	.await;
	let id = attachment_id(&body);
	let stored_path = app
		.state
		.attachments
		.get_attachment(&ticket_id, &id)
		.await
		.unwrap()
		.unwrap()
		.attachment
		.stored_path;

	expect_json(
		app.delete(&format!("/api/tickets/{ticket_id}/delete"), Some(&f.admin)).await,
		StatusCode::OK,
	)
	.await;
	assert!(app.state.storage.read(&stored_path).await.is_err());
}
