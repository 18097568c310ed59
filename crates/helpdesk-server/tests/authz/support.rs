// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use chrono::Duration;
use helpdesk_server::{
	api::{create_app_state_with, create_router, AppState},
	AssigneePicker, LocalAttachmentStorage, ServerConfig,
};
use helpdesk_server_auth::{
	hash_password, AuthToken, Role, TicketPriority, TokenKind, User, UserId,
};
use helpdesk_server_db::{Category, Ticket};
use serde::Serialize;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "Passw0rd!x";
const BOUNDARY: &str = "helpdesk-test-boundary";

/// Always takes the first support user so assignment is predictable.
pub struct FirstPicker;

impl AssigneePicker for FirstPicker {
	fn pick<'a>(&self, pool: &'a [User]) -> Option<&'a User> {
		pool.first()
	}
}

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub access_token: String,
}

impl TestUser {
	pub fn id(&self) -> UserId {
		self.user.id
	}

	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		(
			HeaderName::from_static("authorization"),
			HeaderValue::from_str(&format!("Bearer {}", self.access_token)).unwrap(),
		)
	}
}

#[derive(Clone)]
pub struct Fixtures {
	pub admin: TestUser,
	pub support_a: TestUser,
	pub support_b: TestUser,
	pub user_a: TestUser,
	pub user_b: TestUser,
	pub category: Category,
	/// Created by `user_a`, assigned to `support_a`.
	pub ticket_a: Ticket,
	/// Created by `user_b`, assigned to `support_b`.
	pub ticket_b: Ticket,
	/// Created by `user_a`, unassigned.
	pub ticket_pool: Ticket,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	pub temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_helpdesk.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = helpdesk_server_db::create_pool(&db_url, 5).await.unwrap();
		helpdesk_server_db::run_migrations(&pool).await.unwrap();

		let mut config = ServerConfig::default();
		config.storage.attachments_dir = temp_dir.path().join("attachments");
		config.http.base_url = "http://helpdesk.test".to_string();

		let state = create_app_state_with(
			pool,
			&config,
			Arc::new(FirstPicker),
			Arc::new(LocalAttachmentStorage::new(&config.storage.attachments_dir)),
		);
		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn put(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PUT, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	/// GET with a raw bearer token.
	pub async fn get_with_token(&self, path: &str, token: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.header("authorization", format!("Bearer {token}"))
			.body(Body::empty())
			.unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Multipart upload with a `file` part and an optional `isPrivate` part.
	pub async fn upload(
		&self,
		path: &str,
		user: Option<&TestUser>,
		filename: &str,
		contents: &[u8],
		is_private: Option<&str>,
	) -> Response<Body> {
		let mut body = Vec::new();
		body.extend_from_slice(
			format!(
				"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
			)
			.as_bytes(),
		);
		body.extend_from_slice(contents);
		body.extend_from_slice(b"\r\n");
		if let Some(flag) = is_private {
			body.extend_from_slice(
				format!(
					"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"isPrivate\"\r\n\r\n{flag}\r\n"
				)
				.as_bytes(),
			);
		}
		body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
		self.send_multipart(path, user, body).await
	}

	/// Multipart body with only an `isPrivate` part.
	pub async fn upload_without_file(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		let body = format!(
			"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"isPrivate\"\r\n\r\nfalse\r\n--{BOUNDARY}--\r\n"
		)
		.into_bytes();
		self.send_multipart(path, user, body).await
	}

	async fn send_multipart(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: Vec<u8>,
	) -> Response<Body> {
		let mut builder = Request::builder()
			.method(Method::POST)
			.uri(path)
			.header(
				"content-type",
				format!("multipart/form-data; boundary={BOUNDARY}"),
			);
		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}
		let request = builder.body(Body::from(body)).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// Asserts the status and returns the envelope.
pub async fn expect_json(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
	let status = response.status();
	let body = body_json(response).await;
	assert_eq!(status, expected, "unexpected status, body: {body}");
	body
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PUT => {
				app.put(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

pub async fn create_test_user(
	state: &AppState,
	email: &str,
	first_name: &str,
	last_name: &str,
	role: Role,
) -> TestUser {
	let user = User::new(email, first_name, last_name, role);
	let password_hash = hash_password(PASSWORD).unwrap();
	state.users.create_user(&user, &password_hash).await.unwrap();

	let (token, access_token) = AuthToken::issue(user.id, TokenKind::Access, Duration::hours(1));
	state.tokens.create_token(&token).await.unwrap();

	TestUser { user, access_token }
}

pub async fn create_test_ticket(
	state: &AppState,
	creator: &TestUser,
	title: &str,
	assignee: Option<&TestUser>,
) -> Ticket {
	let mut ticket = Ticket::new(
		creator.id(),
		title,
		"Something is broken and needs fixing",
		TicketPriority::Medium,
		None,
	);
	state.tickets.create_ticket(&ticket).await.unwrap();
	if let Some(assignee) = assignee {
		state
			.tickets
			.set_assignee(&ticket.id, Some(assignee.id()))
			.await
			.unwrap();
		ticket.assignee_id = Some(assignee.id());
	}
	ticket
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let admin = create_test_user(state, "admin@helpdesk.test", "Ada", "Admin", Role::SysAdmin).await;
	let support_a =
		create_test_user(state, "anna@helpdesk.test", "Anna", "Agent", Role::Support).await;
	let support_b =
		create_test_user(state, "boris@helpdesk.test", "Boris", "Agent", Role::Support).await;
	let user_a = create_test_user(state, "carla@example.test", "Carla", "Customer", Role::User).await;
	let user_b = create_test_user(state, "dmitri@example.test", "Dmitri", "Customer", Role::User).await;

	let category = Category::new("Hardware", Some("Laptops and peripherals".to_string()));
	state.categories.create_category(&category).await.unwrap();

	let ticket_a = create_test_ticket(state, &user_a, "Laptop will not boot", Some(&support_a)).await;
	let ticket_b = create_test_ticket(state, &user_b, "Printer is jammed", Some(&support_b)).await;
	let ticket_pool = create_test_ticket(state, &user_a, "VPN keeps dropping", None).await;

	Fixtures {
		admin,
		support_a,
		support_b,
		user_a,
		user_b,
		category,
		ticket_a,
		ticket_b,
		ticket_pool,
	}
}
