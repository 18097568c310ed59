// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpdesk server binary.

use anyhow::Context;
use clap::{Parser, Subcommand};
use helpdesk_server::accounts::{create_account, ensure_bootstrap_admin, NewAccount};
use helpdesk_server::validation::FieldErrors;
use helpdesk_server::{create_app_state, create_router, version, ServerError};
use helpdesk_server_auth::Role;
use helpdesk_server_config::{LogFormat, ServerConfig};
use helpdesk_server_db::UserRepository;
use sqlx::SqlitePool;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Helpdesk server - HTTP API for support tickets.
#[derive(Parser, Debug)]
#[command(name = "helpdesk-server", about = "Helpdesk ticketing server", version)]
struct Args {
	/// Runs the server when omitted.
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Start the HTTP server
	Serve,
	/// Show version and build information
	Version,
	/// Create a system administrator account
	CreateAdmin {
		#[arg(long)]
		email: String,
		#[arg(long, env = "HELPDESK_ADMIN_PASSWORD", hide_env_values = true)]
		password: String,
		#[arg(long, default_value = "System")]
		first_name: String,
		#[arg(long, default_value = "Administrator")]
		last_name: String,
	},
	/// Assign every unassigned open or in-progress ticket to a support user
	AssignBacklog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();
	let config = helpdesk_server_config::load_config().context("loading configuration")?;
	init_tracing(&config);

	let pool = helpdesk_server_db::create_pool(&config.database.url, config.database.max_connections)
		.await
		.context("opening database")?;
	helpdesk_server_db::run_migrations(&pool)
		.await
		.context("running migrations")?;

	match args.command {
		None | Some(Command::Serve) => serve(pool, config).await,
		Some(Command::CreateAdmin {
			email,
			password,
			first_name,
			last_name,
		}) => {
			let users = UserRepository::new(pool);
			let account = NewAccount {
				first_name: &first_name,
				last_name: &last_name,
				email: &email,
				password: &password,
				role: Role::SysAdmin,
			};
			match create_account(&users, account, FieldErrors::new()).await {
				Ok(user) => {
					println!("created administrator {} ({})", user.email, user.id);
					Ok(())
				}
				Err(ServerError::Validation(fields)) => {
					anyhow::bail!("invalid administrator account: {}", fields.to_json())
				}
				Err(e) => Err(e.into()),
			}
		}
		Some(Command::AssignBacklog) => {
			let state = create_app_state(pool, &config);
			let assigned = state.lifecycle.assign_backlog().await?;
			println!("assigned {assigned} ticket(s)");
			Ok(())
		}
		Some(Command::Version) => Ok(()),
	}
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let json = config.logging.format == LogFormat::Json;

	tracing_subscriber::registry()
		.with(filter)
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json).then(|| tracing_subscriber::fmt::layer()))
		.init();
}

async fn serve(pool: SqlitePool, config: ServerConfig) -> anyhow::Result<()> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		environment = %config.auth.environment,
		dev_mode = config.auth.dev_mode,
		"starting helpdesk-server"
	);

	if let Some(bootstrap) = &config.bootstrap_admin {
		let users = UserRepository::new(pool.clone());
		match ensure_bootstrap_admin(&users, bootstrap).await {
			Ok(Some(admin)) => tracing::info!(user_id = %admin.id, "bootstrap administrator created"),
			Ok(None) => tracing::debug!("administrator already present, bootstrap skipped"),
			Err(e) => tracing::error!(error = %e, "failed to create bootstrap administrator"),
		}
	}

	tokio::fs::create_dir_all(&config.storage.attachments_dir)
		.await
		.with_context(|| {
			format!(
				"creating attachments directory {}",
				config.storage.attachments_dir.display()
			)
		})?;

	let state = create_app_state(pool, &config);
	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
