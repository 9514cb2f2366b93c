// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! presstrack server binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use presstrack_server::{create_app_state, create_router};
use presstrack_server_auth::LocalIdentityGateway;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// presstrack server - job dashboards for managers and machine workers.
#[derive(Parser, Debug)]
#[command(name = "presstrack-server", about = "presstrack job dashboard server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/presstrack/server.toml)
	#[arg(long, env = "PRESSTRACK_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn spawn_session_cleanup(gateway: Arc<LocalIdentityGateway>, every: Duration) {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(every);
		loop {
			ticker.tick().await;
			if let Err(e) = gateway.purge_expired_sessions().await {
				tracing::warn!(error = %e, "session cleanup failed");
			}
		}
	});
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => presstrack_server_config::load_config_with_file(path)?,
		None => presstrack_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		persistent = config.store.database_url.is_some(),
		"starting presstrack-server"
	);

	let state = match create_app_state(&config).await {
		Ok(state) => state,
		Err(e) => {
			tracing::error!(error = %e, "failed to open record store or account repository");
			std::process::exit(1);
		}
	};

	spawn_session_cleanup(
		Arc::clone(&state.gateway),
		Duration::from_secs(config.auth.session_cleanup_interval_secs.max(1)),
	);

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
