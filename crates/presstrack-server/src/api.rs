// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
	routing::{delete, get, post, put},
	Router,
};

use presstrack_export::{ExportAdapter, PdfExporter};
use presstrack_ledger_core::LedgerCalendar;
use presstrack_server_auth::{
	AccountRepository, GatewayConfig, InMemoryAccountRepository, LocalIdentityGateway,
	LoggingResetNotifier, SqliteAccountRepository,
};
use presstrack_server_config::ServerConfig;
use presstrack_server_store::{create_pool, LiveRecordStore, RecordStore, SqliteJournal};

use crate::error::ServerError;
use crate::routes;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn RecordStore>,
	pub gateway: Arc<LocalIdentityGateway>,
	pub exporter: Arc<dyn ExportAdapter>,
	pub calendar: LedgerCalendar,
	pub secure_cookies: bool,
	pub heartbeat_interval: Duration,
	pub started_at: Instant,
}

impl AppState {
	/// Assemble state around an already opened store and account repository.
	pub fn new(
		config: &ServerConfig,
		store: Arc<dyn RecordStore>,
		accounts: Arc<dyn AccountRepository>,
	) -> Self {
		let gateway = LocalIdentityGateway::new(
			accounts,
			Arc::new(LoggingResetNotifier),
			gateway_config(config),
		);
		let calendar = config
			.ledger
			.tz()
			.map(LedgerCalendar::new)
			.unwrap_or_else(LedgerCalendar::utc);

		Self {
			store,
			gateway: Arc::new(gateway),
			exporter: Arc::new(PdfExporter::new()),
			calendar,
			secure_cookies: config.http.secure_cookies,
			heartbeat_interval: Duration::from_secs(config.ledger.heartbeat_interval_secs),
			started_at: Instant::now(),
		}
	}
}

fn gateway_config(config: &ServerConfig) -> GatewayConfig {
	GatewayConfig {
		session_ttl: chrono::Duration::hours(config.auth.session_ttl_hours as i64),
		remember_me_ttl: chrono::Duration::days(config.auth.remember_me_ttl_days as i64),
		reset_token_ttl: chrono::Duration::minutes(config.auth.reset_token_ttl_minutes as i64),
		min_password_length: config.auth.min_password_length,
	}
}

/// Open the record store and account repository described by `config`.
///
/// With `store.database_url` set, both are journaled to the same SQLite
/// database; otherwise everything lives in memory.
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	match &config.store.database_url {
		Some(url) => {
			let pool = create_pool(url).await?;
			let journal = SqliteJournal::new(pool.clone()).await?;
			let store = LiveRecordStore::open(journal).await?;

			let accounts = SqliteAccountRepository::new(pool);
			accounts.run_migrations().await?;

			tracing::info!("record store and accounts journaled to sqlite");
			Ok(AppState::new(config, Arc::new(store), Arc::new(accounts)))
		}
		None => {
			tracing::warn!("no store.database_url configured, records are kept in memory only");
			Ok(AppState::new(
				config,
				Arc::new(LiveRecordStore::in_memory()),
				Arc::new(InMemoryAccountRepository::new()),
			))
		}
	}
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		// Login page and identity
		.route("/", get(routes::pages::login_page))
		.route("/auth/signup", post(routes::auth::sign_up))
		.route("/auth/login", post(routes::auth::login))
		.route("/auth/logout", post(routes::auth::logout))
		.route("/auth/password-reset", post(routes::auth::request_password_reset))
		.route(
			"/auth/password-reset/confirm",
			post(routes::auth::confirm_password_reset),
		)
		// Manager view
		.route(
			"/api/manager/jobs",
			get(routes::manager::list_jobs).post(routes::manager::create_job),
		)
		.route("/api/manager/jobs/stream", get(routes::manager::stream_jobs))
		.route(
			"/api/manager/jobs/{key}/completed",
			put(routes::manager::set_completed),
		)
		.route("/api/manager/jobs/{key}", delete(routes::manager::delete_job))
		// Worker view
		.route("/api/worker/jobs", get(routes::worker::list_jobs))
		.route("/api/worker/jobs/stream", get(routes::worker::stream_jobs))
		.route("/api/worker/jobs/{key}/save", post(routes::worker::save_job))
		// Past-records view
		.route("/api/past/records", get(routes::past::list_records))
		.route("/api/past/records/stream", get(routes::past::stream_records))
		.route("/api/past/records/export", get(routes::past::export_group))
		.route("/api/past/records/{key}", delete(routes::past::delete_record))
		// Protected pages; anything else under `/` is 404
		.route("/{page}", get(routes::pages::dashboard_page))
		.with_state(state)
}
