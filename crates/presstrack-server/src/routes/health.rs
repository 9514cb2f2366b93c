// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use presstrack_server_auth::IdentityGateway;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ComponentHealth {
	fn from_result<E: std::fmt::Display>(result: Result<(), E>, started: Instant) -> Self {
		let latency_ms = started.elapsed().as_millis() as u64;
		match result {
			Ok(()) => Self {
				status: HealthStatus::Healthy,
				latency_ms,
				error: None,
			},
			Err(e) => Self {
				status: HealthStatus::Unhealthy,
				latency_ms,
				error: Some(e.to_string()),
			},
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthComponents {
	pub store: ComponentHealth,
	pub gateway: ComponentHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: String,
	pub version: String,
	pub uptime: String,
	pub components: HealthComponents,
}

/// GET /health - Store and identity gateway liveness.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let started = Instant::now();
	let (store, gateway) = tokio::join!(state.store.health_check(), state.gateway.health_check());

	let components = HealthComponents {
		store: ComponentHealth::from_result(store, started),
		gateway: ComponentHealth::from_result(gateway, started),
	};
	let status = if components.store.status == HealthStatus::Healthy
		&& components.gateway.status == HealthStatus::Healthy
	{
		HealthStatus::Healthy
	} else {
		HealthStatus::Unhealthy
	};

	let uptime = std::time::Duration::from_secs(state.started_at.elapsed().as_secs());
	let response = HealthResponse {
		status,
		timestamp: chrono::Utc::now().to_rfc3339(),
		version: env!("CARGO_PKG_VERSION").to_string(),
		uptime: humantime::format_duration(uptime).to_string(),
		components,
	};

	let http_status = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};
	(http_status, Json(response))
}
