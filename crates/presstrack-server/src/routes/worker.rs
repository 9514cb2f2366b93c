// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Worker view: open jobs on the worker's machine.

use std::convert::Infallible;

use axum::{
	extract::{Path, Query, State},
	response::sse::{Event, Sse},
	Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use presstrack_ledger_core::{JobKey, JobPatch, OutcomeForm, Page, ViewFrame};

use crate::api::AppState;
use crate::auth_middleware::RequireSession;
use crate::error::ServerError;
use crate::ledger;
use crate::role_router::activate;
use crate::routes::{live_stream, render_frame, SearchParams};

pub const SAVED_MESSAGE: &str = "Saved and moved to past records.";

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveJobResponse {
	pub key: JobKey,
	pub message: String,
}

/// GET /api/worker/jobs
pub async fn list_jobs(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<ViewFrame>, ServerError> {
	let activation = activate(&state, &session, Page::Worker).await?;
	let frame = render_frame(&state, &activation.context, &params.filter()).await?;
	Ok(Json(frame))
}

/// GET /api/worker/jobs/stream
pub async fn stream_jobs(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
	let activation = activate(&state, &session, Page::Worker).await?;
	live_stream(state, session, activation, params).await
}

/// POST /api/worker/jobs/{key}/save - Record the outcome and complete the job.
///
/// Completion is forced whatever the submitted values are.
#[instrument(skip(state, session, form), fields(principal = %session.principal.id, job_key = %key))]
pub async fn save_job(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Path(key): Path<String>,
	Json(form): Json<OutcomeForm>,
) -> Result<Json<SaveJobResponse>, ServerError> {
	let activation = activate(&state, &session, Page::Worker).await?;
	let key = JobKey::new(key);
	let patch = JobPatch::worker_outcome(form, &state.calendar.today());
	ledger::patch_job(state.store.as_ref(), &activation.context, &key, patch).await?;

	Ok(Json(SaveJobResponse {
		key,
		message: SAVED_MESSAGE.to_string(),
	}))
}
