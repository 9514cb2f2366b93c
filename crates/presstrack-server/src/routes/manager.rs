// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Manager view: today's open jobs of the signed-in manager.

use std::convert::Infallible;

use axum::{
	extract::{rejection::JsonRejection, Path, Query, State},
	http::StatusCode,
	response::sse::{Event, Sse},
	Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use presstrack_ledger_core::{JobForm, JobKey, JobPatch, Page, ViewFrame};

use crate::api::AppState;
use crate::auth_middleware::RequireSession;
use crate::error::ServerError;
use crate::ledger;
use crate::role_router::activate;
use crate::routes::{live_stream, render_frame, DeleteParams, SearchParams};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
	pub key: JobKey,
	pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SetCompletedRequest {
	pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobChangedResponse {
	pub key: JobKey,
	pub message: String,
}

/// POST /api/manager/jobs - Create a job owned by the caller.
///
/// Every form field has to be present; empty strings are accepted.
#[instrument(skip(state, session, form), fields(principal = %session.principal.id))]
pub async fn create_job(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	form: Result<Json<JobForm>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateJobResponse>), ServerError> {
	activate(&state, &session, Page::Manager).await?;
	let Json(form) = form.map_err(|e| ServerError::Validation(e.body_text()))?;

	let key = ledger::create_job(
		state.store.as_ref(),
		session.principal.id.clone(),
		form,
		&state.calendar.today(),
	)
	.await?;

	Ok((
		StatusCode::CREATED,
		Json(CreateJobResponse {
			key,
			message: "Job added.".to_string(),
		}),
	))
}

/// GET /api/manager/jobs - Current manager frame.
pub async fn list_jobs(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<ViewFrame>, ServerError> {
	let activation = activate(&state, &session, Page::Manager).await?;
	let frame = render_frame(&state, &activation.context, &params.filter()).await?;
	Ok(Json(frame))
}

/// GET /api/manager/jobs/stream - Live manager frame over SSE.
pub async fn stream_jobs(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
	let activation = activate(&state, &session, Page::Manager).await?;
	live_stream(state, session, activation, params).await
}

/// PUT /api/manager/jobs/{key}/completed - Toggle completion.
///
/// Writes only `completed` and `date`.
#[instrument(skip(state, session, request), fields(principal = %session.principal.id, job_key = %key))]
pub async fn set_completed(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Path(key): Path<String>,
	Json(request): Json<SetCompletedRequest>,
) -> Result<Json<JobChangedResponse>, ServerError> {
	let activation = activate(&state, &session, Page::Manager).await?;
	let key = JobKey::new(key);
	let patch = JobPatch::completion(request.completed, &state.calendar.today());
	ledger::patch_job(state.store.as_ref(), &activation.context, &key, patch).await?;

	let message = if request.completed {
		"Job marked completed."
	} else {
		"Job reopened."
	};
	Ok(Json(JobChangedResponse {
		key,
		message: message.to_string(),
	}))
}

/// DELETE /api/manager/jobs/{key}?confirm=true - Delete a job.
#[instrument(skip(state, session, params), fields(principal = %session.principal.id, job_key = %key))]
pub async fn delete_job(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Path(key): Path<String>,
	Query(params): Query<DeleteParams>,
) -> Result<Json<JobChangedResponse>, ServerError> {
	let activation = activate(&state, &session, Page::Manager).await?;
	params.require_confirmation()?;
	let key = JobKey::new(key);
	ledger::delete_job(state.store.as_ref(), &activation.context, &key).await?;
	Ok(Json(JobChangedResponse {
		key,
		message: "Job deleted.".to_string(),
	}))
}
