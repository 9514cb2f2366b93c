// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Past-records view: every job of the manager, grouped by date, with PDF
//! export of a single group.

use std::convert::Infallible;

use axum::{
	extract::{Path, Query, State},
	http::header,
	response::{
		sse::{Event, Sse},
		IntoResponse, Response,
	},
	Json,
};
use futures::Stream;
use serde::Deserialize;
use tracing::{info, instrument};

use presstrack_export::ExportRequest;
use presstrack_ledger_core::{ExportTable, JobKey, Page, PastRecordsPage, ViewFrame};

use crate::api::AppState;
use crate::auth_middleware::RequireSession;
use crate::error::ServerError;
use crate::ledger;
use crate::role_router::activate;
use crate::routes::{live_stream, render_frame, DeleteParams, SearchParams};

#[derive(Debug, Deserialize)]
pub struct ExportParams {
	pub date: String,
}

fn into_page(frame: ViewFrame) -> Result<PastRecordsPage, ServerError> {
	match frame {
		ViewFrame::PastRecords { page } => Ok(page),
		other => Err(ServerError::Internal(format!(
			"expected past records frame, got {}",
			other.kind().as_str()
		))),
	}
}

/// GET /api/past/records
pub async fn list_records(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<ViewFrame>, ServerError> {
	let activation = activate(&state, &session, Page::Past).await?;
	let frame = render_frame(&state, &activation.context, &params.filter()).await?;
	Ok(Json(frame))
}

/// GET /api/past/records/stream
pub async fn stream_records(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
	let activation = activate(&state, &session, Page::Past).await?;
	live_stream(state, session, activation, params).await
}

/// GET /api/past/records/export?date= - Download one date group as PDF.
///
/// The whole group is exported, including rows a search would hide.
#[instrument(skip(state, session, params), fields(principal = %session.principal.id, date = %params.date))]
pub async fn export_group(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Query(params): Query<ExportParams>,
) -> Result<Response, ServerError> {
	let activation = activate(&state, &session, Page::Past).await?;
	let frame = render_frame(&state, &activation.context, &Default::default()).await?;
	let page = into_page(frame)?;

	let section = page
		.section(&params.date)
		.ok_or_else(|| ServerError::NotFound(format!("No records for {}.", params.date)))?;
	let request = ExportRequest::past_records(&section.date, ExportTable::from_rendered(&section.table));
	let document = state.exporter.export(&request)?;
	info!(file_name = %document.file_name, bytes = document.bytes.len(), "past records exported");

	Ok((
		[
			(header::CONTENT_TYPE, document.content_type.to_string()),
			(
				header::CONTENT_DISPOSITION,
				format!("attachment; filename=\"{}\"", document.file_name),
			),
		],
		document.bytes,
	)
		.into_response())
}

/// DELETE /api/past/records/{key}?confirm=true - Delete one of the caller's
/// jobs.
///
/// Answers with the page as it was rendered before the delete, minus the
/// removed row, without waiting for the next snapshot.
#[instrument(skip(state, session, params), fields(principal = %session.principal.id, job_key = %key))]
pub async fn delete_record(
	RequireSession(session): RequireSession,
	State(state): State<AppState>,
	Path(key): Path<String>,
	Query(params): Query<DeleteParams>,
) -> Result<Json<PastRecordsPage>, ServerError> {
	let activation = activate(&state, &session, Page::Past).await?;
	params.require_confirmation()?;
	let key = JobKey::new(key);

	let search = SearchParams { q: params.q.clone() }.filter();
	let mut page = into_page(render_frame(&state, &activation.context, &search).await?)?;

	ledger::delete_job(state.store.as_ref(), &activation.context, &key).await?;
	page.remove_row(&key);
	Ok(Json(page))
}
