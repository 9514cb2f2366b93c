// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod manager;
pub mod pages;
pub mod past;
pub mod worker;

use std::convert::Infallible;

use axum::response::sse::{Event, Sse};
use futures::Stream;
use serde::Deserialize;
use tracing::info;

use presstrack_ledger_core::{RoleContext, SearchFilter, ViewFrame};
use presstrack_server_auth::IdentityGateway;

use crate::api::AppState;
use crate::auth_middleware::CurrentSession;
use crate::error::ServerError;
use crate::ledger::load_ledger;
use crate::live::{event_stream, LiveView};
use crate::role_router::Activation;

/// `?q=` search term shared by every list and stream route.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
	#[serde(default)]
	pub q: Option<String>,
}

impl SearchParams {
	pub fn filter(&self) -> SearchFilter {
		SearchFilter::new(self.q.as_deref().unwrap_or_default())
	}
}

/// Query of the delete routes. Deletion needs an explicit `confirm=true`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
	#[serde(default)]
	pub confirm: bool,
	#[serde(default)]
	pub q: Option<String>,
}

impl DeleteParams {
	pub fn require_confirmation(&self) -> Result<(), ServerError> {
		if self.confirm {
			Ok(())
		} else {
			Err(ServerError::ConfirmationRequired)
		}
	}
}

/// Render a view once from the current ledger.
pub async fn render_frame(
	state: &AppState,
	context: &RoleContext,
	search: &SearchFilter,
) -> Result<ViewFrame, ServerError> {
	let ledger = load_ledger(state.store.as_ref()).await?;
	let mut frame = context.render(&ledger);
	frame.apply_search(search);
	Ok(frame)
}

/// Open a live view for `activation` and stream it as SSE.
pub async fn live_stream(
	state: AppState,
	session: CurrentSession,
	activation: Activation,
	params: SearchParams,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
	// Subscribe to sign-outs before activating so none is missed.
	let auth_events = state.gateway.subscribe_auth_state();

	let mut view = LiveView::new(activation.context, state.calendar);
	view.activate(state.store.as_ref()).await?;
	if let Some(term) = params.q.as_deref() {
		view.set_search(term);
	}

	info!(
		principal = %session.principal.id,
		view = view.context().kind().as_str(),
		"client connected to ledger stream"
	);

	Ok(Sse::new(event_stream(
		view,
		auth_events,
		session.principal.session_id,
		state.heartbeat_interval,
	)))
}
