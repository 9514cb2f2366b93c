// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Live views.
//!
//! A [`LiveView`] owns one subscription to the whole job collection and
//! re-renders its frame from scratch on every snapshot:
//!
//! ```text
//! Unsubscribed --activate--> Subscribed --snapshot--> Rendered --snapshot--> Rendered
//!      ^                                                   |
//!      +-------------------------release-------------------+
//! ```
//!
//! Dropping the view releases it, so a closed SSE connection tears the
//! subscription down. A sign-out of the owning session does the same.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::Event;
use futures::Stream;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use presstrack_ledger_core::{
	decode_ledger, Control, ControlBindings, LedgerCalendar, LedgerStreamEvent, Page, RoleContext,
	SearchFilter, ViewFrame,
};
use presstrack_server_auth::{AuthStateChange, SessionId};
use presstrack_server_store::{RecordStore, Subscription};

use crate::error::ServerError;
use crate::ledger::jobs_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
	Unsubscribed,
	/// Waiting for the first snapshot.
	Subscribed,
	Rendered,
}

pub struct LiveView {
	context: RoleContext,
	calendar: LedgerCalendar,
	bindings: ControlBindings,
	search: SearchFilter,
	subscription: Option<Subscription>,
	sequence: u64,
	state: ViewState,
}

impl LiveView {
	pub fn new(context: RoleContext, calendar: LedgerCalendar) -> Self {
		Self {
			context,
			calendar,
			bindings: ControlBindings::new(),
			search: SearchFilter::default(),
			subscription: None,
			sequence: 0,
			state: ViewState::Unsubscribed,
		}
	}

	pub fn state(&self) -> ViewState {
		self.state
	}

	pub fn context(&self) -> &RoleContext {
		&self.context
	}

	pub fn bindings(&self) -> &ControlBindings {
		&self.bindings
	}

	/// Subscribe to the job collection. A view that is already subscribed is
	/// left alone.
	pub async fn activate(&mut self, store: &dyn RecordStore) -> Result<(), ServerError> {
		if self.subscription.is_some() {
			return Ok(());
		}
		self.subscription = Some(store.subscribe(&jobs_path()?).await?);
		self.state = ViewState::Subscribed;
		if self.bindings.bind(Control::Logout) {
			debug!(view = self.context.kind().as_str(), "logout control bound");
		}
		Ok(())
	}

	/// Set the search term. The search control is bound on the first call
	/// only; later calls just change the term.
	pub fn set_search(&mut self, term: &str) {
		if self.bindings.bind(Control::Search) {
			debug!(view = self.context.kind().as_str(), "search control bound");
		}
		self.search = SearchFilter::new(term);
	}

	/// Render a frame from a raw job-collection value.
	pub fn render(&mut self, jobs: Option<&Value>) -> LedgerStreamEvent {
		self.refresh_today();
		let ledger = decode_ledger(jobs);
		let mut frame: ViewFrame = self.context.render(&ledger);
		frame.apply_search(&self.search);
		self.sequence += 1;
		self.state = ViewState::Rendered;
		LedgerStreamEvent::snapshot(self.sequence, frame)
	}

	/// Wait for the next snapshot and render it. `None` once released.
	pub async fn next_frame(&mut self) -> Option<LedgerStreamEvent> {
		let snapshot = self.subscription.as_mut()?.next().await?;
		Some(self.render(snapshot.value()))
	}

	/// Drop the subscription and go back to `Unsubscribed`. Idempotent.
	pub fn release(&mut self) {
		if let Some(mut subscription) = self.subscription.take() {
			subscription.release();
			debug!(
				view = self.context.kind().as_str(),
				frames = self.sequence,
				"live view released"
			);
		}
		self.state = ViewState::Unsubscribed;
	}

	/// The manager view is scoped to "today", which moves at midnight.
	fn refresh_today(&mut self) {
		if let RoleContext::Manager { today, .. } = &mut self.context {
			*today = self.calendar.today();
		}
	}
}

impl Drop for LiveView {
	fn drop(&mut self) {
		self.release();
	}
}

fn to_sse(event: &LedgerStreamEvent) -> Option<Event> {
	match serde_json::to_string(event) {
		Ok(json) => Some(Event::default().event(event.event_type()).data(json)),
		Err(e) => {
			warn!(error = %e, "Failed to serialize ledger SSE event");
			None
		}
	}
}

/// Drive an activated view as an SSE stream.
///
/// Yields a `snapshot` for the current ledger and after every change,
/// `heartbeat` every `heartbeat` interval, and a final `session.ended` when
/// `session` signs out.
pub fn event_stream(
	mut view: LiveView,
	mut auth_events: broadcast::Receiver<AuthStateChange>,
	session: SessionId,
	heartbeat: Duration,
) -> impl Stream<Item = Result<Event, Infallible>> {
	async_stream::stream! {
		let start = tokio::time::Instant::now() + heartbeat;
		let mut ticker = tokio::time::interval_at(start, heartbeat);

		loop {
			let (event, done) = tokio::select! {
				frame = view.next_frame() => match frame {
					Some(event) => (Some(event), false),
					None => (None, true),
				},
				change = auth_events.recv() => match change {
					Ok(AuthStateChange::SignedOut { session_id, .. }) if session_id == session => {
						view.release();
						(Some(LedgerStreamEvent::session_ended(Page::Login.path())), true)
					}
					Ok(_) => (None, false),
					Err(RecvError::Lagged(skipped)) => {
						debug!(skipped, "auth-state feed lagged");
						(None, false)
					}
					Err(RecvError::Closed) => (None, true),
				},
				_ = ticker.tick() => (Some(LedgerStreamEvent::heartbeat()), false),
			};

			if let Some(sse) = event.as_ref().and_then(to_sse) {
				yield Ok::<_, Infallible>(sse);
			}
			if done {
				break;
			}
		}
		view.release();
	}
}
