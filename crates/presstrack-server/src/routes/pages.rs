// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page bootstrap routes.
//!
//! `GET /manager`, `/worker` and `/past` run the role router and answer the
//! data a page needs before its live stream connects. Signed-out callers and
//! sessions with a corrupt profile are sent back to the login page.

use axum::{
	extract::{Path, State},
	http::header::SET_COOKIE,
	response::{AppendHeaders, IntoResponse, Redirect, Response},
	Json,
};
use serde::{Deserialize, Serialize};

use presstrack_ledger_core::{Page, ViewKind};
use presstrack_server_auth::clear_session_cookie;

use crate::api::AppState;
use crate::auth_middleware::OptionalSession;
use crate::error::ServerError;
use crate::role_router::activate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageBootstrap {
	pub page: Page,
	pub current_date: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worker_machine_name: Option<String>,
}

fn to_login() -> Response {
	Redirect::to(Page::Login.path()).into_response()
}

/// GET / - The login page.
pub async fn login_page(State(state): State<AppState>) -> Json<PageBootstrap> {
	Json(PageBootstrap {
		page: Page::Login,
		current_date: state.calendar.today().to_string(),
		worker_machine_name: None,
	})
}

/// GET /{page} - Bootstrap of a protected page.
pub async fn dashboard_page(
	OptionalSession(session): OptionalSession,
	State(state): State<AppState>,
	Path(identity): Path<String>,
) -> Result<Response, ServerError> {
	let page = match Page::from_identity(&identity) {
		Some(page) if page.is_protected() => page,
		Some(_) => return Ok(to_login()),
		None => return Err(ServerError::NotFound(format!("No page named {identity}."))),
	};

	let Some(session) = session else {
		return Ok(to_login());
	};

	let activation = match activate(&state, &session, page).await {
		Ok(activation) => activation,
		Err(ServerError::ProfileIntegrity(_)) => {
			return Ok((AppendHeaders([(SET_COOKIE, clear_session_cookie())]), to_login()).into_response());
		}
		Err(e) => return Err(e),
	};

	let worker_machine_name = (activation.kind() == ViewKind::Worker)
		.then(|| activation.profile.machine_label().to_string());

	Ok(Json(PageBootstrap {
		page,
		current_date: state.calendar.today().to_string(),
		worker_machine_name,
	})
	.into_response())
}
