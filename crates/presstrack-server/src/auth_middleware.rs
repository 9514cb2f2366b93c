// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session extraction from the session cookie.

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use presstrack_server_auth::{extract_session_cookie, IdentityGateway, Principal};

use crate::api::AppState;
use crate::error::ServerError;

/// The raw session token as presented by the client. Never logged.
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Debug for SessionToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("SessionToken([REDACTED])")
	}
}

/// A live session: who is signed in, and the token that proves it.
#[derive(Debug, Clone)]
pub struct CurrentSession {
	pub principal: Principal,
	pub token: SessionToken,
}

/// Look the session cookie up with the identity gateway.
///
/// Missing, unknown and expired sessions all resolve to `None`.
pub async fn resolve_session(
	state: &AppState,
	headers: &HeaderMap,
) -> Result<Option<CurrentSession>, ServerError> {
	let Some(token) = extract_session_cookie(headers) else {
		return Ok(None);
	};
	let principal = state.gateway.current_principal(&token).await?;
	Ok(principal.map(|principal| CurrentSession {
		principal,
		token: SessionToken(token),
	}))
}

/// Extractor for routes that need a signed-in caller. Rejects with 401.
pub struct RequireSession(pub CurrentSession);

impl FromRequestParts<AppState> for RequireSession {
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		resolve_session(state, &parts.headers)
			.await?
			.map(RequireSession)
			.ok_or(ServerError::Unauthenticated)
	}
}

/// Extractor for routes that behave differently for anonymous callers.
pub struct OptionalSession(pub Option<CurrentSession>);

impl FromRequestParts<AppState> for OptionalSession {
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		Ok(OptionalSession(resolve_session(state, &parts.headers).await?))
	}
}
