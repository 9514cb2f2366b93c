// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role router: resolves a session's profile and decides which view, if any,
//! a page activates for it.
//!
//! The profile is read once per request, never subscribed to. A profile that
//! is missing or has no usable role ends the session on the spot.

use tracing::{instrument, warn};

use presstrack_ledger_core::{
	Dispatch, LedgerDate, Page, PrincipalId, RoleContext, UserProfile, ViewKind, USERS_PATH,
};
use presstrack_server_auth::IdentityGateway;
use presstrack_server_store::StorePath;

use crate::api::AppState;
use crate::auth_middleware::CurrentSession;
use crate::error::ServerError;

/// A view granted to a session.
#[derive(Debug, Clone)]
pub struct Activation {
	pub profile: UserProfile,
	pub context: RoleContext,
}

impl Activation {
	pub fn kind(&self) -> ViewKind {
		self.context.kind()
	}
}

pub fn profile_path(principal: &PrincipalId) -> Result<StorePath, ServerError> {
	Ok(StorePath::parse(USERS_PATH)?.child(principal.as_str())?)
}

/// Read and validate the profile of `principal`.
pub async fn read_profile(state: &AppState, principal: &PrincipalId) -> Result<UserProfile, ServerError> {
	let snapshot = state.store.read_once(&profile_path(principal)?).await?;
	Ok(UserProfile::from_record(snapshot.value())?)
}

/// Read the session's profile, signing the session out if it is corrupt.
#[instrument(skip(state, session), fields(principal = %session.principal.id))]
pub async fn resolve_profile(
	state: &AppState,
	session: &CurrentSession,
) -> Result<UserProfile, ServerError> {
	match read_profile(state, &session.principal.id).await {
		Err(ServerError::ProfileIntegrity(e)) => {
			warn!(error = %e, "profile unusable, signing session out");
			state.gateway.sign_out(session.token.as_str()).await?;
			Err(ServerError::ProfileIntegrity(e))
		}
		other => other,
	}
}

/// Role context of `kind` for the given principal.
pub fn context_for(
	kind: ViewKind,
	principal: &PrincipalId,
	profile: &UserProfile,
	today: LedgerDate,
) -> RoleContext {
	match kind {
		ViewKind::Manager => RoleContext::Manager {
			principal: principal.clone(),
			today,
		},
		ViewKind::Worker => RoleContext::Worker {
			machine_name: profile.machine_name.clone(),
		},
		ViewKind::PastRecords => RoleContext::PastRecords {
			principal: principal.clone(),
		},
	}
}

/// Dispatch a protected page for the session.
///
/// Fails with `ProfileIntegrity` (session already signed out) or
/// `AccessDenied` naming the role's own page.
pub async fn activate(
	state: &AppState,
	session: &CurrentSession,
	page: Page,
) -> Result<Activation, ServerError> {
	let profile = resolve_profile(state, session).await?;
	match page.dispatch(profile.role) {
		Dispatch::Activate(kind) => {
			let context = context_for(kind, &session.principal.id, &profile, state.calendar.today());
			Ok(Activation { profile, context })
		}
		Dispatch::Denied { home } => {
			tracing::debug!(page = %page, role = %profile.role, "page not available to role");
			Err(ServerError::AccessDenied { home })
		}
		Dispatch::Login => Err(ServerError::NotFound(format!("{page} is not a dashboard page"))),
	}
}
