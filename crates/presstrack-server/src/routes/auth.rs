// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login page actions: sign-up, sign-in, sign-out and password reset.

use axum::{
	extract::State,
	http::{header::SET_COOKIE, HeaderMap, StatusCode},
	response::{AppendHeaders, IntoResponse, Response},
	Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use presstrack_ledger_core::{validate_sign_up, Page, Role, UserProfile};
use presstrack_server_auth::{
	clear_session_cookie, extract_session_cookie, session_cookie, IdentityGateway, Persistence,
};

use crate::api::AppState;
use crate::error::ServerError;
use crate::role_router::{profile_path, read_profile};

pub const ACCOUNT_CREATED_MESSAGE: &str = "Account created. Sign in with your credentials.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
	pub email: String,
	pub password: String,
	#[serde(default)]
	pub role: Option<String>,
	#[serde(default)]
	pub machine_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
	#[serde(default)]
	pub remember_me: bool,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
	pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPasswordResetRequest {
	pub token: String,
	pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
	pub message: String,
}

impl MessageResponse {
	fn new(message: impl Into<String>) -> Json<Self> {
		Json(Self {
			message: message.into(),
		})
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	pub role: Role,
	/// Page to navigate to.
	pub redirect: String,
	pub persistence: Persistence,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
	pub redirect: String,
}

/// POST /auth/signup - Create an account and its profile.
///
/// The user is left signed out.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn sign_up(
	State(state): State<AppState>,
	Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError> {
	let (role, machine_name) = validate_sign_up(
		request.role.as_deref().unwrap_or_default(),
		request.machine_name.as_deref(),
	)?;

	let principal = state
		.gateway
		.create_account(&request.email, &request.password)
		.await?;

	let created_at = Utc::now().timestamp_millis();
	let email = request.email.trim().to_lowercase();
	let profile = match role {
		Role::Manager => UserProfile::manager(email, created_at),
		Role::Worker => UserProfile::worker(email, machine_name, created_at),
	};
	let record: Value = serde_json::to_value(&profile).map_err(|e| ServerError::Internal(e.to_string()))?;

	if let Err(e) = state.store.write(&profile_path(&principal)?, record).await {
		error!(principal = %principal, error = %e, "account created but profile write failed");
		return Err(ServerError::write_failed("create profile")(e));
	}

	info!(principal = %principal, role = %role, "account created");
	Ok((StatusCode::CREATED, MessageResponse::new(ACCOUNT_CREATED_MESSAGE)))
}

/// POST /auth/login - Sign in and land on the role's page.
///
/// A corrupt profile signs the fresh session straight back out.
#[instrument(skip(state, request), fields(email = %request.email, remember_me = request.remember_me))]
pub async fn login(
	State(state): State<AppState>,
	Json(request): Json<LoginRequest>,
) -> Result<Response, ServerError> {
	let persistence = Persistence::from_remember_me(request.remember_me);
	let signed_in = state
		.gateway
		.sign_in(&request.email, &request.password, persistence)
		.await?;

	let profile = match read_profile(&state, &signed_in.principal.id).await {
		Ok(profile) => profile,
		Err(ServerError::ProfileIntegrity(e)) => {
			warn!(principal = %signed_in.principal.id, error = %e, "sign-in with unusable profile");
			state.gateway.sign_out(&signed_in.token).await?;
			return Err(ServerError::ProfileIntegrity(e));
		}
		Err(e) => return Err(e),
	};

	let cookie = session_cookie(
		&signed_in.token,
		persistence,
		state.gateway.config().ttl_for(persistence),
		state.secure_cookies,
	);
	let home = Page::home_for(profile.role);
	info!(principal = %signed_in.principal.id, role = %profile.role, "signed in");

	Ok((
		AppendHeaders([(SET_COOKIE, cookie)]),
		Json(LoginResponse {
			role: profile.role,
			redirect: home.path().to_string(),
			persistence,
		}),
	)
		.into_response())
}

/// POST /auth/logout - End the session and return to the login page.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ServerError> {
	if let Some(token) = extract_session_cookie(&headers) {
		state.gateway.sign_out(&token).await?;
	}
	Ok((
		AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
		Json(LogoutResponse {
			redirect: Page::Login.path().to_string(),
		}),
	)
		.into_response())
}

/// POST /auth/password-reset - Send a reset token, if the account exists.
///
/// Always answers the same way so accounts cannot be probed.
#[instrument(skip(state, request))]
pub async fn request_password_reset(
	State(state): State<AppState>,
	Json(request): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
	state.gateway.send_password_reset(&request.email).await?;
	Ok(MessageResponse::new("Password reset email sent."))
}

/// POST /auth/password-reset/confirm - Set a new password with a reset token.
///
/// Every session of the account is signed out.
#[instrument(skip(state, request))]
pub async fn confirm_password_reset(
	State(state): State<AppState>,
	Json(request): Json<ConfirmPasswordResetRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
	state
		.gateway
		.confirm_password_reset(&request.token, &request.new_password)
		.await?;
	Ok(MessageResponse::new("Password updated. Sign in with your new password."))
}
