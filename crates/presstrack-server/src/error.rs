// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error type and its JSON rendering.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use presstrack_export::ExportError;
use presstrack_ledger_core::{LedgerError, Page, ProfileIntegrityError};
use presstrack_server_auth::AuthError;
use presstrack_server_config::ConfigError;
use presstrack_server_store::StoreError;

/// Shown when a session's profile is absent or has no usable role.
pub const NO_ROLE_MESSAGE: &str =
	"Your account has no role set. Please sign up again or contact admin.";

/// Error body returned by every API route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("not signed in")]
	Unauthenticated,

	#[error("corrupt profile: {0}")]
	ProfileIntegrity(#[from] ProfileIntegrityError),

	#[error("access denied, home is {}", home.path())]
	AccessDenied { home: Page },

	#[error("{0}")]
	NotFound(String),

	#[error("confirmation required")]
	ConfirmationRequired,

	#[error("{0}")]
	Validation(String),

	/// A rejected write, surfaced once as `Failed to <action>: <reason>`.
	#[error("Failed to {action}: {source}")]
	StoreWrite {
		action: &'static str,
		#[source]
		source: StoreError,
	},

	#[error(transparent)]
	Store(#[from] StoreError),

	#[error(transparent)]
	Auth(#[from] AuthError),

	#[error(transparent)]
	Export(#[from] ExportError),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("internal error: {0}")]
	Internal(String),
}

impl ServerError {
	pub fn write_failed(action: &'static str) -> impl FnOnce(StoreError) -> Self {
		move |source| ServerError::StoreWrite { action, source }
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ServerError::Unauthenticated => StatusCode::UNAUTHORIZED,
			ServerError::ProfileIntegrity(_) | ServerError::AccessDenied { .. } => StatusCode::FORBIDDEN,
			ServerError::NotFound(_) => StatusCode::NOT_FOUND,
			ServerError::ConfirmationRequired => StatusCode::PRECONDITION_REQUIRED,
			ServerError::Validation(_) => StatusCode::BAD_REQUEST,
			ServerError::Auth(e) => match e {
				AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
				AuthError::EmailInUse => StatusCode::CONFLICT,
				AuthError::WeakPassword(_) | AuthError::InvalidEmail | AuthError::InvalidResetToken => {
					StatusCode::BAD_REQUEST
				}
				_ => StatusCode::INTERNAL_SERVER_ERROR,
			},
			ServerError::Export(ExportError::Empty(_)) => StatusCode::NOT_FOUND,
			ServerError::StoreWrite { .. }
			| ServerError::Store(_)
			| ServerError::Export(_)
			| ServerError::Config(_)
			| ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn code(&self) -> &'static str {
		match self {
			ServerError::Unauthenticated => "unauthenticated",
			ServerError::ProfileIntegrity(_) => "profile_integrity",
			ServerError::AccessDenied { .. } => "access_denied",
			ServerError::NotFound(_) => "not_found",
			ServerError::ConfirmationRequired => "confirmation_required",
			ServerError::Validation(_) => "validation",
			ServerError::StoreWrite { .. } => "store_write",
			ServerError::Auth(e) if e.is_user_facing() => "auth",
			ServerError::Export(ExportError::Empty(_)) => "not_found",
			_ => "internal_error",
		}
	}

	fn message(&self) -> String {
		match self {
			ServerError::Unauthenticated => "Please sign in.".to_string(),
			ServerError::ProfileIntegrity(_) => NO_ROLE_MESSAGE.to_string(),
			ServerError::AccessDenied { home } => {
				format!("Access denied. Your dashboard is {}.", home.path())
			}
			ServerError::ConfirmationRequired => {
				"Deleting a record needs confirm=true.".to_string()
			}
			ServerError::NotFound(_)
			| ServerError::Validation(_)
			| ServerError::StoreWrite { .. }
			| ServerError::Export(ExportError::Empty(_)) => self.to_string(),
			ServerError::Auth(e) if e.is_user_facing() => e.to_string(),
			_ => "Internal server error.".to_string(),
		}
	}
}

impl From<LedgerError> for ServerError {
	fn from(e: LedgerError) -> Self {
		match e {
			LedgerError::Validation(message) => ServerError::Validation(message),
			LedgerError::UnknownRole(role) => ServerError::Validation(format!("Unknown role: {role}")),
			LedgerError::ProfileIntegrity(e) => ServerError::ProfileIntegrity(e),
			LedgerError::Serialization(e) => ServerError::Internal(e.to_string()),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		} else {
			tracing::debug!(error = %self, status = %status, "request rejected");
		}
		(status, Json(ErrorResponse::new(self.code(), self.message()))).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_store_write_message() {
		let err = ServerError::write_failed("add job")(StoreError::WriteRejected {
			path: "jobs".to_string(),
			reason: "disk full".to_string(),
		});
		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			err.message(),
			"Failed to add job: write rejected at jobs: disk full"
		);
	}

	#[test]
	fn test_internal_details_are_hidden() {
		let err = ServerError::Auth(AuthError::Hashing("salt".to_string()));
		assert_eq!(err.code(), "internal_error");
		assert_eq!(err.message(), "Internal server error.");
	}

	#[test]
	fn test_user_facing_auth_errors() {
		let err = ServerError::Auth(AuthError::WeakPassword(6));
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
		assert_eq!(err.message(), "Password should be at least 6 characters.");
	}

	#[test]
	fn test_profile_integrity_message() {
		let err = ServerError::from(ProfileIntegrityError::MissingRole);
		assert_eq!(err.status(), StatusCode::FORBIDDEN);
		assert_eq!(err.message(), NO_ROLE_MESSAGE);
	}

	#[test]
	fn test_validation_from_ledger() {
		let err = ServerError::from(LedgerError::Validation("Please select role.".to_string()));
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
		assert_eq!(err.message(), "Please select role.");
	}
}
