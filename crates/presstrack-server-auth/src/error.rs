// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for identity operations.
//!
//! Display strings of the user-facing variants are shown to users verbatim.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("Invalid email or password.")]
	InvalidCredentials,

	#[error("The email address is already in use by another account.")]
	EmailInUse,

	#[error("Password should be at least {0} characters.")]
	WeakPassword(usize),

	#[error("The email address is badly formatted.")]
	InvalidEmail,

	#[error("The password reset link is invalid or has expired.")]
	InvalidResetToken,

	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("password hashing failed: {0}")]
	Hashing(String),

	#[error("internal error: {0}")]
	Internal(String),
}

impl AuthError {
	/// Whether the error is the caller's fault and safe to show as is.
	pub fn is_user_facing(&self) -> bool {
		matches!(
			self,
			AuthError::InvalidCredentials
				| AuthError::EmailInUse
				| AuthError::WeakPassword(_)
				| AuthError::InvalidEmail
				| AuthError::InvalidResetToken
		)
	}
}
