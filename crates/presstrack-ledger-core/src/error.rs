// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for ledger operations.

use thiserror::Error;

use crate::profile::ProfileIntegrityError;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while validating or decoding ledger records.
#[derive(Debug, Error)]
pub enum LedgerError {
	/// A required form field was empty. Raised before any store call.
	#[error("{0}")]
	Validation(String),

	#[error(transparent)]
	ProfileIntegrity(#[from] ProfileIntegrityError),

	#[error("unknown role: {0}")]
	UnknownRole(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}
