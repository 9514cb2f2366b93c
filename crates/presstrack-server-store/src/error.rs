// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for record store operations.

use thiserror::Error;

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("invalid path: {0}")]
	InvalidPath(String),

	/// A write was refused. Nothing was applied and nothing is retried.
	#[error("write rejected at {path}: {reason}")]
	WriteRejected { path: String, reason: String },

	#[error("store is closed")]
	Closed,

	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("internal error: {0}")]
	Internal(String),
}
