// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
	#[error("nothing to export: {0}")]
	Empty(String),

	#[error("pdf rendering failed: {0}")]
	Render(String),
}
