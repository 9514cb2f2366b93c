// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of password reset tokens.

use async_trait::async_trait;

use crate::error::Result;

/// Hands a reset token to its owner, e.g. by email.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
	async fn deliver(&self, email: &str, token: &str) -> Result<()>;
}

/// Records that a reset was requested. The token is not logged, so with this
/// notifier a reset can only be completed by an operator-side integration.
#[derive(Debug, Default, Clone)]
pub struct LoggingResetNotifier;

#[async_trait]
impl ResetNotifier for LoggingResetNotifier {
	async fn deliver(&self, email: &str, _token: &str) -> Result<()> {
		tracing::info!(email = %email, "password reset requested");
		Ok(())
	}
}
