// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity gateway configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
	/// Lifetime of a sign-in without "remember me".
	pub session_ttl_hours: u64,
	/// Lifetime of a "remember me" sign-in.
	pub remember_me_ttl_days: u64,
	pub reset_token_ttl_minutes: u64,
	pub min_password_length: usize,
	pub session_cleanup_interval_secs: u64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthConfigLayer {
	pub session_ttl_hours: Option<u64>,
	pub remember_me_ttl_days: Option<u64>,
	pub reset_token_ttl_minutes: Option<u64>,
	pub min_password_length: Option<usize>,
	pub session_cleanup_interval_secs: Option<u64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.session_ttl_hours.is_some() {
			self.session_ttl_hours = other.session_ttl_hours;
		}
		if other.remember_me_ttl_days.is_some() {
			self.remember_me_ttl_days = other.remember_me_ttl_days;
		}
		if other.reset_token_ttl_minutes.is_some() {
			self.reset_token_ttl_minutes = other.reset_token_ttl_minutes;
		}
		if other.min_password_length.is_some() {
			self.min_password_length = other.min_password_length;
		}
		if other.session_cleanup_interval_secs.is_some() {
			self.session_cleanup_interval_secs = other.session_cleanup_interval_secs;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			session_ttl_hours: self.session_ttl_hours.unwrap_or(12),
			remember_me_ttl_days: self.remember_me_ttl_days.unwrap_or(30),
			reset_token_ttl_minutes: self.reset_token_ttl_minutes.unwrap_or(60),
			min_password_length: self.min_password_length.unwrap_or(6),
			session_cleanup_interval_secs: self.session_cleanup_interval_secs.unwrap_or(3600),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = AuthConfig::default();
		assert_eq!(config.session_ttl_hours, 12);
		assert_eq!(config.remember_me_ttl_days, 30);
		assert_eq!(config.min_password_length, 6);
	}
}
