// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ledger calendar and live view settings.

use serde::{Deserialize, Serialize};

const DEFAULT_TIMEZONE: &str = "UTC";
const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerConfig {
	/// IANA zone that decides what "today" is for job dates.
	pub timezone: String,
	pub heartbeat_interval_secs: u64,
}

impl Default for LedgerConfig {
	fn default() -> Self {
		Self {
			timezone: DEFAULT_TIMEZONE.to_string(),
			heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
		}
	}
}

impl LedgerConfig {
	pub fn tz(&self) -> Option<chrono_tz::Tz> {
		self.timezone.parse().ok()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerConfigLayer {
	pub timezone: Option<String>,
	pub heartbeat_interval_secs: Option<u64>,
}

impl LedgerConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.timezone.is_some() {
			self.timezone = other.timezone;
		}
		if other.heartbeat_interval_secs.is_some() {
			self.heartbeat_interval_secs = other.heartbeat_interval_secs;
		}
	}

	pub fn finalize(self) -> LedgerConfig {
		LedgerConfig {
			timezone: self.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
			heartbeat_interval_secs: self
				.heartbeat_interval_secs
				.unwrap_or(DEFAULT_HEARTBEAT_INTERVAL_SECS),
		}
	}
}
