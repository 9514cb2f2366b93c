// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ledger dates.
//!
//! A job's `date` is a display string in `M/D/YYYY` form, not a sortable key.
//! It is rewritten to "today" on every mutation, so it reads as the day the
//! job was last touched. Parsing is only needed to order past-records groups.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group label for jobs without a date.
pub const UNKNOWN_DATE: &str = "Unknown";

/// Formats accepted when ordering date groups. The first one is the format
/// the ledger writes.
const PARSE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// A locale date string as stored on a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerDate(String);

impl LedgerDate {
	/// Wrap a raw date string read from a record.
	pub fn new(date: impl Into<String>) -> Self {
		Self(date.into())
	}

	/// Format a calendar date the way the ledger writes it (`10/19/2026`).
	pub fn from_naive(date: NaiveDate) -> Self {
		Self(date.format("%-m/%-d/%Y").to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Parse back into a calendar date, if the string is recognisable.
	pub fn parse(&self) -> Option<NaiveDate> {
		parse_ledger_date(&self.0)
	}
}

impl fmt::Display for LedgerDate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Parse a date string as found on a job record.
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
	let raw = raw.trim();
	if raw.is_empty() {
		return None;
	}
	PARSE_FORMATS
		.iter()
		.find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Resolves "today" in the shop's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerCalendar {
	tz: Tz,
}

impl LedgerCalendar {
	pub fn new(tz: Tz) -> Self {
		Self { tz }
	}

	pub fn utc() -> Self {
		Self::new(Tz::UTC)
	}

	pub fn timezone(&self) -> Tz {
		self.tz
	}

	/// Today's ledger date.
	pub fn today(&self) -> LedgerDate {
		self.date_of(Utc::now())
	}

	/// The ledger date of an instant, in the calendar's timezone.
	pub fn date_of(&self, at: DateTime<Utc>) -> LedgerDate {
		LedgerDate::from_naive(at.with_timezone(&self.tz).date_naive())
	}
}

impl Default for LedgerCalendar {
	fn default() -> Self {
		Self::utc()
	}
}
