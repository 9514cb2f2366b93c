// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SSE event types for live dashboard views.
//!
//! # Events
//!
//! - `snapshot` - Full re-render of the view after a ledger change (the first
//!   one is sent on connect)
//! - `session.ended` - The owning session signed out; the view is released
//! - `heartbeat` - Keep-alive

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::view::ViewFrame;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum LedgerStreamEvent {
	#[serde(rename = "snapshot")]
	Snapshot(FrameData),

	#[serde(rename = "session.ended")]
	SessionEnded(SessionEndedData),

	#[serde(rename = "heartbeat")]
	Heartbeat(HeartbeatData),
}

impl LedgerStreamEvent {
	/// Returns the event type name as a string.
	pub fn event_type(&self) -> &'static str {
		match self {
			LedgerStreamEvent::Snapshot(_) => "snapshot",
			LedgerStreamEvent::SessionEnded(_) => "session.ended",
			LedgerStreamEvent::Heartbeat(_) => "heartbeat",
		}
	}

	pub fn snapshot(sequence: u64, frame: ViewFrame) -> Self {
		LedgerStreamEvent::Snapshot(FrameData {
			sequence,
			frame,
			timestamp: Utc::now(),
		})
	}

	pub fn session_ended(redirect: &str) -> Self {
		LedgerStreamEvent::SessionEnded(SessionEndedData {
			redirect: redirect.to_string(),
			timestamp: Utc::now(),
		})
	}

	pub fn heartbeat() -> Self {
		LedgerStreamEvent::Heartbeat(HeartbeatData {
			timestamp: Utc::now(),
		})
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameData {
	/// Number of snapshots rendered by this view activation, starting at 1.
	pub sequence: u64,
	pub frame: ViewFrame,
	pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEndedData {
	pub redirect: String,
	pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeartbeatData {
	pub timestamp: DateTime<Utc>,
}
