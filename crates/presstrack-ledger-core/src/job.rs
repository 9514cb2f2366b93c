// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job records and the mutations the views are allowed to make.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::date::LedgerDate;
use crate::ids::{JobKey, PrincipalId};

/// A tracked unit of production work, as stored under `jobs/<key>`.
///
/// Text fields are decoded leniently: older records carry numbers where the
/// views expect text, and a missing field renders as an empty cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
	#[serde(default, deserialize_with = "text_or_number")]
	pub job_no: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub job_name: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub form_name: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub quantity: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub worker_name: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub machine_name: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub good: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub waste: String,
	#[serde(default, deserialize_with = "text_or_number")]
	pub remark: String,
	#[serde(default)]
	pub completed: bool,
	/// Day the job was last touched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<LedgerDate>,
	/// Day the job was created. Never rewritten.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_date: Option<LedgerDate>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub manager_id: Option<PrincipalId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<i64>,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => String::new(),
		Value::String(s) => s,
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		other => {
			return Err(de::Error::custom(format!(
				"expected text or number, found {other}"
			)))
		}
	})
}

impl Job {
	pub fn is_owned_by(&self, principal: &PrincipalId) -> bool {
		self.manager_id.as_ref() == Some(principal)
	}

	/// Whether the last-touched date equals `day`.
	pub fn touched_on(&self, day: &LedgerDate) -> bool {
		self.date.as_ref() == Some(day)
	}
}

/// A job together with its store key.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
	pub key: JobKey,
	pub job: Job,
}

/// Decode the job collection snapshot into ledger entries in key order.
///
/// Null children are skipped; malformed children are skipped with a warning
/// so one bad record never blanks a whole view.
pub fn decode_ledger(snapshot: Option<&Value>) -> Vec<LedgerEntry> {
	let Some(Value::Object(children)) = snapshot else {
		return Vec::new();
	};

	let mut entries: Vec<LedgerEntry> = children
		.iter()
		.filter(|(_, value)| !value.is_null())
		.filter_map(|(key, value)| match serde_json::from_value::<Job>(value.clone()) {
			Ok(job) => Some(LedgerEntry {
				key: JobKey::new(key.clone()),
				job,
			}),
			Err(e) => {
				warn!(job_key = %key, error = %e, "Skipping malformed job record");
				None
			}
		})
		.collect();

	entries.sort_by(|a, b| a.key.cmp(&b.key));
	entries
}

/// Fields of the manager's create-job form. All must be present; empty
/// strings are allowed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobForm {
	pub job_no: String,
	pub job_name: String,
	pub form_name: String,
	pub quantity: String,
	pub worker_name: String,
	pub machine_name: String,
}

impl JobForm {
	/// Build the record a manager creates. `createdAt` is left for the store
	/// to stamp.
	pub fn into_job(self, manager: PrincipalId, today: &LedgerDate) -> Job {
		Job {
			job_no: self.job_no.trim().to_string(),
			job_name: self.job_name.trim().to_string(),
			form_name: self.form_name.trim().to_string(),
			quantity: self.quantity.trim().to_string(),
			worker_name: self.worker_name.trim().to_string(),
			machine_name: self.machine_name.trim().to_string(),
			good: "0".to_string(),
			waste: "0".to_string(),
			remark: String::new(),
			completed: false,
			date: Some(today.clone()),
			created_date: Some(today.clone()),
			manager_id: Some(manager),
			created_at: None,
			updated_at: None,
		}
	}
}

/// Values a worker enters before saving a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeForm {
	pub good: String,
	pub waste: String,
	pub remark: String,
}

/// A field-level update to an existing job.
///
/// These are the only mutations after creation; neither touches `managerId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPatch {
	/// Manager toggles the completion checkbox.
	Completion { completed: bool, date: LedgerDate },
	/// Worker saves outcome values, which always completes the job.
	WorkerOutcome {
		good: String,
		waste: String,
		remark: String,
		date: LedgerDate,
	},
}

impl JobPatch {
	pub fn completion(completed: bool, today: &LedgerDate) -> Self {
		JobPatch::Completion {
			completed,
			date: today.clone(),
		}
	}

	pub fn worker_outcome(form: OutcomeForm, today: &LedgerDate) -> Self {
		JobPatch::WorkerOutcome {
			good: form.good.trim().to_string(),
			waste: form.waste.trim().to_string(),
			remark: form.remark.trim().to_string(),
			date: today.clone(),
		}
	}

	/// Whether the store should stamp `updatedAt` along with the fields.
	pub fn stamps_updated_at(&self) -> bool {
		matches!(self, JobPatch::WorkerOutcome { .. })
	}

	/// The fields written by this patch.
	pub fn fields(&self) -> Map<String, Value> {
		let mut fields = Map::new();
		match self {
			JobPatch::Completion { completed, date } => {
				fields.insert("completed".to_string(), Value::Bool(*completed));
				fields.insert("date".to_string(), Value::String(date.to_string()));
			}
			JobPatch::WorkerOutcome {
				good,
				waste,
				remark,
				date,
			} => {
				fields.insert("good".to_string(), Value::String(good.clone()));
				fields.insert("waste".to_string(), Value::String(waste.clone()));
				fields.insert("remark".to_string(), Value::String(remark.clone()));
				fields.insert("completed".to_string(), Value::Bool(true));
				fields.insert("date".to_string(), Value::String(date.to_string()));
			}
		}
		fields
	}
}
