// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rendered tables.
//!
//! Each view renders its visible jobs into a table whose columns match the
//! page header exactly, with the action column last. Row indexes are assigned
//! here, at render time, and are never stored.

use serde::{Deserialize, Serialize};

use crate::ids::JobKey;
use crate::job::LedgerEntry;

pub const MANAGER_HEADERS: [&str; 11] = [
	"S.No",
	"Job No",
	"Job Name",
	"Form",
	"Worker",
	"Machine",
	"Qty",
	"Good",
	"Waste",
	"Completed",
	"Action",
];

pub const WORKER_HEADERS: [&str; 10] = [
	"S.No", "Job No", "Job Name", "Form", "Worker", "Qty", "Good", "Waste", "Remark", "Action",
];

pub const PAST_HEADERS: [&str; 12] = [
	"S.No", "Job No", "Job Name", "Form", "Worker", "Machine", "Qty", "Good", "Waste", "Remark",
	"Status", "Action",
];

/// Fields a worker may edit in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditableField {
	Good,
	Waste,
	Remark,
}

/// Per-row action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
	Delete,
	Save,
}

impl RowAction {
	pub fn label(&self) -> &'static str {
		match self {
			RowAction::Delete => "Delete",
			RowAction::Save => "Save",
		}
	}
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
	Text { text: String },
	Editable { field: EditableField, text: String },
	Checkbox { checked: bool },
	Action { action: RowAction },
}

impl Cell {
	pub fn text(text: impl Into<String>) -> Self {
		Cell::Text { text: text.into() }
	}

	/// The text a reader sees in the cell. Checkboxes have none; buttons
	/// show their label.
	pub fn inner_text(&self) -> &str {
		match self {
			Cell::Text { text } | Cell::Editable { text, .. } => text,
			Cell::Checkbox { .. } => "",
			Cell::Action { action } => action.label(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
	pub key: JobKey,
	/// 1-based position among the rendered rows of its table.
	pub index: usize,
	pub cells: Vec<Cell>,
	/// Cleared by the search filter; hidden rows are still rendered.
	pub visible: bool,
}

impl RenderedRow {
	fn new(key: JobKey, index: usize, cells: Vec<Cell>) -> Self {
		Self {
			key,
			index,
			cells,
			visible: true,
		}
	}

	/// Whole-row text used by the search filter, cells separated by tabs.
	pub fn text(&self) -> String {
		self.cells
			.iter()
			.map(Cell::inner_text)
			.collect::<Vec<_>>()
			.join("\t")
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTable {
	pub headers: Vec<String>,
	pub rows: Vec<RenderedRow>,
}

impl RenderedTable {
	fn with_headers(headers: &[&str]) -> Self {
		Self {
			headers: headers.iter().map(|h| h.to_string()).collect(),
			rows: Vec::new(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn row(&self, key: &JobKey) -> Option<&RenderedRow> {
		self.rows.iter().find(|row| &row.key == key)
	}

	/// Manager's live list.
	pub fn manager(entries: &[&LedgerEntry]) -> Self {
		let mut table = Self::with_headers(&MANAGER_HEADERS);
		for (i, entry) in entries.iter().enumerate() {
			let job = &entry.job;
			table.rows.push(RenderedRow::new(
				entry.key.clone(),
				i + 1,
				vec![
					Cell::text((i + 1).to_string()),
					Cell::text(&job.job_no),
					Cell::text(&job.job_name),
					Cell::text(&job.form_name),
					Cell::text(&job.worker_name),
					Cell::text(&job.machine_name),
					Cell::text(&job.quantity),
					Cell::text(&job.good),
					Cell::text(&job.waste),
					Cell::Checkbox {
						checked: job.completed,
					},
					Cell::Action {
						action: RowAction::Delete,
					},
				],
			));
		}
		table
	}

	/// Worker's live list, with good/waste/remark editable in place.
	pub fn worker(entries: &[&LedgerEntry]) -> Self {
		let mut table = Self::with_headers(&WORKER_HEADERS);
		for (i, entry) in entries.iter().enumerate() {
			let job = &entry.job;
			table.rows.push(RenderedRow::new(
				entry.key.clone(),
				i + 1,
				vec![
					Cell::text((i + 1).to_string()),
					Cell::text(&job.job_no),
					Cell::text(&job.job_name),
					Cell::text(&job.form_name),
					Cell::text(&job.worker_name),
					Cell::text(&job.quantity),
					Cell::Editable {
						field: EditableField::Good,
						text: job.good.clone(),
					},
					Cell::Editable {
						field: EditableField::Waste,
						text: job.waste.clone(),
					},
					Cell::Editable {
						field: EditableField::Remark,
						text: job.remark.clone(),
					},
					Cell::Action {
						action: RowAction::Save,
					},
				],
			));
		}
		table
	}

	/// One date group of the past-records page.
	pub fn past(entries: &[&LedgerEntry]) -> Self {
		let mut table = Self::with_headers(&PAST_HEADERS);
		for (i, entry) in entries.iter().enumerate() {
			let job = &entry.job;
			let status = if job.completed { "Completed" } else { "Pending" };
			table.rows.push(RenderedRow::new(
				entry.key.clone(),
				i + 1,
				vec![
					Cell::text((i + 1).to_string()),
					Cell::text(&job.job_no),
					Cell::text(&job.job_name),
					Cell::text(&job.form_name),
					Cell::text(&job.worker_name),
					Cell::text(&job.machine_name),
					Cell::text(&job.quantity),
					Cell::text(&job.good),
					Cell::text(&job.waste),
					Cell::text(&job.remark),
					Cell::text(status),
					Cell::Action {
						action: RowAction::Delete,
					},
				],
			));
		}
		table
	}
}

/// A date heading and its table on the past-records page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSection {
	pub date: String,
	pub table: RenderedTable,
}

/// The past-records page: one section per date, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PastRecordsPage {
	pub sections: Vec<DateSection>,
}

impl PastRecordsPage {
	pub const EMPTY_MESSAGE: &'static str = "No records yet.";

	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}

	/// Placeholder shown instead of tables when nothing is recorded.
	pub fn empty_message(&self) -> Option<&'static str> {
		self.is_empty().then_some(Self::EMPTY_MESSAGE)
	}

	pub fn section(&self, date: &str) -> Option<&DateSection> {
		self.sections.iter().find(|s| s.date == date)
	}

	/// Drop a row in place without waiting for the next snapshot.
	///
	/// Sibling indexes and the (possibly now empty) section are left as they
	/// were rendered. Returns whether a row was removed.
	pub fn remove_row(&mut self, key: &JobKey) -> bool {
		for section in &mut self.sections {
			if let Some(pos) = section.table.rows.iter().position(|row| &row.key == key) {
				section.table.rows.remove(pos);
				return true;
			}
		}
		false
	}

	pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut RenderedRow> {
		self.sections
			.iter_mut()
			.flat_map(|section| section.table.rows.iter_mut())
	}
}
