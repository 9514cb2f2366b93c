// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Extraction of a rendered date group for export.

use serde::{Deserialize, Serialize};

use crate::render::{Cell, RenderedTable};

/// Plain-text snapshot of a rendered table, minus the trailing action column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
	pub headers: Vec<String>,
	pub rows: Vec<Vec<String>>,
}

impl ExportTable {
	/// Take every rendered row in rendered order. Rows hidden by a search are
	/// still part of the group and are exported.
	pub fn from_rendered(table: &RenderedTable) -> Self {
		let headers = drop_last(table.headers.clone());
		let rows = table
			.rows
			.iter()
			.map(|row| drop_last(row.cells.iter().map(Cell::inner_text).map(str::to_string).collect()))
			.collect();
		Self { headers, rows }
	}
}

fn drop_last(mut items: Vec<String>) -> Vec<String> {
	items.pop();
	items
}

/// Download name of an exported date group.
pub fn export_file_name(date: &str) -> String {
	format!("past-records-{date}.pdf")
}

/// Title printed above an exported date group.
pub fn export_title(date: &str) -> String {
	format!("Past Records - {date}")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ids::JobKey;
	use crate::job::{Job, LedgerEntry};
	use crate::render::PAST_HEADERS;
	use crate::search::SearchFilter;

	fn entries() -> Vec<LedgerEntry> {
		["J1", "J2", "J3"]
			.iter()
			.enumerate()
			.map(|(i, no)| LedgerEntry {
				key: JobKey::new(format!("k{i}")),
				job: Job {
					job_no: no.to_string(),
					remark: format!("remark {i}"),
					completed: i != 1,
					..Default::default()
				},
			})
			.collect()
	}

	#[test]
	fn test_drops_action_column() {
		let entries = entries();
		let refs: Vec<&LedgerEntry> = entries.iter().collect();
		let table = RenderedTable::past(&refs);
		let export = ExportTable::from_rendered(&table);

		assert_eq!(export.headers.len(), PAST_HEADERS.len() - 1);
		assert_eq!(export.headers.last().map(String::as_str), Some("Status"));
		for row in &export.rows {
			assert_eq!(row.len(), export.headers.len());
			assert!(!row.contains(&"Delete".to_string()));
		}
	}

	#[test]
	fn test_keeps_rendered_order() {
		let entries = entries();
		let refs: Vec<&LedgerEntry> = entries.iter().collect();
		let mut table = RenderedTable::past(&refs);
		SearchFilter::new("J2").apply(table.rows.iter_mut());
		let export = ExportTable::from_rendered(&table);

		let job_nos: Vec<&str> = export.rows.iter().map(|r| r[1].as_str()).collect();
		assert_eq!(job_nos, vec!["J1", "J2", "J3"]);
		assert_eq!(export.rows[1][10], "Pending");
	}

	#[test]
	fn test_file_name_and_title() {
		assert_eq!(export_file_name("10/19/2026"), "past-records-10/19/2026.pdf");
		assert_eq!(export_title("10/19/2026"), "Past Records - 10/19/2026");
	}
}
