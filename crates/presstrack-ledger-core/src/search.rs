// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Row search.
//!
//! Search only toggles row visibility on an already rendered table. It never
//! narrows the subscription or the ledger underneath.

use crate::render::RenderedRow;

/// Case-insensitive substring filter over a row's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
	term: String,
}

impl SearchFilter {
	pub fn new(term: &str) -> Self {
		Self {
			term: term.to_lowercase(),
		}
	}

	pub fn term(&self) -> &str {
		&self.term
	}

	pub fn is_empty(&self) -> bool {
		self.term.is_empty()
	}

	pub fn matches(&self, text: &str) -> bool {
		text.to_lowercase().contains(&self.term)
	}

	/// Show matching rows and hide the rest.
	pub fn apply<'a>(&self, rows: impl IntoIterator<Item = &'a mut RenderedRow>) {
		for row in rows {
			row.visible = self.matches(&row.text());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ids::JobKey;
	use crate::job::{Job, LedgerEntry};
	use crate::render::RenderedTable;

	fn table() -> RenderedTable {
		let a = LedgerEntry {
			key: JobKey::new("k1"),
			job: Job {
				job_no: "J1".to_string(),
				worker_name: "Alice".to_string(),
				..Default::default()
			},
		};
		let b = LedgerEntry {
			key: JobKey::new("k2"),
			job: Job {
				job_no: "J2".to_string(),
				worker_name: "Bob".to_string(),
				..Default::default()
			},
		};
		RenderedTable::manager(&[&a, &b])
	}

	#[test]
	fn test_case_insensitive_match() {
		let mut table = table();
		SearchFilter::new("ALICE").apply(table.rows.iter_mut());
		assert!(table.rows[0].visible);
		assert!(!table.rows[1].visible);
	}

	#[test]
	fn test_empty_term_shows_everything() {
		let mut table = table();
		SearchFilter::new("bob").apply(table.rows.iter_mut());
		SearchFilter::new("").apply(table.rows.iter_mut());
		assert!(table.rows.iter().all(|r| r.visible));
	}

	#[test]
	fn test_search_keeps_rows_and_indexes() {
		let mut table = table();
		SearchFilter::new("zzz").apply(table.rows.iter_mut());
		assert_eq!(table.rows.len(), 2);
		assert_eq!(table.rows[1].index, 2);
	}

	#[test]
	fn test_button_label_is_searchable() {
		let mut table = table();
		SearchFilter::new("delete").apply(table.rows.iter_mut());
		assert!(table.rows.iter().all(|r| r.visible));
	}
}
