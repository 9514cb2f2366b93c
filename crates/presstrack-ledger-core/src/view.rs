// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-scoped projections of the job ledger.
//!
//! Every client receives the whole job collection; what it shows is decided
//! here, as a pure function of the ledger and the role context:
//!
//! ```text
//! Manager       managerId == self  AND date == today  AND !completed
//! Worker        machineName == own machine            AND !completed
//! PastRecords   managerId == self  (every date, every state)
//! ```
//!
//! The same predicate gates mutations: a row can only be changed through a
//! view in which it is visible.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::date::{parse_ledger_date, LedgerDate, UNKNOWN_DATE};
use crate::ids::PrincipalId;
use crate::job::{Job, LedgerEntry};
use crate::render::{DateSection, PastRecordsPage, RenderedTable};
use crate::search::SearchFilter;

/// The three dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
	Manager,
	Worker,
	PastRecords,
}

impl ViewKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ViewKind::Manager => "manager",
			ViewKind::Worker => "worker",
			ViewKind::PastRecords => "past_records",
		}
	}
}

/// Who is looking, and from which view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleContext {
	Manager {
		principal: PrincipalId,
		today: LedgerDate,
	},
	Worker {
		machine_name: String,
	},
	PastRecords {
		principal: PrincipalId,
	},
}

impl RoleContext {
	pub fn kind(&self) -> ViewKind {
		match self {
			RoleContext::Manager { .. } => ViewKind::Manager,
			RoleContext::Worker { .. } => ViewKind::Worker,
			RoleContext::PastRecords { .. } => ViewKind::PastRecords,
		}
	}

	/// Whether `job` is a row of this view.
	pub fn admits(&self, job: &Job) -> bool {
		match self {
			RoleContext::Manager { principal, today } => {
				job.is_owned_by(principal) && job.touched_on(today) && !job.completed
			}
			RoleContext::Worker { machine_name } => {
				&job.machine_name == machine_name && !job.completed
			}
			RoleContext::PastRecords { principal } => job.is_owned_by(principal),
		}
	}

	/// Visible entries, in ledger order.
	pub fn visible<'a>(&self, ledger: &'a [LedgerEntry]) -> Vec<&'a LedgerEntry> {
		ledger.iter().filter(|e| self.admits(&e.job)).collect()
	}

	/// Render this view from scratch.
	pub fn render(&self, ledger: &[LedgerEntry]) -> ViewFrame {
		let visible = self.visible(ledger);
		match self {
			RoleContext::Manager { today, .. } => ViewFrame::Manager {
				current_date: today.to_string(),
				table: RenderedTable::manager(&visible),
			},
			RoleContext::Worker { machine_name } => ViewFrame::Worker {
				machine_name: if machine_name.is_empty() {
					"N/A".to_string()
				} else {
					machine_name.clone()
				},
				table: RenderedTable::worker(&visible),
			},
			RoleContext::PastRecords { .. } => {
				let sections = group_by_date(&visible)
					.into_iter()
					.map(|(date, entries)| DateSection {
						date,
						table: RenderedTable::past(&entries),
					})
					.collect();
				ViewFrame::PastRecords {
					page: PastRecordsPage { sections },
				}
			}
		}
	}
}

/// Group entries by their `date`, most recent group first.
///
/// Entries without a date go under [`UNKNOWN_DATE`]. Groups whose date cannot
/// be parsed sort after every dated group, in first-seen order. Entries keep
/// ledger order inside a group.
pub fn group_by_date<'a>(entries: &[&'a LedgerEntry]) -> Vec<(String, Vec<&'a LedgerEntry>)> {
	let mut groups: Vec<(String, Vec<&'a LedgerEntry>)> = Vec::new();
	for entry in entries {
		let label = match entry.job.date.as_ref().map(LedgerDate::as_str) {
			Some(date) if !date.is_empty() => date.to_string(),
			_ => UNKNOWN_DATE.to_string(),
		};
		match groups.iter_mut().find(|(date, _)| *date == label) {
			Some((_, members)) => members.push(entry),
			None => groups.push((label, vec![entry])),
		}
	}

	groups.sort_by(|(a, _), (b, _)| {
		match (parse_ledger_date(a), parse_ledger_date(b)) {
			(Some(a), Some(b)) => b.cmp(&a),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		}
	});
	groups
}

/// A fully rendered view, as pushed to clients on every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewFrame {
	Manager {
		current_date: String,
		table: RenderedTable,
	},
	Worker {
		machine_name: String,
		table: RenderedTable,
	},
	PastRecords {
		page: PastRecordsPage,
	},
}

impl ViewFrame {
	pub fn kind(&self) -> ViewKind {
		match self {
			ViewFrame::Manager { .. } => ViewKind::Manager,
			ViewFrame::Worker { .. } => ViewKind::Worker,
			ViewFrame::PastRecords { .. } => ViewKind::PastRecords,
		}
	}

	/// Apply a search across every rendered row of the frame.
	pub fn apply_search(&mut self, filter: &SearchFilter) {
		match self {
			ViewFrame::Manager { table, .. } | ViewFrame::Worker { table, .. } => {
				filter.apply(table.rows.iter_mut())
			}
			ViewFrame::PastRecords { page } => filter.apply(page.rows_mut()),
		}
	}

	/// Number of rendered rows, hidden ones included.
	pub fn row_count(&self) -> usize {
		match self {
			ViewFrame::Manager { table, .. } | ViewFrame::Worker { table, .. } => table.rows.len(),
			ViewFrame::PastRecords { page } => page.sections.iter().map(|s| s.table.rows.len()).sum(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ids::JobKey;
	use proptest::prelude::*;

	const TODAY: &str = "10/19/2026";

	fn job(manager: &str, machine: &str, date: Option<&str>, completed: bool) -> Job {
		Job {
			job_no: format!("{manager}-{machine}"),
			machine_name: machine.to_string(),
			manager_id: Some(PrincipalId::new(manager)),
			date: date.map(LedgerDate::new),
			completed,
			..Default::default()
		}
	}

	fn ledger(jobs: Vec<Job>) -> Vec<LedgerEntry> {
		jobs.into_iter()
			.enumerate()
			.map(|(i, job)| LedgerEntry {
				key: JobKey::new(format!("k{i:04}")),
				job,
			})
			.collect()
	}

	fn manager(id: &str) -> RoleContext {
		RoleContext::Manager {
			principal: PrincipalId::new(id),
			today: LedgerDate::new(TODAY),
		}
	}

	#[test]
	fn test_manager_sees_only_own_open_jobs_touched_today() {
		let ledger = ledger(vec![
			job("m1", "M1", Some(TODAY), false),
			job("m1", "M1", Some("10/18/2026"), false),
			job("m1", "M1", Some(TODAY), true),
			job("m2", "M1", Some(TODAY), false),
			job("m1", "M2", Some(TODAY), false),
		]);
		let visible = manager("m1").visible(&ledger);
		let keys: Vec<&str> = visible.iter().map(|e| e.key.as_str()).collect();
		assert_eq!(keys, vec!["k0000", "k0004"]);
	}

	#[test]
	fn test_worker_ignores_date_and_manager() {
		let ledger = ledger(vec![
			job("m1", "M1", Some("1/1/2020"), false),
			job("m2", "M1", None, false),
			job("m1", "M1", Some(TODAY), true),
			job("m1", "m1", Some(TODAY), false),
		]);
		let ctx = RoleContext::Worker {
			machine_name: "M1".to_string(),
		};
		let keys: Vec<&str> = ctx.visible(&ledger).iter().map(|e| e.key.as_str()).collect();
		assert_eq!(keys, vec!["k0000", "k0001"]);
	}

	#[test]
	fn test_past_records_include_pending_jobs() {
		let ledger = ledger(vec![
			job("m1", "M1", Some(TODAY), false),
			job("m1", "M1", Some("10/18/2026"), true),
			job("m2", "M1", Some(TODAY), true),
		]);
		let ctx = RoleContext::PastRecords {
			principal: PrincipalId::new("m1"),
		};
		assert_eq!(ctx.visible(&ledger).len(), 2);
	}

	#[test]
	fn test_grouping_most_recent_first_unknown_last() {
		let ledger = ledger(vec![
			job("m1", "M1", None, true),
			job("m1", "M1", Some("10/18/2026"), true),
			job("m1", "M1", Some("garbage"), true),
			job("m1", "M1", Some(TODAY), true),
			job("m1", "M1", Some("10/18/2026"), false),
			job("m1", "M1", Some(""), true),
		]);
		let refs: Vec<&LedgerEntry> = ledger.iter().collect();
		let groups = group_by_date(&refs);
		let labels: Vec<&str> = groups.iter().map(|(d, _)| d.as_str()).collect();
		assert_eq!(labels, vec![TODAY, "10/18/2026", "Unknown", "garbage"]);
		assert_eq!(groups[1].1.len(), 2);
		assert_eq!(groups[2].1.len(), 2);
	}

	#[test]
	fn test_past_render_indexes_per_group() {
		let ledger = ledger(vec![
			job("m1", "M1", Some(TODAY), true),
			job("m1", "M1", Some("10/18/2026"), true),
			job("m1", "M1", Some(TODAY), true),
		]);
		let frame = RoleContext::PastRecords {
			principal: PrincipalId::new("m1"),
		}
		.render(&ledger);
		let ViewFrame::PastRecords { page } = frame else {
			panic!("expected past records frame");
		};
		assert_eq!(page.sections.len(), 2);
		let today = page.section(TODAY).unwrap();
		let indexes: Vec<usize> = today.table.rows.iter().map(|r| r.index).collect();
		assert_eq!(indexes, vec![1, 2]);
		assert_eq!(page.section("10/18/2026").unwrap().table.rows[0].index, 1);
	}

	#[test]
	fn test_frame_search_spans_all_groups() {
		let ledger = ledger(vec![
			job("m1", "M1", Some(TODAY), true),
			job("m1", "M2", Some("10/18/2026"), true),
		]);
		let mut frame = RoleContext::PastRecords {
			principal: PrincipalId::new("m1"),
		}
		.render(&ledger);
		frame.apply_search(&SearchFilter::new("m2"));
		let ViewFrame::PastRecords { page } = &frame else {
			panic!("expected past records frame");
		};
		assert!(!page.sections[0].table.rows[0].visible);
		assert!(page.sections[1].table.rows[0].visible);
		assert_eq!(frame.row_count(), 2);
	}

	#[test]
	fn test_worker_frame_machine_label() {
		let frame = RoleContext::Worker {
			machine_name: String::new(),
		}
		.render(&[]);
		assert!(matches!(frame, ViewFrame::Worker { ref machine_name, .. } if machine_name == "N/A"));
	}

	fn arb_job() -> impl Strategy<Value = Job> {
		(
			prop_oneof![Just("m1"), Just("m2")],
			prop_oneof![Just("M1"), Just("M2")],
			prop_oneof![
				Just(None),
				Just(Some("10/19/2026")),
				Just(Some("10/18/2026")),
				Just(Some("1/2/2025")),
				Just(Some("n/a")),
			],
			any::<bool>(),
		)
			.prop_map(|(m, machine, date, completed)| job(m, machine, date, completed))
	}

	proptest! {
		#[test]
		fn prop_manager_view_matches_predicate(jobs in prop::collection::vec(arb_job(), 0..40)) {
			let ledger = ledger(jobs);
			let ctx = manager("m1");
			let visible = ctx.visible(&ledger);
			for entry in &ledger {
				let expected = entry.job.manager_id.as_ref().map(PrincipalId::as_str) == Some("m1")
					&& entry.job.date.as_ref().map(LedgerDate::as_str) == Some(TODAY)
					&& !entry.job.completed;
				let shown = visible.iter().any(|v| v.key == entry.key);
				prop_assert_eq!(expected, shown);
			}
		}

		#[test]
		fn prop_worker_view_independent_of_date(jobs in prop::collection::vec(arb_job(), 0..40)) {
			let ledger = ledger(jobs);
			let ctx = RoleContext::Worker { machine_name: "M1".to_string() };
			let visible = ctx.visible(&ledger);
			for entry in &ledger {
				let expected = entry.job.machine_name == "M1" && !entry.job.completed;
				prop_assert_eq!(expected, visible.iter().any(|v| v.key == entry.key));
			}
		}

		#[test]
		fn prop_groups_descend_with_unparseable_last(jobs in prop::collection::vec(arb_job(), 0..40)) {
			let ledger = ledger(jobs);
			let refs: Vec<&LedgerEntry> = ledger.iter().collect();
			let groups = group_by_date(&refs);
			let parsed: Vec<Option<chrono::NaiveDate>> =
				groups.iter().map(|(d, _)| parse_ledger_date(d)).collect();

			let first_unparsed = parsed.iter().position(Option::is_none).unwrap_or(parsed.len());
			prop_assert!(parsed[first_unparsed..].iter().all(Option::is_none));
			for pair in parsed[..first_unparsed].windows(2) {
				prop_assert!(pair[0] > pair[1]);
			}
			let total: usize = groups.iter().map(|(_, m)| m.len()).sum();
			prop_assert_eq!(total, ledger.len());
		}
	}
}
