// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the presstrack job ledger.
//!
//! This crate holds the shared data contract between the record store and the
//! three role-scoped views:
//!
//! - [`Job`] and [`UserProfile`] record shapes as they live in the store
//! - [`RoleContext`], the pure projection `(all jobs, role) -> visible rows`
//! - [`RenderedTable`] and [`PastRecordsPage`], the rendered form of each view
//! - [`SearchFilter`], [`ControlBindings`] and [`ExportTable`] helpers
//!
//! Nothing here touches the network or the store. Every view re-derives its
//! whole state from the latest snapshot, so projections are plain functions
//! over a decoded ledger.

pub mod controls;
pub mod date;
pub mod error;
pub mod export;
pub mod ids;
pub mod job;
pub mod page;
pub mod profile;
pub mod render;
pub mod search;
pub mod sse;
pub mod view;

pub use controls::{Control, ControlBindings};
pub use date::{parse_ledger_date, LedgerCalendar, LedgerDate, UNKNOWN_DATE};
pub use error::{LedgerError, Result};
pub use export::{export_file_name, export_title, ExportTable};
pub use ids::{JobKey, PrincipalId};
pub use job::{decode_ledger, Job, JobForm, JobPatch, LedgerEntry, OutcomeForm};
pub use page::{Dispatch, Page};
pub use profile::{validate_sign_up, ProfileIntegrityError, Role, UserProfile};
pub use render::{
	Cell, DateSection, EditableField, PastRecordsPage, RenderedRow, RenderedTable, RowAction,
	MANAGER_HEADERS, PAST_HEADERS, WORKER_HEADERS,
};
pub use search::SearchFilter;
pub use sse::{FrameData, HeartbeatData, LedgerStreamEvent, SessionEndedData};
pub use view::{group_by_date, RoleContext, ViewFrame, ViewKind};

/// Store path of the job collection.
pub const JOBS_PATH: &str = "jobs";

/// Store path of the profile collection.
pub const USERS_PATH: &str = "users";
