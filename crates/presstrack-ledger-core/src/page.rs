// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page identities and the page/role dispatch table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::Role;
use crate::view::ViewKind;

/// A page identity. Only the three protected pages run dashboard logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
	Login,
	Manager,
	Worker,
	Past,
}

impl Page {
	/// Resolve a page identity from a request path segment.
	///
	/// Unrecognised identities return `None` and run no dashboard logic.
	pub fn from_identity(identity: &str) -> Option<Self> {
		match identity.trim_end_matches(".html").to_ascii_lowercase().as_str() {
			"" | "index" => Some(Page::Login),
			"manager" => Some(Page::Manager),
			"worker" => Some(Page::Worker),
			"past" => Some(Page::Past),
			_ => None,
		}
	}

	pub fn path(&self) -> &'static str {
		match self {
			Page::Login => "/",
			Page::Manager => "/manager",
			Page::Worker => "/worker",
			Page::Past => "/past",
		}
	}

	pub fn is_protected(&self) -> bool {
		!matches!(self, Page::Login)
	}

	/// Landing page after sign-in.
	pub fn home_for(role: Role) -> Self {
		match role {
			Role::Manager => Page::Manager,
			Role::Worker => Page::Worker,
		}
	}

	/// Decide what a principal with `role` gets on this page.
	pub fn dispatch(&self, role: Role) -> Dispatch {
		match (self, role) {
			(Page::Login, _) => Dispatch::Login,
			(Page::Manager, Role::Manager) => Dispatch::Activate(ViewKind::Manager),
			(Page::Worker, Role::Worker) => Dispatch::Activate(ViewKind::Worker),
			(Page::Past, Role::Manager) => Dispatch::Activate(ViewKind::PastRecords),
			(_, role) => Dispatch::Denied {
				home: Page::home_for(role),
			},
		}
	}
}

impl fmt::Display for Page {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Page::Login => "login",
			Page::Manager => "manager",
			Page::Worker => "worker",
			Page::Past => "past",
		};
		f.write_str(name)
	}
}

/// Outcome of matching a page against a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
	Login,
	Activate(ViewKind),
	/// The role has no view on this page.
	Denied { home: Page },
}
