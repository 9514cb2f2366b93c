// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-time control bindings.
//!
//! A view re-renders on every snapshot, but each interactive control is wired
//! at most once per activation. The flags live in the view's own state.

/// Interactive controls a view wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
	Search,
	Logout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlBindings {
	search: bool,
	logout: bool,
}

impl ControlBindings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Mark `control` as bound. Returns `true` only the first time.
	pub fn bind(&mut self, control: Control) -> bool {
		let slot = match control {
			Control::Search => &mut self.search,
			Control::Logout => &mut self.logout,
		};
		if *slot {
			return false;
		}
		*slot = true;
		true
	}

	pub fn is_bound(&self, control: Control) -> bool {
		match control {
			Control::Search => self.search,
			Control::Logout => self.logout,
		}
	}
}
