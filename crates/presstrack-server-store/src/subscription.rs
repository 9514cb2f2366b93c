// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::path::StorePath;
use crate::tree;

/// The value at a subscribed path at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
	pub path: StorePath,
	pub value: Option<Value>,
}

impl Snapshot {
	pub fn exists(&self) -> bool {
		self.value.is_some()
	}

	pub fn value(&self) -> Option<&Value> {
		self.value.as_ref()
	}
}

/// An owned, live view of one path.
///
/// The first call to [`Subscription::next`] yields the current value; every
/// later call waits until the value at the path differs from the last one
/// delivered. Changes elsewhere in the tree are not reported. Once released,
/// the handle never yields again.
pub struct Subscription {
	id: u64,
	path: StorePath,
	rx: Option<watch::Receiver<Arc<Value>>>,
	last: Option<Option<Value>>,
}

impl Subscription {
	pub(crate) fn new(id: u64, path: StorePath, rx: watch::Receiver<Arc<Value>>) -> Self {
		Self {
			id,
			path,
			rx: Some(rx),
			last: None,
		}
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn path(&self) -> &StorePath {
		&self.path
	}

	pub fn is_active(&self) -> bool {
		self.rx.is_some()
	}

	/// Wait for the next snapshot. Returns `None` once the subscription is
	/// released or the store is gone.
	pub async fn next(&mut self) -> Option<Snapshot> {
		loop {
			let rx = self.rx.as_mut()?;
			if self.last.is_some() && rx.changed().await.is_err() {
				self.release();
				return None;
			}

			let current = {
				let root = rx.borrow_and_update();
				tree::get(&root, &self.path).cloned()
			};
			if self.last.as_ref() == Some(&current) {
				continue;
			}
			self.last = Some(current.clone());
			return Some(Snapshot {
				path: self.path.clone(),
				value: current,
			});
		}
	}

	/// Stop listening. Idempotent.
	pub fn release(&mut self) {
		if self.rx.take().is_some() {
			tracing::debug!(subscription_id = self.id, path = %self.path, "subscription released");
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.release();
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("id", &self.id)
			.field("path", &self.path)
			.field("active", &self.is_active())
			.finish()
	}
}
