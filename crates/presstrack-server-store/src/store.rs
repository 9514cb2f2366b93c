// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The record store: one JSON tree, observed live.
//!
//! ```text
//!  write / update / remove / push
//!              │
//!              ▼
//!   ┌────────────────────┐   journal (optional)   ┌──────────────┐
//!   │  write_lock        │ ─────────────────────> │ SqliteJournal│
//!   │  clone, mutate     │                        └──────────────┘
//!   └─────────┬──────────┘
//!             │ send_replace
//!             ▼
//!   watch::Sender<Arc<Value>> ──> Subscription (per path) ──> views
//! ```
//!
//! Writes are serialized and last-write-wins. A write that the journal
//! refuses is not applied to the live tree.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{watch, Mutex};
use tracing::instrument;

use crate::error::{Result, StoreError};
use crate::journal::{JournalEntry, SqliteJournal};
use crate::path::StorePath;
use crate::subscription::{Snapshot, Subscription};
use crate::timestamp;
use crate::tree;

/// Live key-value tree with path subscriptions.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Read the current value at `path` once, without subscribing.
	async fn read_once(&self, path: &StorePath) -> Result<Snapshot>;

	/// Observe `path`; the handle yields the current value first.
	async fn subscribe(&self, path: &StorePath) -> Result<Subscription>;

	/// Replace the value at `path`. `null` removes it.
	async fn write(&self, path: &StorePath, value: Value) -> Result<()>;

	/// Replace only the named children of `path`.
	async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<()>;

	async fn remove(&self, path: &StorePath) -> Result<()>;

	/// Add `value` under a new time-ordered key and return the key.
	async fn push(&self, path: &StorePath, value: Value) -> Result<String>;

	async fn health_check(&self) -> Result<()>;
}

pub struct LiveRecordStore {
	tree: watch::Sender<Arc<Value>>,
	write_lock: Mutex<()>,
	journal: Option<SqliteJournal>,
	next_subscription_id: AtomicU64,
}

impl LiveRecordStore {
	/// A store that lives only in memory.
	pub fn in_memory() -> Self {
		Self::with_root(Value::Object(Map::new()), None)
	}

	/// A store journaled to SQLite, loaded from whatever the journal holds.
	pub async fn open(journal: SqliteJournal) -> Result<Self> {
		let root = journal.load().await?;
		Ok(Self::with_root(root, Some(journal)))
	}

	fn with_root(root: Value, journal: Option<SqliteJournal>) -> Self {
		let (tree, _) = watch::channel(Arc::new(root));
		Self {
			tree,
			write_lock: Mutex::new(()),
			journal,
			next_subscription_id: AtomicU64::new(1),
		}
	}

	pub fn is_journaled(&self) -> bool {
		self.journal.is_some()
	}

	/// Number of live subscriptions.
	pub fn subscriber_count(&self) -> usize {
		self.tree.receiver_count()
	}

	async fn mutate(&self, path: &StorePath, op: impl FnOnce(&mut Value) + Send) -> Result<()> {
		let _guard = self.write_lock.lock().await;

		let mut next = Value::clone(&self.tree.borrow());
		op(&mut next);

		if let Some(journal) = &self.journal {
			let entry = journal_entry(&next, path)?;
			journal.apply(&entry).await.map_err(|e| StoreError::WriteRejected {
				path: path.to_string(),
				reason: e.to_string(),
			})?;
		}

		self.tree.send_replace(Arc::new(next));
		Ok(())
	}
}

impl Default for LiveRecordStore {
	fn default() -> Self {
		Self::in_memory()
	}
}

fn journal_entry(next: &Value, path: &StorePath) -> Result<JournalEntry> {
	if let Some(record) = path.record() {
		let value = tree::get(next, &record).cloned();
		return Ok(JournalEntry::Record {
			path: record,
			value,
		});
	}
	let records = match tree::get(next, path) {
		None => Map::new(),
		Some(Value::Object(map)) => map.clone(),
		Some(_) => {
			return Err(StoreError::WriteRejected {
				path: path.to_string(),
				reason: "a collection must hold records".to_string(),
			})
		}
	};
	Ok(JournalEntry::Collection {
		name: path.last().to_string(),
		records,
	})
}

fn now_ms() -> i64 {
	Utc::now().timestamp_millis()
}

#[async_trait]
impl RecordStore for LiveRecordStore {
	#[instrument(skip(self), fields(path = %path))]
	async fn read_once(&self, path: &StorePath) -> Result<Snapshot> {
		let value = tree::get(&self.tree.borrow(), path).cloned();
		Ok(Snapshot {
			path: path.clone(),
			value,
		})
	}

	#[instrument(skip(self), fields(path = %path))]
	async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
		let id = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
		tracing::debug!(subscription_id = id, "subscription opened");
		Ok(Subscription::new(id, path.clone(), self.tree.subscribe()))
	}

	#[instrument(skip(self, value), fields(path = %path))]
	async fn write(&self, path: &StorePath, value: Value) -> Result<()> {
		let value = timestamp::resolve(value, now_ms());
		self.mutate(path, |root| tree::set(root, path, Some(value))).await
	}

	#[instrument(skip(self, fields), fields(path = %path, fields = fields.len()))]
	async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<()> {
		let fields = timestamp::resolve_map(fields, now_ms());
		self.mutate(path, |root| tree::update(root, path, fields)).await
	}

	#[instrument(skip(self), fields(path = %path))]
	async fn remove(&self, path: &StorePath) -> Result<()> {
		self.mutate(path, |root| tree::set(root, path, None)).await
	}

	#[instrument(skip(self, value), fields(path = %path))]
	async fn push(&self, path: &StorePath, value: Value) -> Result<String> {
		let key = uuid7::uuid7().to_string();
		let child = path.child(&key)?;
		self.write(&child, value).await?;
		tracing::debug!(key = %key, "record pushed");
		Ok(key)
	}

	async fn health_check(&self) -> Result<()> {
		match &self.journal {
			Some(journal) => journal.ping().await,
			None => Ok(()),
		}
	}
}
