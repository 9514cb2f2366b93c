// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite journal behind the live tree.
//!
//! The tree is persisted at record granularity: one row per `collection/key`
//! holding the record's JSON. Collection-level writes replace every row of
//! the collection in one transaction.

use std::str::FromStr;

use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use tracing::instrument;

use crate::error::{Result, StoreError};
use crate::path::StorePath;

/// Create a SqlitePool with WAL mode and common settings.
#[instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| StoreError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!("store pool created");
	Ok(pool)
}

/// Persisted change to one collection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum JournalEntry {
	/// Upsert or delete one record.
	Record { path: StorePath, value: Option<Value> },
	/// Replace a whole collection.
	Collection {
		name: String,
		records: Map<String, Value>,
	},
}

#[derive(Clone)]
pub struct SqliteJournal {
	pool: SqlitePool,
}

impl SqliteJournal {
	pub async fn new(pool: SqlitePool) -> Result<Self> {
		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS records (
				path TEXT PRIMARY KEY,
				collection TEXT NOT NULL,
				value TEXT NOT NULL
			)
			"#,
		)
		.execute(&pool)
		.await?;
		sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection)")
			.execute(&pool)
			.await?;
		Ok(Self { pool })
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Rebuild the tree from every journaled record.
	#[instrument(skip(self))]
	pub(crate) async fn load(&self) -> Result<Value> {
		let rows: Vec<(String, String)> = sqlx::query_as("SELECT path, value FROM records ORDER BY path")
			.fetch_all(&self.pool)
			.await?;

		let mut root = Value::Object(Map::new());
		for (path, value) in &rows {
			let path = StorePath::parse(path)?;
			let value: Value = serde_json::from_str(value)?;
			crate::tree::set(&mut root, &path, Some(value));
		}
		tracing::info!(records = rows.len(), "store journal loaded");
		Ok(root)
	}

	#[instrument(skip(self, entry))]
	pub(crate) async fn apply(&self, entry: &JournalEntry) -> Result<()> {
		match entry {
			JournalEntry::Record { path, value } => {
				let collection = path.segments()[0].as_str();
				match value {
					Some(value) => {
						sqlx::query(
							r#"
							INSERT INTO records (path, collection, value) VALUES (?, ?, ?)
							ON CONFLICT(path) DO UPDATE SET value = excluded.value
							"#,
						)
						.bind(path.to_string())
						.bind(collection)
						.bind(serde_json::to_string(value)?)
						.execute(&self.pool)
						.await?;
					}
					None => {
						sqlx::query("DELETE FROM records WHERE path = ?")
							.bind(path.to_string())
							.execute(&self.pool)
							.await?;
					}
				}
			}
			JournalEntry::Collection { name, records } => {
				let mut tx = self.pool.begin().await?;
				sqlx::query("DELETE FROM records WHERE collection = ?")
					.bind(name)
					.execute(&mut *tx)
					.await?;
				for (key, value) in records {
					sqlx::query("INSERT INTO records (path, collection, value) VALUES (?, ?, ?)")
						.bind(format!("{name}/{key}"))
						.bind(name)
						.bind(serde_json::to_string(value)?)
						.execute(&mut *tx)
						.await?;
				}
				tx.commit().await?;
			}
		}
		Ok(())
	}

	pub(crate) async fn ping(&self) -> Result<()> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	async fn journal() -> SqliteJournal {
		let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
		SqliteJournal::new(pool).await.unwrap()
	}

	#[tokio::test]
	async fn test_record_upsert_and_delete() {
		let journal = journal().await;
		let path = StorePath::parse("jobs/k1").unwrap();
		journal
			.apply(&JournalEntry::Record {
				path: path.clone(),
				value: Some(json!({"jobNo": "J1"})),
			})
			.await
			.unwrap();
		journal
			.apply(&JournalEntry::Record {
				path: path.clone(),
				value: Some(json!({"jobNo": "J2"})),
			})
			.await
			.unwrap();
		assert_eq!(journal.load().await.unwrap(), json!({"jobs": {"k1": {"jobNo": "J2"}}}));

		journal
			.apply(&JournalEntry::Record { path, value: None })
			.await
			.unwrap();
		assert_eq!(journal.load().await.unwrap(), json!({}));
	}

	#[tokio::test]
	async fn test_collection_replace() {
		let journal = journal().await;
		journal
			.apply(&JournalEntry::Record {
				path: StorePath::parse("jobs/old").unwrap(),
				value: Some(json!({"a": 1})),
			})
			.await
			.unwrap();
		journal
			.apply(&JournalEntry::Record {
				path: StorePath::parse("users/u1").unwrap(),
				value: Some(json!({"role": "manager"})),
			})
			.await
			.unwrap();

		let mut records = Map::new();
		records.insert("new".to_string(), json!({"b": 2}));
		journal
			.apply(&JournalEntry::Collection {
				name: "jobs".to_string(),
				records,
			})
			.await
			.unwrap();

		assert_eq!(
			journal.load().await.unwrap(),
			json!({"jobs": {"new": {"b": 2}}, "users": {"u1": {"role": "manager"}}})
		);
	}
}
