// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository layer for accounts, sessions and reset tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use presstrack_ledger_core::PrincipalId;

use crate::error::{AuthError, Result};
use crate::types::{Account, Persistence, ResetRecord, SessionId, SessionRecord};

#[async_trait]
pub trait AccountRepository: Send + Sync {
	// Accounts
	async fn create_account(&self, account: &Account) -> Result<()>;
	async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;
	async fn find_account_by_id(&self, id: &PrincipalId) -> Result<Option<Account>>;
	async fn update_password_hash(&self, id: &PrincipalId, password_hash: &str) -> Result<()>;

	// Sessions
	async fn create_session(&self, session: &SessionRecord) -> Result<()>;
	async fn find_session(&self, token_hash: &str) -> Result<Option<SessionRecord>>;
	async fn delete_session(&self, token_hash: &str) -> Result<Option<SessionRecord>>;
	async fn delete_sessions_for(&self, principal: &PrincipalId) -> Result<Vec<SessionRecord>>;
	async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64>;

	// Password reset
	async fn create_reset(&self, reset: &ResetRecord) -> Result<()>;
	/// Remove and return the reset record, so a token works at most once.
	async fn take_reset(&self, token_hash: &str) -> Result<Option<ResetRecord>>;

	async fn health_check(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct SqliteAccountRepository {
	pool: SqlitePool,
}

impl SqliteAccountRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub async fn run_migrations(&self) -> Result<()> {
		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS accounts (
				id TEXT PRIMARY KEY,
				email TEXT NOT NULL UNIQUE,
				password_hash TEXT NOT NULL,
				created_at TEXT NOT NULL
			)
			"#,
		)
		.execute(&self.pool)
		.await?;

		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS sessions (
				id TEXT PRIMARY KEY,
				token_hash TEXT NOT NULL UNIQUE,
				principal_id TEXT NOT NULL,
				persistence TEXT NOT NULL,
				created_at TEXT NOT NULL,
				expires_at TEXT NOT NULL
			)
			"#,
		)
		.execute(&self.pool)
		.await?;

		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS password_resets (
				token_hash TEXT PRIMARY KEY,
				principal_id TEXT NOT NULL,
				expires_at TEXT NOT NULL
			)
			"#,
		)
		.execute(&self.pool)
		.await?;

		Ok(())
	}
}

#[derive(sqlx::FromRow)]
struct AccountRow {
	id: String,
	email: String,
	password_hash: String,
	created_at: String,
}

impl TryFrom<AccountRow> for Account {
	type Error = AuthError;

	fn try_from(row: AccountRow) -> Result<Self> {
		Ok(Account {
			id: PrincipalId::new(row.id),
			email: row.email,
			password_hash: row.password_hash,
			created_at: parse_time(&row.created_at)?,
		})
	}
}

#[derive(sqlx::FromRow)]
struct SessionRow {
	id: String,
	token_hash: String,
	principal_id: String,
	persistence: String,
	created_at: String,
	expires_at: String,
}

impl TryFrom<SessionRow> for SessionRecord {
	type Error = AuthError;

	fn try_from(row: SessionRow) -> Result<Self> {
		Ok(SessionRecord {
			id: row
				.id
				.parse()
				.map_err(|e| AuthError::Internal(format!("invalid session id: {e}")))?,
			token_hash: row.token_hash,
			principal: PrincipalId::new(row.principal_id),
			persistence: row.persistence.parse()?,
			created_at: parse_time(&row.created_at)?,
			expires_at: parse_time(&row.expires_at)?,
		})
	}
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| AuthError::Internal(format!("invalid timestamp {raw:?}: {e}")))
}

const SESSION_COLUMNS: &str = "id, token_hash, principal_id, persistence, created_at, expires_at";

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
	#[instrument(skip(self, account), fields(principal = %account.id))]
	async fn create_account(&self, account: &Account) -> Result<()> {
		let result = sqlx::query(
			"INSERT INTO accounts (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
		)
		.bind(account.id.as_str())
		.bind(&account.email)
		.bind(&account.password_hash)
		.bind(account.created_at.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => Ok(()),
			Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AuthError::EmailInUse),
			Err(e) => Err(e.into()),
		}
	}

	#[instrument(skip(self, email))]
	async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
		let row = sqlx::query_as::<_, AccountRow>(
			"SELECT id, email, password_hash, created_at FROM accounts WHERE email = ?",
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;
		row.map(TryInto::try_into).transpose()
	}

	#[instrument(skip(self), fields(principal = %id))]
	async fn find_account_by_id(&self, id: &PrincipalId) -> Result<Option<Account>> {
		let row = sqlx::query_as::<_, AccountRow>(
			"SELECT id, email, password_hash, created_at FROM accounts WHERE id = ?",
		)
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;
		row.map(TryInto::try_into).transpose()
	}

	#[instrument(skip(self, password_hash), fields(principal = %id))]
	async fn update_password_hash(&self, id: &PrincipalId, password_hash: &str) -> Result<()> {
		sqlx::query("UPDATE accounts SET password_hash = ? WHERE id = ?")
			.bind(password_hash)
			.bind(id.as_str())
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	#[instrument(skip(self, session), fields(session_id = %session.id, principal = %session.principal))]
	async fn create_session(&self, session: &SessionRecord) -> Result<()> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, token_hash, principal_id, persistence, created_at, expires_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(&session.token_hash)
		.bind(session.principal.as_str())
		.bind(session.persistence.as_str())
		.bind(session.created_at.to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;
		Ok(())
	}

	#[instrument(skip_all)]
	async fn find_session(&self, token_hash: &str) -> Result<Option<SessionRecord>> {
		let row = sqlx::query_as::<_, SessionRow>(&format!(
			"SELECT {SESSION_COLUMNS} FROM sessions WHERE token_hash = ?"
		))
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;
		row.map(TryInto::try_into).transpose()
	}

	#[instrument(skip_all)]
	async fn delete_session(&self, token_hash: &str) -> Result<Option<SessionRecord>> {
		let row = sqlx::query_as::<_, SessionRow>(&format!(
			"DELETE FROM sessions WHERE token_hash = ? RETURNING {SESSION_COLUMNS}"
		))
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;
		row.map(TryInto::try_into).transpose()
	}

	#[instrument(skip(self), fields(principal = %principal))]
	async fn delete_sessions_for(&self, principal: &PrincipalId) -> Result<Vec<SessionRecord>> {
		let rows = sqlx::query_as::<_, SessionRow>(&format!(
			"DELETE FROM sessions WHERE principal_id = ? RETURNING {SESSION_COLUMNS}"
		))
		.bind(principal.as_str())
		.fetch_all(&self.pool)
		.await?;
		rows.into_iter().map(TryInto::try_into).collect()
	}

	#[instrument(skip(self))]
	async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
		let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
			.bind(now.to_rfc3339())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected())
	}

	#[instrument(skip(self, reset), fields(principal = %reset.principal))]
	async fn create_reset(&self, reset: &ResetRecord) -> Result<()> {
		sqlx::query(
			"INSERT INTO password_resets (token_hash, principal_id, expires_at) VALUES (?, ?, ?)",
		)
		.bind(&reset.token_hash)
		.bind(reset.principal.as_str())
		.bind(reset.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;
		Ok(())
	}

	#[instrument(skip_all)]
	async fn take_reset(&self, token_hash: &str) -> Result<Option<ResetRecord>> {
		let row: Option<(String, String, String)> = sqlx::query_as(
			"DELETE FROM password_resets WHERE token_hash = ? RETURNING token_hash, principal_id, expires_at",
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|(token_hash, principal, expires_at)| {
			Ok(ResetRecord {
				token_hash,
				principal: PrincipalId::new(principal),
				expires_at: parse_time(&expires_at)?,
			})
		})
		.transpose()
	}

	async fn health_check(&self) -> Result<()> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Duration;

	async fn repo() -> SqliteAccountRepository {
		let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
		let repo = SqliteAccountRepository::new(pool);
		repo.run_migrations().await.unwrap();
		repo
	}

	fn account(id: &str, email: &str) -> Account {
		Account {
			id: PrincipalId::new(id),
			email: email.to_string(),
			password_hash: "$argon2id$stub".to_string(),
			created_at: Utc::now(),
		}
	}

	fn session(principal: &str, token_hash: &str, expires_in: Duration) -> SessionRecord {
		let now = Utc::now();
		SessionRecord {
			id: SessionId::new(),
			token_hash: token_hash.to_string(),
			principal: PrincipalId::new(principal),
			persistence: Persistence::Session,
			created_at: now,
			expires_at: now + expires_in,
		}
	}

	#[tokio::test]
	async fn test_duplicate_email_is_email_in_use() {
		let repo = repo().await;
		repo.create_account(&account("u1", "a@x.io")).await.unwrap();
		let err = repo.create_account(&account("u2", "a@x.io")).await.unwrap_err();
		assert!(matches!(err, AuthError::EmailInUse));
	}

	#[tokio::test]
	async fn test_find_account() {
		let repo = repo().await;
		repo.create_account(&account("u1", "a@x.io")).await.unwrap();
		let by_email = repo.find_account_by_email("a@x.io").await.unwrap().unwrap();
		assert_eq!(by_email.id.as_str(), "u1");
		assert!(repo
			.find_account_by_id(&PrincipalId::new("u1"))
			.await
			.unwrap()
			.is_some());
		assert!(repo.find_account_by_email("b@x.io").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_session_lifecycle() {
		let repo = repo().await;
		let s = session("u1", "h1", Duration::hours(1));
		repo.create_session(&s).await.unwrap();
		assert_eq!(repo.find_session("h1").await.unwrap(), Some(s.clone()));

		let deleted = repo.delete_session("h1").await.unwrap();
		assert_eq!(deleted.map(|d| d.id), Some(s.id));
		assert!(repo.find_session("h1").await.unwrap().is_none());
		assert!(repo.delete_session("h1").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_delete_expired_sessions() {
		let repo = repo().await;
		repo.create_session(&session("u1", "old", Duration::seconds(-5)))
			.await
			.unwrap();
		repo.create_session(&session("u1", "new", Duration::hours(1)))
			.await
			.unwrap();
		assert_eq!(repo.delete_expired_sessions(Utc::now()).await.unwrap(), 1);
		assert!(repo.find_session("new").await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_reset_is_single_use() {
		let repo = repo().await;
		let reset = ResetRecord {
			token_hash: "r1".to_string(),
			principal: PrincipalId::new("u1"),
			expires_at: Utc::now() + Duration::hours(1),
		};
		repo.create_reset(&reset).await.unwrap();
		assert!(repo.take_reset("r1").await.unwrap().is_some());
		assert!(repo.take_reset("r1").await.unwrap().is_none());
	}
}
