// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory account repository, used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use presstrack_ledger_core::PrincipalId;

use crate::error::{AuthError, Result};
use crate::repository::AccountRepository;
use crate::types::{Account, ResetRecord, SessionRecord};

#[derive(Default)]
struct Tables {
	accounts: HashMap<PrincipalId, Account>,
	sessions: HashMap<String, SessionRecord>,
	resets: HashMap<String, ResetRecord>,
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
	tables: RwLock<Tables>,
}

impl InMemoryAccountRepository {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
	async fn create_account(&self, account: &Account) -> Result<()> {
		let mut tables = self.tables.write().await;
		if tables.accounts.values().any(|a| a.email == account.email) {
			return Err(AuthError::EmailInUse);
		}
		tables.accounts.insert(account.id.clone(), account.clone());
		Ok(())
	}

	async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
		let tables = self.tables.read().await;
		Ok(tables.accounts.values().find(|a| a.email == email).cloned())
	}

	async fn find_account_by_id(&self, id: &PrincipalId) -> Result<Option<Account>> {
		Ok(self.tables.read().await.accounts.get(id).cloned())
	}

	async fn update_password_hash(&self, id: &PrincipalId, password_hash: &str) -> Result<()> {
		if let Some(account) = self.tables.write().await.accounts.get_mut(id) {
			account.password_hash = password_hash.to_string();
		}
		Ok(())
	}

	async fn create_session(&self, session: &SessionRecord) -> Result<()> {
		self.tables
			.write()
			.await
			.sessions
			.insert(session.token_hash.clone(), session.clone());
		Ok(())
	}

	async fn find_session(&self, token_hash: &str) -> Result<Option<SessionRecord>> {
		Ok(self.tables.read().await.sessions.get(token_hash).cloned())
	}

	async fn delete_session(&self, token_hash: &str) -> Result<Option<SessionRecord>> {
		Ok(self.tables.write().await.sessions.remove(token_hash))
	}

	async fn delete_sessions_for(&self, principal: &PrincipalId) -> Result<Vec<SessionRecord>> {
		let mut tables = self.tables.write().await;
		let (removed, kept): (Vec<_>, Vec<_>) = tables
			.sessions
			.drain()
			.partition(|(_, s)| &s.principal == principal);
		tables.sessions = kept.into_iter().collect();
		Ok(removed.into_iter().map(|(_, s)| s).collect())
	}

	async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
		let mut tables = self.tables.write().await;
		let before = tables.sessions.len();
		tables.sessions.retain(|_, s| !s.is_expired(now));
		Ok((before - tables.sessions.len()) as u64)
	}

	async fn create_reset(&self, reset: &ResetRecord) -> Result<()> {
		self.tables
			.write()
			.await
			.resets
			.insert(reset.token_hash.clone(), reset.clone());
		Ok(())
	}

	async fn take_reset(&self, token_hash: &str) -> Result<Option<ResetRecord>> {
		Ok(self.tables.write().await.resets.remove(token_hash))
	}

	async fn health_check(&self) -> Result<()> {
		Ok(())
	}
}
