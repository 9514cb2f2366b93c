// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The identity gateway: accounts, sign-in sessions and password reset.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::broadcast;
use tracing::instrument;
use uuid::Uuid;

use presstrack_ledger_core::PrincipalId;

use crate::argon2_config::{hash_password, verify_password};
use crate::error::{AuthError, Result};
use crate::notifier::ResetNotifier;
use crate::repository::AccountRepository;
use crate::token::{generate_token, hash_token};
use crate::types::{
	Account, AuthStateChange, Persistence, Principal, ResetRecord, SessionId, SessionRecord,
	SignedIn,
};

const AUTH_EVENT_CAPACITY: usize = 256;

#[async_trait]
pub trait IdentityGateway: Send + Sync {
	/// Create an account. The caller is not signed in afterwards.
	async fn create_account(&self, email: &str, password: &str) -> Result<PrincipalId>;

	async fn sign_in(&self, email: &str, password: &str, persistence: Persistence) -> Result<SignedIn>;

	/// End the session behind `token`. Unknown tokens are ignored.
	async fn sign_out(&self, token: &str) -> Result<()>;

	async fn send_password_reset(&self, email: &str) -> Result<()>;

	async fn confirm_password_reset(&self, token: &str, new_password: &str) -> Result<()>;

	/// The principal signed in with `token`, if the session is still live.
	async fn current_principal(&self, token: &str) -> Result<Option<Principal>>;

	fn subscribe_auth_state(&self) -> broadcast::Receiver<AuthStateChange>;

	async fn health_check(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
	pub session_ttl: Duration,
	pub remember_me_ttl: Duration,
	pub reset_token_ttl: Duration,
	pub min_password_length: usize,
}

impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			session_ttl: Duration::hours(12),
			remember_me_ttl: Duration::days(30),
			reset_token_ttl: Duration::hours(1),
			min_password_length: 6,
		}
	}
}

impl GatewayConfig {
	pub fn ttl_for(&self, persistence: Persistence) -> Duration {
		match persistence {
			Persistence::Local => self.remember_me_ttl,
			Persistence::Session => self.session_ttl,
		}
	}
}

pub struct LocalIdentityGateway {
	repo: Arc<dyn AccountRepository>,
	notifier: Arc<dyn ResetNotifier>,
	config: GatewayConfig,
	events: broadcast::Sender<AuthStateChange>,
}

impl LocalIdentityGateway {
	pub fn new(
		repo: Arc<dyn AccountRepository>,
		notifier: Arc<dyn ResetNotifier>,
		config: GatewayConfig,
	) -> Self {
		let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
		Self {
			repo,
			notifier,
			config,
			events,
		}
	}

	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// Drop sessions past their expiry. Returns how many were removed.
	pub async fn purge_expired_sessions(&self) -> Result<u64> {
		let removed = self.repo.delete_expired_sessions(Utc::now()).await?;
		if removed > 0 {
			tracing::debug!(removed, "expired sessions purged");
		}
		Ok(removed)
	}

	fn check_password(&self, password: &str) -> Result<()> {
		if password.chars().count() < self.config.min_password_length {
			return Err(AuthError::WeakPassword(self.config.min_password_length));
		}
		Ok(())
	}

	fn emit(&self, change: AuthStateChange) {
		// No receivers is fine.
		let _ = self.events.send(change);
	}
}

/// Lowercase and trim, then require `local@domain.tld`.
fn normalize_email(email: &str) -> Result<String> {
	let email = email.trim().to_lowercase();
	let (local, domain) = email.split_once('@').ok_or(AuthError::InvalidEmail)?;
	let valid = !local.is_empty()
		&& !domain.contains('@')
		&& domain.contains('.')
		&& !domain.starts_with('.')
		&& !domain.ends_with('.')
		&& !email.chars().any(char::is_whitespace);
	if !valid {
		return Err(AuthError::InvalidEmail);
	}
	Ok(email)
}

#[async_trait]
impl IdentityGateway for LocalIdentityGateway {
	#[instrument(skip(self, email, password))]
	async fn create_account(&self, email: &str, password: &str) -> Result<PrincipalId> {
		let email = normalize_email(email)?;
		self.check_password(password)?;

		let account = Account {
			id: PrincipalId::new(Uuid::new_v4().simple().to_string()),
			email,
			password_hash: hash_password(password)?,
			created_at: Utc::now(),
		};
		self.repo.create_account(&account).await?;
		tracing::info!(principal = %account.id, "account created");
		Ok(account.id)
	}

	#[instrument(skip(self, email, password), fields(persistence = persistence.as_str()))]
	async fn sign_in(&self, email: &str, password: &str, persistence: Persistence) -> Result<SignedIn> {
		let email = normalize_email(email)?;
		let account = self
			.repo
			.find_account_by_email(&email)
			.await?
			.ok_or(AuthError::InvalidCredentials)?;
		if !verify_password(password, &account.password_hash)? {
			tracing::debug!(principal = %account.id, "password mismatch");
			return Err(AuthError::InvalidCredentials);
		}

		let token = generate_token();
		let now = Utc::now();
		let session = SessionRecord {
			id: SessionId::new(),
			token_hash: hash_token(&token),
			principal: account.id.clone(),
			persistence,
			created_at: now,
			expires_at: now + self.config.ttl_for(persistence),
		};
		self.repo.create_session(&session).await?;

		tracing::info!(principal = %account.id, session_id = %session.id, "signed in");
		self.emit(AuthStateChange::SignedIn {
			principal: account.id.clone(),
			session_id: session.id,
		});

		Ok(SignedIn {
			principal: Principal {
				id: account.id,
				email: account.email,
				session_id: session.id,
			},
			token,
			persistence,
			expires_at: session.expires_at,
		})
	}

	#[instrument(skip_all)]
	async fn sign_out(&self, token: &str) -> Result<()> {
		if let Some(session) = self.repo.delete_session(&hash_token(token)).await? {
			tracing::info!(principal = %session.principal, session_id = %session.id, "signed out");
			self.emit(AuthStateChange::SignedOut {
				principal: session.principal,
				session_id: session.id,
			});
		}
		Ok(())
	}

	#[instrument(skip_all)]
	async fn send_password_reset(&self, email: &str) -> Result<()> {
		let email = normalize_email(email)?;
		let Some(account) = self.repo.find_account_by_email(&email).await? else {
			tracing::debug!("password reset for unknown email ignored");
			return Ok(());
		};

		let token = generate_token();
		self.repo
			.create_reset(&ResetRecord {
				token_hash: hash_token(&token),
				principal: account.id.clone(),
				expires_at: Utc::now() + self.config.reset_token_ttl,
			})
			.await?;
		self.notifier.deliver(&account.email, &token).await?;
		tracing::info!(principal = %account.id, "password reset issued");
		Ok(())
	}

	#[instrument(skip_all)]
	async fn confirm_password_reset(&self, token: &str, new_password: &str) -> Result<()> {
		self.check_password(new_password)?;
		let reset = self
			.repo
			.take_reset(&hash_token(token))
			.await?
			.ok_or(AuthError::InvalidResetToken)?;
		if reset.expires_at <= Utc::now() {
			return Err(AuthError::InvalidResetToken);
		}

		self.repo
			.update_password_hash(&reset.principal, &hash_password(new_password)?)
			.await?;
		for session in self.repo.delete_sessions_for(&reset.principal).await? {
			self.emit(AuthStateChange::SignedOut {
				principal: session.principal,
				session_id: session.id,
			});
		}
		tracing::info!(principal = %reset.principal, "password reset completed");
		Ok(())
	}

	#[instrument(skip_all)]
	async fn current_principal(&self, token: &str) -> Result<Option<Principal>> {
		let token_hash = hash_token(token);
		let Some(session) = self.repo.find_session(&token_hash).await? else {
			return Ok(None);
		};
		if session.is_expired(Utc::now()) {
			self.repo.delete_session(&token_hash).await?;
			tracing::debug!(session_id = %session.id, "session expired");
			self.emit(AuthStateChange::SignedOut {
				principal: session.principal,
				session_id: session.id,
			});
			return Ok(None);
		}

		let account = self.repo.find_account_by_id(&session.principal).await?;
		Ok(account.map(|account| Principal {
			id: account.id,
			email: account.email,
			session_id: session.id,
		}))
	}

	fn subscribe_auth_state(&self) -> broadcast::Receiver<AuthStateChange> {
		self.events.subscribe()
	}

	async fn health_check(&self) -> Result<()> {
		self.repo.health_check().await
	}
}
