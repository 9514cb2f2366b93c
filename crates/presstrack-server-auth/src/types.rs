// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use presstrack_ledger_core::PrincipalId;

use crate::error::AuthError;

/// How long a sign-in survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
	/// Survives browser restarts until the remember-me TTL runs out.
	Local,
	/// Ends with the browser session, or the session TTL.
	Session,
}

impl Persistence {
	pub fn from_remember_me(remember_me: bool) -> Self {
		if remember_me {
			Persistence::Local
		} else {
			Persistence::Session
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Persistence::Local => "local",
			Persistence::Session => "session",
		}
	}
}

impl FromStr for Persistence {
	type Err = AuthError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"local" => Ok(Persistence::Local),
			"session" => Ok(Persistence::Session),
			other => Err(AuthError::Internal(format!("unknown persistence {other:?}"))),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for SessionId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for SessionId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(s.parse()?))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
	pub id: PrincipalId,
	pub email: String,
	pub password_hash: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
	pub id: SessionId,
	pub token_hash: String,
	pub principal: PrincipalId,
	pub persistence: Persistence,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRecord {
	pub token_hash: String,
	pub principal: PrincipalId,
	pub expires_at: DateTime<Utc>,
}

/// The signed-in identity behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub id: PrincipalId,
	pub email: String,
	pub session_id: SessionId,
}

/// Result of a successful sign-in. The token is handed to the client once.
pub struct SignedIn {
	pub principal: Principal,
	pub token: Zeroizing<String>,
	pub persistence: Persistence,
	pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for SignedIn {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SignedIn")
			.field("principal", &self.principal)
			.field("token", &"[REDACTED]")
			.field("persistence", &self.persistence)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Auth-state feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStateChange {
	SignedIn {
		principal: PrincipalId,
		session_id: SessionId,
	},
	SignedOut {
		principal: PrincipalId,
		session_id: SessionId,
	},
}

impl AuthStateChange {
	pub fn session_id(&self) -> SessionId {
		match self {
			AuthStateChange::SignedIn { session_id, .. } | AuthStateChange::SignedOut { session_id, .. } => {
				*session_id
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_persistence_from_remember_me() {
		assert_eq!(Persistence::from_remember_me(true), Persistence::Local);
		assert_eq!(Persistence::from_remember_me(false), Persistence::Session);
		assert_eq!("local".parse::<Persistence>().unwrap(), Persistence::Local);
		assert!("forever".parse::<Persistence>().is_err());
	}

	#[test]
	fn test_signed_in_debug_redacts_token() {
		let signed_in = SignedIn {
			principal: Principal {
				id: PrincipalId::new("u1"),
				email: "a@x.io".to_string(),
				session_id: SessionId::new(),
			},
			token: Zeroizing::new("secret-token".to_string()),
			persistence: Persistence::Session,
			expires_at: Utc::now(),
		};
		let debug = format!("{signed_in:?}");
		assert!(!debug.contains("secret-token"));
		assert!(debug.contains("[REDACTED]"));
	}
}
