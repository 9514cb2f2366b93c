// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity gateway for presstrack.
//!
//! Accounts are email + password (Argon2id). Signing in yields an opaque
//! session token; only its SHA-256 is stored. A session lives for the
//! remember-me TTL when signed in with [`Persistence::Local`], otherwise for
//! the session TTL. Sign-ins and sign-outs are published on an auth-state
//! feed so live views can be torn down when their session ends.

mod argon2_config;
pub mod cookie;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod notifier;
pub mod repository;
pub mod token;
pub mod types;

pub use cookie::{clear_session_cookie, extract_session_cookie, session_cookie, SESSION_COOKIE_NAME};
pub use error::{AuthError, Result};
pub use gateway::{GatewayConfig, IdentityGateway, LocalIdentityGateway};
pub use memory::InMemoryAccountRepository;
pub use notifier::{LoggingResetNotifier, ResetNotifier};
pub use repository::{AccountRepository, SqliteAccountRepository};
pub use types::{AuthStateChange, Persistence, Principal, SessionId, SignedIn};
