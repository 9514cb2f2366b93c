// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files and environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, HttpConfigLayer, LedgerConfigLayer, LoggingConfigLayer, StoreConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/presstrack/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: PRESSTRACK_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl EnvSource {
	/// Build a layer from an arbitrary variable lookup.
	pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<ServerConfigLayer, ConfigError> {
		let env = Env { lookup: &lookup };
		Ok(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: env.var("PRESSTRACK_SERVER_HTTP_HOST"),
				port: env.parse("PRESSTRACK_SERVER_HTTP_PORT")?,
				secure_cookies: env.bool("PRESSTRACK_SERVER_HTTP_SECURE_COOKIES"),
			}),
			store: Some(StoreConfigLayer {
				database_url: env.var("PRESSTRACK_SERVER_STORE_DATABASE_URL"),
			}),
			auth: Some(AuthConfigLayer {
				session_ttl_hours: env.parse("PRESSTRACK_SERVER_AUTH_SESSION_TTL_HOURS")?,
				remember_me_ttl_days: env.parse("PRESSTRACK_SERVER_AUTH_REMEMBER_ME_TTL_DAYS")?,
				reset_token_ttl_minutes: env.parse("PRESSTRACK_SERVER_AUTH_RESET_TOKEN_TTL_MINUTES")?,
				min_password_length: env.parse("PRESSTRACK_SERVER_AUTH_MIN_PASSWORD_LENGTH")?,
				session_cleanup_interval_secs: env
					.parse("PRESSTRACK_SERVER_AUTH_SESSION_CLEANUP_INTERVAL_SECS")?,
			}),
			ledger: Some(LedgerConfigLayer {
				timezone: env.var("PRESSTRACK_SERVER_LEDGER_TIMEZONE"),
				heartbeat_interval_secs: env.parse("PRESSTRACK_SERVER_LEDGER_HEARTBEAT_INTERVAL_SECS")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: env.var("PRESSTRACK_SERVER_LOGGING_LEVEL"),
			}),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Self::load_with(|name| std::env::var(name).ok())
	}
}

struct Env<'a> {
	lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Env<'_> {
	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {} value '{v}'", std::any::type_name::<T>()),
			}),
			None => Ok(None),
		}
	}
}
