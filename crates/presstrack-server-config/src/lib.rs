// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the presstrack server.
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`/etc/presstrack/server.toml`, or `--config`)
//! 3. Environment variables (`PRESSTRACK_SERVER_<SECTION>_<FIELD>`)

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub store: StoreConfig,
	pub auth: AuthConfig,
	pub ledger: LedgerConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from defaults, the system config file and the
/// environment.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

pub fn load_from(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		store: layer.store.unwrap_or_default().finalize(),
		auth: layer.auth.unwrap_or_default().finalize(),
		ledger: layer.ledger.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		persistent = config.store.database_url.is_some(),
		timezone = %config.ledger.timezone,
		"Server configuration loaded"
	);

	Ok(config)
}

fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.ledger.tz().is_none() {
		return Err(ConfigError::InvalidValue {
			key: "ledger.timezone".to_string(),
			message: format!("unknown timezone '{}'", config.ledger.timezone),
		});
	}
	if config.auth.min_password_length == 0 {
		return Err(ConfigError::Validation(
			"auth.min_password_length must be at least 1".to_string(),
		));
	}
	if config.auth.session_ttl_hours == 0 || config.auth.remember_me_ttl_days == 0 {
		return Err(ConfigError::Validation(
			"session lifetimes must be greater than zero".to_string(),
		));
	}
	if config.ledger.heartbeat_interval_secs == 0 {
		return Err(ConfigError::Validation(
			"ledger.heartbeat_interval_secs must be greater than zero".to_string(),
		));
	}
	Ok(())
}
