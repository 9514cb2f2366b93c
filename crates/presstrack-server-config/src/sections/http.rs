// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP listener configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
	/// Mark the session cookie `Secure`; enable behind TLS.
	pub secure_cookies: bool,
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_string(),
			port: DEFAULT_PORT,
			secure_cookies: false,
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HttpConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
	pub secure_cookies: Option<bool>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.secure_cookies.is_some() {
			self.secure_cookies = other.secure_cookies;
		}
	}

	pub fn finalize(self) -> HttpConfig {
		HttpConfig {
			host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
			port: self.port.unwrap_or(DEFAULT_PORT),
			secure_cookies: self.secure_cookies.unwrap_or(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		assert_eq!(HttpConfigLayer::default().finalize(), HttpConfig::default());
	}

	#[test]
	fn test_merge_overrides_only_set_fields() {
		let mut base = HttpConfigLayer {
			host: Some("0.0.0.0".to_string()),
			port: Some(9000),
			secure_cookies: None,
		};
		base.merge(HttpConfigLayer {
			port: Some(9100),
			..Default::default()
		});
		let config = base.finalize();
		assert_eq!(config.host, "0.0.0.0");
		assert_eq!(config.port, 9100);
	}
}
