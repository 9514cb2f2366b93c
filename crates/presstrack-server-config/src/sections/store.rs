// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record store persistence.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
	/// SQLite URL journaling records and accounts. `None` keeps everything in
	/// memory.
	pub database_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfigLayer {
	pub database_url: Option<String>,
}

impl StoreConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.database_url.is_some() {
			self.database_url = other.database_url;
		}
	}

	pub fn finalize(self) -> StoreConfig {
		StoreConfig {
			database_url: self.database_url.filter(|url| !url.trim().is_empty()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_in_memory_by_default() {
		assert_eq!(StoreConfigLayer::default().finalize().database_url, None);
	}

	#[test]
	fn test_blank_url_means_in_memory() {
		let layer = StoreConfigLayer {
			database_url: Some("  ".to_string()),
		};
		assert_eq!(layer.finalize().database_url, None);
	}
}
