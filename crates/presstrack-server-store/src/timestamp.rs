// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server timestamp sentinel.
//!
//! Writers place `{".sv": "timestamp"}` where they want the store's clock;
//! the store replaces it with epoch milliseconds when the write is applied.

use serde_json::{Map, Value};

const SENTINEL_KEY: &str = ".sv";
const SENTINEL_TIMESTAMP: &str = "timestamp";

/// The value to write in place of a server-assigned timestamp.
pub fn server_timestamp() -> Value {
	let mut map = Map::new();
	map.insert(SENTINEL_KEY.to_string(), Value::from(SENTINEL_TIMESTAMP));
	Value::Object(map)
}

pub fn is_server_timestamp(value: &Value) -> bool {
	match value {
		Value::Object(map) => {
			map.len() == 1 && map.get(SENTINEL_KEY).and_then(Value::as_str) == Some(SENTINEL_TIMESTAMP)
		}
		_ => false,
	}
}

/// Replace every sentinel in `value` with `now_ms`.
pub fn resolve(value: Value, now_ms: i64) -> Value {
	match value {
		v if is_server_timestamp(&v) => Value::from(now_ms),
		Value::Object(map) => Value::Object(resolve_map(map, now_ms)),
		Value::Array(items) => Value::Array(items.into_iter().map(|v| resolve(v, now_ms)).collect()),
		other => other,
	}
}

pub fn resolve_map(map: Map<String, Value>, now_ms: i64) -> Map<String, Value> {
	map.into_iter().map(|(k, v)| (k, resolve(v, now_ms))).collect()
}
