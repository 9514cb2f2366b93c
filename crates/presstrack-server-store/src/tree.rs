// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pure operations on the JSON record tree.
//!
//! `null` never lives in the tree: writing it removes the node, and objects
//! left empty by a removal are pruned up to the root.

use serde_json::{Map, Value};

use crate::path::StorePath;

pub(crate) fn get<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
	path.segments()
		.iter()
		.try_fold(root, |node, segment| node.as_object()?.get(segment))
}

/// Put `value` at `path`, or remove the node when `value` is `None`/`null`.
pub(crate) fn set(root: &mut Value, path: &StorePath, value: Option<Value>) {
	let value = value.filter(|v| !v.is_null());
	set_in(root, path.segments(), value);
}

fn set_in(node: &mut Value, segments: &[String], value: Option<Value>) {
	let Some((head, rest)) = segments.split_first() else {
		return;
	};
	if !node.is_object() {
		if value.is_none() {
			return;
		}
		*node = Value::Object(Map::new());
	}
	let Value::Object(map) = node else {
		return;
	};

	if rest.is_empty() {
		match value {
			Some(v) => {
				map.insert(head.clone(), v);
			}
			None => {
				map.remove(head);
			}
		}
		return;
	}

	let removing = value.is_none();
	if removing && !map.contains_key(head) {
		return;
	}
	let child = map
		.entry(head.clone())
		.or_insert_with(|| Value::Object(Map::new()));
	set_in(child, rest, value);
	if removing && child.as_object().is_some_and(Map::is_empty) {
		map.remove(head);
	}
}

/// Apply each field of `fields` as a child of `path`. Other children are
/// left untouched.
pub(crate) fn update(root: &mut Value, path: &StorePath, fields: Map<String, Value>) {
	for (field, value) in fields {
		let mut segments = path.segments().to_vec();
		segments.push(field);
		set_in(root, &segments, Some(value).filter(|v| !v.is_null()));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn p(raw: &str) -> StorePath {
		StorePath::parse(raw).unwrap()
	}

	#[test]
	fn test_set_creates_intermediate_nodes() {
		let mut root = json!({});
		set(&mut root, &p("jobs/k1"), Some(json!({"jobNo": "J1"})));
		assert_eq!(get(&root, &p("jobs/k1/jobNo")), Some(&json!("J1")));
	}

	#[test]
	fn test_remove_prunes_empty_parents() {
		let mut root = json!({"jobs": {"k1": {"jobNo": "J1"}}, "users": {"u": {}}});
		set(&mut root, &p("jobs/k1"), None);
		assert!(get(&root, &p("jobs")).is_none());
		assert!(get(&root, &p("users")).is_some());
	}

	#[test]
	fn test_remove_missing_is_noop() {
		let mut root = json!({"jobs": {"k1": {"a": 1}}});
		set(&mut root, &p("jobs/k2/a"), None);
		assert_eq!(root, json!({"jobs": {"k1": {"a": 1}}}));
	}

	#[test]
	fn test_update_touches_only_named_fields() {
		let mut root = json!({"jobs": {"k1": {"good": "0", "waste": "0", "managerId": "m1"}}});
		let mut fields = Map::new();
		fields.insert("good".to_string(), json!("5"));
		fields.insert("waste".to_string(), Value::Null);
		update(&mut root, &p("jobs/k1"), fields);
		assert_eq!(root, json!({"jobs": {"k1": {"good": "5", "managerId": "m1"}}}));
	}

	#[test]
	fn test_update_on_missing_record_creates_it() {
		let mut root = json!({});
		let mut fields = Map::new();
		fields.insert("completed".to_string(), json!(true));
		update(&mut root, &p("jobs/gone"), fields);
		assert_eq!(root, json!({"jobs": {"gone": {"completed": true}}}));
	}
}
