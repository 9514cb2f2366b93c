// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User profiles.
//!
//! A profile is written once at sign-up under `users/<principal id>` and never
//! edited. The role is mandatory: a profile without one is corrupt and the
//! session holding it gets signed out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::LedgerError;

/// Role of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Manager,
	Worker,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Manager => "manager",
			Role::Worker => "worker",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = LedgerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"manager" => Ok(Role::Manager),
			"worker" => Ok(Role::Worker),
			other => Err(LedgerError::UnknownRole(other.to_string())),
		}
	}
}

/// Why a stored profile cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileIntegrityError {
	#[error("profile record missing")]
	Missing,

	#[error("profile has no role")]
	MissingRole,

	#[error("profile has unknown role: {0}")]
	UnknownRole(String),

	#[error("malformed profile record: {0}")]
	Malformed(String),
}

/// Application profile of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	pub email: String,
	pub role: Role,
	/// Machine the worker operates. Empty for managers.
	#[serde(default)]
	pub machine_name: String,
	/// Milliseconds since the epoch.
	#[serde(default)]
	pub created_at: i64,
}

/// Lenient shape used to tell a corrupt profile apart from a valid one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRecord {
	#[serde(default)]
	email: Option<String>,
	#[serde(default)]
	role: Option<String>,
	#[serde(default)]
	machine_name: Option<String>,
	#[serde(default)]
	created_at: Option<i64>,
}

impl UserProfile {
	pub fn manager(email: impl Into<String>, created_at: i64) -> Self {
		Self {
			email: email.into(),
			role: Role::Manager,
			machine_name: String::new(),
			created_at,
		}
	}

	pub fn worker(email: impl Into<String>, machine_name: impl Into<String>, created_at: i64) -> Self {
		Self {
			email: email.into(),
			role: Role::Worker,
			machine_name: machine_name.into(),
			created_at,
		}
	}

	/// Decode a profile read from the store.
	///
	/// `None` and JSON null both mean the record is absent.
	pub fn from_record(value: Option<&Value>) -> Result<Self, ProfileIntegrityError> {
		let value = match value {
			None | Some(Value::Null) => return Err(ProfileIntegrityError::Missing),
			Some(v) => v,
		};

		let record: ProfileRecord = serde_json::from_value(value.clone())
			.map_err(|e| ProfileIntegrityError::Malformed(e.to_string()))?;

		let role = match record.role.as_deref() {
			None | Some("") => return Err(ProfileIntegrityError::MissingRole),
			Some(raw) => raw
				.parse::<Role>()
				.map_err(|_| ProfileIntegrityError::UnknownRole(raw.to_string()))?,
		};

		Ok(Self {
			email: record.email.unwrap_or_default(),
			role,
			machine_name: record.machine_name.unwrap_or_default(),
			created_at: record.created_at.unwrap_or_default(),
		})
	}

	/// Machine shown on the worker page.
	pub fn machine_label(&self) -> &str {
		if self.machine_name.is_empty() {
			"N/A"
		} else {
			&self.machine_name
		}
	}
}

/// Validate the role and machine fields of a sign-up form.
///
/// Runs before any account or store call. The machine name is trimmed and
/// dropped for managers.
pub fn validate_sign_up(role: &str, machine_name: Option<&str>) -> Result<(Role, String), LedgerError> {
	let role = role.trim();
	if role.is_empty() {
		return Err(LedgerError::Validation("Please select role.".to_string()));
	}
	let role: Role = role.parse()?;

	let machine_name = machine_name.map(str::trim).unwrap_or_default();
	match role {
		Role::Worker if machine_name.is_empty() => Err(LedgerError::Validation(
			"Machine name required for workers.".to_string(),
		)),
		Role::Worker => Ok((role, machine_name.to_string())),
		Role::Manager => Ok((role, String::new())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_from_record_valid_worker() {
		let value = json!({
			"email": "w@example.com",
			"role": "worker",
			"machineName": "M1",
			"createdAt": 1700000000000_i64
		});
		let profile = UserProfile::from_record(Some(&value)).unwrap();
		assert_eq!(profile.role, Role::Worker);
		assert_eq!(profile.machine_name, "M1");
		assert_eq!(profile.machine_label(), "M1");
	}

	#[test]
	fn test_from_record_missing() {
		assert_eq!(
			UserProfile::from_record(None),
			Err(ProfileIntegrityError::Missing)
		);
		assert_eq!(
			UserProfile::from_record(Some(&Value::Null)),
			Err(ProfileIntegrityError::Missing)
		);
	}

	#[test]
	fn test_from_record_without_role_is_corrupt() {
		let value = json!({ "email": "m@example.com", "createdAt": 1 });
		assert_eq!(
			UserProfile::from_record(Some(&value)),
			Err(ProfileIntegrityError::MissingRole)
		);

		let empty = json!({ "email": "m@example.com", "role": "" });
		assert_eq!(
			UserProfile::from_record(Some(&empty)),
			Err(ProfileIntegrityError::MissingRole)
		);
	}

	#[test]
	fn test_from_record_unknown_role() {
		let value = json!({ "email": "a@example.com", "role": "admin" });
		assert_eq!(
			UserProfile::from_record(Some(&value)),
			Err(ProfileIntegrityError::UnknownRole("admin".to_string()))
		);
	}

	#[test]
	fn test_from_record_not_an_object() {
		let value = json!("manager");
		assert!(matches!(
			UserProfile::from_record(Some(&value)),
			Err(ProfileIntegrityError::Malformed(_))
		));
	}

	#[test]
	fn test_manager_machine_label() {
		let profile = UserProfile::manager("m@example.com", 0);
		assert_eq!(profile.machine_label(), "N/A");
	}

	#[test]
	fn test_validate_sign_up() {
		assert!(matches!(
			validate_sign_up("", None),
			Err(LedgerError::Validation(msg)) if msg == "Please select role."
		));
		assert!(matches!(
			validate_sign_up("worker", Some("   ")),
			Err(LedgerError::Validation(msg)) if msg == "Machine name required for workers."
		));
		assert_eq!(
			validate_sign_up("worker", Some(" M1 ")).unwrap(),
			(Role::Worker, "M1".to_string())
		);
		assert_eq!(
			validate_sign_up("manager", Some("M1")).unwrap(),
			(Role::Manager, String::new())
		);
		assert!(matches!(
			validate_sign_up("owner", None),
			Err(LedgerError::UnknownRole(_))
		));
	}
}
