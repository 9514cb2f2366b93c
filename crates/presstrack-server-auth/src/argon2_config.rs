// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing.
//!
//! Release builds use Argon2id defaults (19 MiB, 2 iterations). Tests use a
//! minimal parameter set so account fixtures stay fast; those parameters
//! MUST NOT be used in production.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
#[cfg(test)]
use argon2::{Algorithm, Params, Version};

use crate::error::{AuthError, Result};

#[inline]
pub(crate) fn argon2_instance() -> Argon2<'static> {
	#[cfg(test)]
	{
		let params = Params::new(1024, 1, 1, None).expect("valid Argon2 params for tests");
		Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
	}

	#[cfg(not(test))]
	{
		Argon2::default()
	}
}

/// Hash a password into a PHC string.
pub(crate) fn hash_password(password: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored PHC string.
pub(crate) fn verify_password(password: &str, stored: &str) -> Result<bool> {
	let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hashing(e.to_string()))?;
	Ok(argon2_instance()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_and_verify() {
		let hash = hash_password("hunter22").unwrap();
		assert!(hash.starts_with("$argon2id$"));
		assert!(verify_password("hunter22", &hash).unwrap());
		assert!(!verify_password("hunter23", &hash).unwrap());
	}

	#[test]
	fn test_salts_differ() {
		assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
	}

	#[test]
	fn test_garbage_hash_is_an_error() {
		assert!(verify_password("x", "not-a-phc-string").is_err());
	}
}
