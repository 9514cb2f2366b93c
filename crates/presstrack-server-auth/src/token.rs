// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Opaque bearer tokens.
//!
//! Only the SHA-256 of a token is ever stored; the token itself goes to the
//! client once and is wrapped in [`Zeroizing`] while the server holds it.

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const TOKEN_BYTES: usize = 32;

/// A fresh random token, hex encoded.
pub fn generate_token() -> Zeroizing<String> {
	let mut bytes = Zeroizing::new([0u8; TOKEN_BYTES]);
	rand::rngs::OsRng.fill_bytes(bytes.as_mut());
	Zeroizing::new(hex::encode(bytes.as_ref()))
}

/// The storage form of a token.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}
