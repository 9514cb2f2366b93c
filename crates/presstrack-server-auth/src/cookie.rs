// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session cookie handling.

use chrono::Duration;
use http::header::COOKIE;
use http::HeaderMap;

use crate::types::Persistence;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "presstrack_session";

/// Extract the session token from the Cookie header.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == SESSION_COOKIE_NAME && !value.is_empty()).then(|| value.to_string())
		})
}

/// `Set-Cookie` value for a fresh session.
///
/// `Local` sessions carry a `Max-Age` and survive a browser restart;
/// `Session` cookies do not.
pub fn session_cookie(token: &str, persistence: Persistence, ttl: Duration, secure: bool) -> String {
	let mut cookie = format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax");
	if persistence == Persistence::Local {
		cookie.push_str(&format!("; Max-Age={}", ttl.num_seconds().max(0)));
	}
	if secure {
		cookie.push_str("; Secure");
	}
	cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
	format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;

	#[test]
	fn test_extract_among_other_cookies() {
		let mut headers = HeaderMap::new();
		headers.insert(
			COOKIE,
			HeaderValue::from_static("theme=dark; presstrack_session=abc123; lang=en"),
		);
		assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));
	}

	#[test]
	fn test_missing_or_empty_cookie() {
		let mut headers = HeaderMap::new();
		assert_eq!(extract_session_cookie(&headers), None);
		headers.insert(COOKIE, HeaderValue::from_static("presstrack_session="));
		assert_eq!(extract_session_cookie(&headers), None);
	}

	#[test]
	fn test_local_cookie_has_max_age() {
		let local = session_cookie("t", Persistence::Local, Duration::days(30), false);
		assert!(local.contains("Max-Age=2592000"));
		let session = session_cookie("t", Persistence::Session, Duration::hours(12), true);
		assert!(!session.contains("Max-Age"));
		assert!(session.ends_with("; Secure"));
	}

	#[test]
	fn test_clear_cookie() {
		assert!(clear_session_cookie().contains("Max-Age=0"));
	}
}
