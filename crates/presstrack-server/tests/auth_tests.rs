// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the login page actions.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{login, send, setup_test_app, sign_up, signed_in, PASSWORD};
use presstrack_server::error::NO_ROLE_MESSAGE;
use presstrack_server_store::StorePath;

#[tokio::test]
async fn test_sign_up_requires_role() {
	let (app, _) = setup_test_app().await;
	let response = sign_up(&app, "a@shop.io", "", None).await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.message(), "Please select role.");
}

#[tokio::test]
async fn test_worker_sign_up_requires_machine() {
	let (app, _) = setup_test_app().await;
	let response = sign_up(&app, "a@shop.io", "worker", Some("  ")).await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.message(), "Machine name required for workers.");

	// Nothing was created, so the address is still free.
	let response = sign_up(&app, "a@shop.io", "worker", Some("M1")).await;
	assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_sign_up_creates_profile_and_leaves_user_signed_out() {
	let (app, state) = setup_test_app().await;
	let response = sign_up(&app, "Op@Shop.io", "worker", Some(" M1 ")).await;
	assert_eq!(response.status, StatusCode::CREATED);
	assert_eq!(response.message(), "Account created. Sign in with your credentials.");
	assert!(response.headers.get(header::SET_COOKIE).is_none());

	let users = state.store.read_once(&StorePath::parse("users").unwrap()).await.unwrap();
	let users = users.value().unwrap().as_object().unwrap().clone();
	assert_eq!(users.len(), 1);
	let profile = users.values().next().unwrap();
	assert_eq!(profile["role"], "worker");
	assert_eq!(profile["machineName"], "M1");
	assert_eq!(profile["email"], "op@shop.io");
}

#[tokio::test]
async fn test_duplicate_and_weak_sign_ups_are_rejected() {
	let (app, _) = setup_test_app().await;
	assert_eq!(sign_up(&app, "a@shop.io", "manager", None).await.status, StatusCode::CREATED);

	let response = sign_up(&app, "a@shop.io", "manager", None).await;
	assert_eq!(response.status, StatusCode::CONFLICT);
	assert_eq!(
		response.message(),
		"The email address is already in use by another account."
	);

	let response = send(
		&app,
		Method::POST,
		"/auth/signup",
		None,
		Some(json!({ "email": "b@shop.io", "password": "123", "role": "manager" })),
	)
	.await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.message(), "Password should be at least 6 characters.");
}

#[tokio::test]
async fn test_login_redirects_by_role() {
	let (app, _) = setup_test_app().await;
	sign_up(&app, "boss@shop.io", "manager", None).await;
	sign_up(&app, "op@shop.io", "worker", Some("M1")).await;

	let response = login(&app, "boss@shop.io").await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["role"], "manager");
	assert_eq!(response.body["redirect"], "/manager");
	assert_eq!(response.body["persistence"], "local");
	let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
	assert!(set_cookie.starts_with("presstrack_session="));
	assert!(set_cookie.contains("HttpOnly"));
	assert!(set_cookie.contains("Max-Age="));

	let response = login(&app, "op@shop.io").await;
	assert_eq!(response.body["redirect"], "/worker");
}

#[tokio::test]
async fn test_login_without_remember_me_uses_session_cookie() {
	let (app, _) = setup_test_app().await;
	sign_up(&app, "boss@shop.io", "manager", None).await;

	let response = send(
		&app,
		Method::POST,
		"/auth/login",
		None,
		Some(json!({ "email": "boss@shop.io", "password": PASSWORD })),
	)
	.await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["persistence"], "session");
	let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
	assert!(!set_cookie.contains("Max-Age"));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
	let (app, _) = setup_test_app().await;
	sign_up(&app, "boss@shop.io", "manager", None).await;

	let response = send(
		&app,
		Method::POST,
		"/auth/login",
		None,
		Some(json!({ "email": "boss@shop.io", "password": "wrong password", "rememberMe": false })),
	)
	.await;
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
	assert_eq!(response.message(), "Invalid email or password.");
	assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_with_role_less_profile_is_refused() {
	let (app, state) = setup_test_app().await;
	sign_up(&app, "boss@shop.io", "manager", None).await;

	let users = state.store.read_once(&StorePath::parse("users").unwrap()).await.unwrap();
	let principal = users.value().unwrap().as_object().unwrap().keys().next().unwrap().clone();
	state
		.store
		.write(
			&StorePath::parse(&format!("users/{principal}")).unwrap(),
			json!({ "email": "boss@shop.io" }),
		)
		.await
		.unwrap();

	let response = login(&app, "boss@shop.io").await;
	assert_eq!(response.status, StatusCode::FORBIDDEN);
	assert_eq!(response.message(), NO_ROLE_MESSAGE);
	assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_clears_cookie_and_session() {
	let (app, _) = setup_test_app().await;
	let cookie = signed_in(&app, "boss@shop.io", "manager", None).await;

	let response = send(&app, Method::POST, "/auth/logout", Some(&cookie), None).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["redirect"], "/");
	let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
	assert!(set_cookie.contains("Max-Age=0"));

	let response = send(&app, Method::GET, "/api/manager/jobs", Some(&cookie), None).await;
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);

	// Signing out twice is harmless.
	let response = send(&app, Method::POST, "/auth/logout", None, None).await;
	assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_does_not_reveal_accounts() {
	let (app, _) = setup_test_app().await;
	sign_up(&app, "boss@shop.io", "manager", None).await;

	for email in ["boss@shop.io", "nobody@shop.io"] {
		let response = send(
			&app,
			Method::POST,
			"/auth/password-reset",
			None,
			Some(json!({ "email": email })),
		)
		.await;
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.message(), "Password reset email sent.");
	}
}

#[tokio::test]
async fn test_password_reset_confirm_rejects_unknown_token() {
	let (app, _) = setup_test_app().await;
	let response = send(
		&app,
		Method::POST,
		"/auth/password-reset/confirm",
		None,
		Some(json!({ "token": "not-a-token", "newPassword": "another secret" })),
	)
	.await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(
		response.message(),
		"The password reset link is invalid or has expired."
	);
}

#[tokio::test]
async fn test_login_page_bootstrap() {
	let (app, state) = setup_test_app().await;
	let response = send(&app, Method::GET, "/", None, None).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["page"], "login");
	assert_eq!(response.body["currentDate"], state.calendar.today().to_string());
}
