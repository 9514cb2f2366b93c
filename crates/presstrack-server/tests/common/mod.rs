// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared helpers for router integration tests.

#![allow(dead_code)]

use axum::{
	body::Body,
	http::{header, HeaderMap, Method, Request, StatusCode},
	Router,
};
use presstrack_server::{create_app_state, create_router, AppState, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse";

pub async fn setup_test_app() -> (Router, AppState) {
	let state = create_app_state(&ServerConfig::default()).await.unwrap();
	(create_router(state.clone()), state)
}

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Value,
}

impl TestResponse {
	pub fn message(&self) -> &str {
		self.body["message"].as_str().unwrap_or_default()
	}

	/// `name=value` part of the Set-Cookie header, ready for a Cookie header.
	pub fn cookie(&self) -> String {
		self.headers
			.get(header::SET_COOKIE)
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.split(';').next())
			.unwrap()
			.to_string()
	}
}

pub async fn send(
	app: &Router,
	method: Method,
	uri: &str,
	cookie: Option<&str>,
	body: Option<Value>,
) -> TestResponse {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(cookie) = cookie {
		builder = builder.header(header::COOKIE, cookie);
	}
	let request = match body {
		Some(body) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	};

	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let headers = response.headers().clone();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
	TestResponse {
		status,
		headers,
		body,
	}
}

pub async fn sign_up(app: &Router, email: &str, role: &str, machine: Option<&str>) -> TestResponse {
	send(
		app,
		Method::POST,
		"/auth/signup",
		None,
		Some(serde_json::json!({
			"email": email,
			"password": PASSWORD,
			"role": role,
			"machineName": machine,
		})),
	)
	.await
}

pub async fn login(app: &Router, email: &str) -> TestResponse {
	send(
		app,
		Method::POST,
		"/auth/login",
		None,
		Some(serde_json::json!({
			"email": email,
			"password": PASSWORD,
			"rememberMe": true,
		})),
	)
	.await
}

/// Sign up and sign in; returns the session cookie.
pub async fn signed_in(app: &Router, email: &str, role: &str, machine: Option<&str>) -> String {
	assert_eq!(sign_up(app, email, role, machine).await.status, StatusCode::CREATED);
	let response = login(app, email).await;
	assert_eq!(response.status, StatusCode::OK);
	response.cookie()
}

/// Rows of a manager or worker frame.
pub fn table_rows(frame: &Value) -> Vec<Value> {
	frame["table"]["rows"].as_array().cloned().unwrap_or_default()
}

/// Text of every cell in a rendered row.
pub fn cell_texts(row: &Value) -> Vec<String> {
	row["cells"]
		.as_array()
		.unwrap()
		.iter()
		.map(|cell| match cell["kind"].as_str() {
			Some("checkbox") => cell["checked"].to_string(),
			Some("action") => cell["action"].as_str().unwrap_or_default().to_string(),
			_ => cell["text"].as_str().unwrap_or_default().to_string(),
		})
		.collect()
}
