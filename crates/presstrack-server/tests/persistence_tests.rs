// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Records and accounts survive a restart when a database is configured.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tempfile::TempDir;

use common::{cell_texts, login, send, signed_in, table_rows};
use presstrack_server::{create_app_state, create_router, ServerConfig};

fn sqlite_config(dir: &TempDir) -> ServerConfig {
	let mut config = ServerConfig::default();
	config.store.database_url = Some(format!(
		"sqlite://{}",
		dir.path().join("presstrack.db").display()
	));
	config
}

#[tokio::test]
async fn test_jobs_and_accounts_survive_restart() {
	let dir = TempDir::new().unwrap();
	let config = sqlite_config(&dir);

	{
		let app = create_router(create_app_state(&config).await.unwrap());
		let manager = signed_in(&app, "boss@shop.io", "manager", None).await;
		let created = send(
			&app,
			Method::POST,
			"/api/manager/jobs",
			Some(&manager),
			Some(json!({
				"jobNo": "J7",
				"jobName": "Flyer",
				"formName": "A5",
				"quantity": "1000",
				"workerName": "Alice",
				"machineName": "M1",
			})),
		)
		.await;
		assert_eq!(created.status, StatusCode::CREATED);
	}

	let app = create_router(create_app_state(&config).await.unwrap());
	let response = login(&app, "boss@shop.io").await;
	assert_eq!(response.status, StatusCode::OK);
	let manager = response.cookie();

	let list = send(&app, Method::GET, "/api/manager/jobs", Some(&manager), None).await;
	let rows = table_rows(&list.body);
	assert_eq!(rows.len(), 1);
	assert_eq!(cell_texts(&rows[0])[1], "J7");
}
