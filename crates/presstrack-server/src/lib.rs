// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! presstrack job dashboard server.
//!
//! Serves the login page actions, the role router and the three role-scoped
//! views (manager, worker, past records) over JSON and server-sent events.

pub mod api;
pub mod auth_middleware;
pub mod error;
pub mod ledger;
pub mod live;
pub mod role_router;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use error::{ErrorResponse, ServerError};
pub use live::{LiveView, ViewState};
pub use presstrack_server_config::ServerConfig;
