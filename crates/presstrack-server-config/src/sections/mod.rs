// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod auth;
mod http;
mod ledger;
mod logging;
mod store;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use ledger::{LedgerConfig, LedgerConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use store::{StoreConfig, StoreConfigLayer};
