// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Live record store for presstrack.
//!
//! A single JSON tree addressed by slash-separated paths (`jobs/<key>`,
//! `users/<principal>`). Clients read once, or subscribe to a path and get the
//! full value under it again after every change. Pushed records get
//! time-ordered keys, so key order is insertion order.

pub mod error;
pub mod journal;
pub mod path;
pub mod store;
pub mod subscription;
pub mod timestamp;
mod tree;

pub use error::{Result, StoreError};
pub use journal::{create_pool, SqliteJournal};
pub use path::StorePath;
pub use store::{LiveRecordStore, RecordStore};
pub use subscription::{Snapshot, Subscription};
pub use timestamp::server_timestamp;
