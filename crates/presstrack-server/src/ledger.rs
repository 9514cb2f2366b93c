// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reads and writes against the job collection.
//!
//! Every mutation is checked against the caller's view first: a job can only
//! be changed or deleted while it is a row of that view.

use serde_json::Value;
use tracing::{info, instrument};

use presstrack_ledger_core::{
	decode_ledger, JobForm, JobKey, JobPatch, LedgerDate, LedgerEntry, PrincipalId, RoleContext,
	JOBS_PATH,
};
use presstrack_server_store::{server_timestamp, RecordStore, StorePath};

use crate::error::ServerError;

pub fn jobs_path() -> Result<StorePath, ServerError> {
	Ok(StorePath::parse(JOBS_PATH)?)
}

fn job_path(key: &JobKey) -> Result<StorePath, ServerError> {
	jobs_path()?
		.child(key.as_str())
		.map_err(|_| ServerError::NotFound("Job not found.".to_string()))
}

/// The whole job collection, decoded, in key order.
pub async fn load_ledger(store: &dyn RecordStore) -> Result<Vec<LedgerEntry>, ServerError> {
	let snapshot = store.read_once(&jobs_path()?).await?;
	Ok(decode_ledger(snapshot.value()))
}

/// Find `key` among the rows visible to `context`.
pub fn find_visible<'a>(
	context: &RoleContext,
	ledger: &'a [LedgerEntry],
	key: &JobKey,
) -> Result<&'a LedgerEntry, ServerError> {
	ledger
		.iter()
		.find(|entry| &entry.key == key)
		.filter(|entry| context.admits(&entry.job))
		.ok_or_else(|| ServerError::NotFound("Job not found.".to_string()))
}

async fn require_visible(
	store: &dyn RecordStore,
	context: &RoleContext,
	key: &JobKey,
) -> Result<(), ServerError> {
	let ledger = load_ledger(store).await?;
	find_visible(context, &ledger, key).map(|_| ())
}

/// Push a new job owned by `manager`.
#[instrument(skip(store, form), fields(manager = %manager, job_no = %form.job_no))]
pub async fn create_job(
	store: &dyn RecordStore,
	manager: PrincipalId,
	form: JobForm,
	today: &LedgerDate,
) -> Result<JobKey, ServerError> {
	let job = form.into_job(manager, today);
	let mut record = match serde_json::to_value(&job).map_err(|e| ServerError::Internal(e.to_string()))? {
		Value::Object(map) => map,
		_ => return Err(ServerError::Internal("job did not serialize to an object".to_string())),
	};
	record.insert("createdAt".to_string(), server_timestamp());

	let key = store
		.push(&jobs_path()?, Value::Object(record))
		.await
		.map_err(ServerError::write_failed("add job"))?;
	info!(job_key = %key, "job created");
	Ok(JobKey::new(key))
}

/// Apply `patch` to a job visible in `context`.
#[instrument(skip(store, context, patch), fields(job_key = %key, view = context.kind().as_str()))]
pub async fn patch_job(
	store: &dyn RecordStore,
	context: &RoleContext,
	key: &JobKey,
	patch: JobPatch,
) -> Result<(), ServerError> {
	require_visible(store, context, key).await?;

	let mut fields = patch.fields();
	if patch.stamps_updated_at() {
		fields.insert("updatedAt".to_string(), server_timestamp());
	}
	store
		.update(&job_path(key)?, fields)
		.await
		.map_err(ServerError::write_failed("update job"))?;
	info!("job updated");
	Ok(())
}

/// Remove a job visible in `context`.
#[instrument(skip(store, context), fields(job_key = %key, view = context.kind().as_str()))]
pub async fn delete_job(
	store: &dyn RecordStore,
	context: &RoleContext,
	key: &JobKey,
) -> Result<(), ServerError> {
	require_visible(store, context, key).await?;
	store
		.remove(&job_path(key)?)
		.await
		.map_err(ServerError::write_failed("delete job"))?;
	info!("job deleted");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use presstrack_ledger_core::OutcomeForm;
	use presstrack_server_store::LiveRecordStore;

	fn form(job_no: &str, machine: &str) -> JobForm {
		JobForm {
			job_no: job_no.to_string(),
			job_name: "Brochure".to_string(),
			form_name: "A4".to_string(),
			quantity: "500".to_string(),
			worker_name: "Alice".to_string(),
			machine_name: machine.to_string(),
		}
	}

	fn today() -> LedgerDate {
		LedgerDate::new("10/19/2026")
	}

	#[tokio::test]
	async fn test_create_stamps_owner_and_timestamp() {
		let store = LiveRecordStore::in_memory();
		let key = create_job(&store, PrincipalId::new("m1"), form("J1", "M1"), &today())
			.await
			.unwrap();

		let ledger = load_ledger(&store).await.unwrap();
		assert_eq!(ledger.len(), 1);
		assert_eq!(ledger[0].key, key);
		let job = &ledger[0].job;
		assert!(job.is_owned_by(&PrincipalId::new("m1")));
		assert!(job.created_at.is_some_and(|ms| ms > 0));
		assert!(job.updated_at.is_none());
		assert_eq!(job.good, "0");
	}

	#[tokio::test]
	async fn test_worker_save_completes_and_stamps() {
		let store = LiveRecordStore::in_memory();
		let key = create_job(&store, PrincipalId::new("m1"), form("J1", "M1"), &today())
			.await
			.unwrap();
		let worker = RoleContext::Worker {
			machine_name: "M1".to_string(),
		};
		let patch = JobPatch::worker_outcome(
			OutcomeForm {
				good: "10".to_string(),
				waste: "2".to_string(),
				remark: "ok".to_string(),
			},
			&today(),
		);
		patch_job(&store, &worker, &key, patch).await.unwrap();

		let ledger = load_ledger(&store).await.unwrap();
		let job = &ledger[0].job;
		assert!(job.completed);
		assert_eq!(job.good, "10");
		assert!(job.updated_at.is_some());
		assert!(job.is_owned_by(&PrincipalId::new("m1")));
		assert!(!worker.admits(job));
	}

	#[tokio::test]
	async fn test_mutations_need_visibility() {
		let store = LiveRecordStore::in_memory();
		let key = create_job(&store, PrincipalId::new("m1"), form("J1", "M1"), &today())
			.await
			.unwrap();

		let other_machine = RoleContext::Worker {
			machine_name: "M2".to_string(),
		};
		let patch = JobPatch::completion(true, &today());
		assert!(matches!(
			patch_job(&store, &other_machine, &key, patch).await,
			Err(ServerError::NotFound(_))
		));

		let other_manager = RoleContext::PastRecords {
			principal: PrincipalId::new("m2"),
		};
		assert!(matches!(
			delete_job(&store, &other_manager, &key).await,
			Err(ServerError::NotFound(_))
		));
		assert_eq!(load_ledger(&store).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_unknown_or_malformed_key() {
		let store = LiveRecordStore::in_memory();
		let owner = RoleContext::PastRecords {
			principal: PrincipalId::new("m1"),
		};
		assert!(matches!(
			delete_job(&store, &owner, &JobKey::new("missing")).await,
			Err(ServerError::NotFound(_))
		));
		assert!(job_path(&JobKey::new("a.b")).is_err());
	}
}
