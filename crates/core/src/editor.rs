//! Load-balance allocation editor.
//!
//! [`AllocationEditor`] holds the working rows for the selected bucket,
//! applies operator edits, and gates the batch save behind [`validate`].
//! Data access and notifications are injected, so the editor runs the same
//! against Postgres, the HTTP API, or an in-memory store.

use std::time::Duration;

use crate::allocation::{
    compute_total, fallback_rows, rows_for_bucket, validate, AllocationError, AllocationRow,
    PersistedAllocation, RowEdit, TrunkEntry, ValidAllocation,
};
use crate::error::CoreError;
use crate::notify::{NoticeLevel, Notifier};
use crate::store::AllocationStore;

/// Notification text after a successful save.
pub const SAVE_SUCCESS_MESSAGE: &str = "Load balance saved successfully";

/// How often a failed save is re-sent.
///
/// Only transient failures are retried; the store's replace semantics make
/// a repeated submission equivalent to a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        max_attempts: 1,
        backoff: Duration::ZERO,
    };

    pub fn bounded(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Validate `rows` and submit them as the full allocation of `bucket`.
///
/// The store is never called when validation fails.
pub async fn save_allocation<S>(
    store: &S,
    bucket: &str,
    rows: &[AllocationRow],
    retry: RetryPolicy,
) -> Result<Vec<PersistedAllocation>, AllocationError>
where
    S: AllocationStore + ?Sized,
{
    let valid = validate(rows)?;
    submit(store, bucket, &valid, retry)
        .await
        .map_err(|err| AllocationError::SaveFailed(err.detail().map(str::to_owned)))
}

async fn submit<S>(
    store: &S,
    bucket: &str,
    rows: &[ValidAllocation],
    retry: RetryPolicy,
) -> Result<Vec<PersistedAllocation>, CoreError>
where
    S: AllocationStore + ?Sized,
{
    let mut attempt = 1;
    loop {
        match store.replace_allocation(bucket, rows).await {
            Ok(saved) => return Ok(saved),
            Err(err) if err.is_transient() && attempt < retry.max_attempts => {
                attempt += 1;
                tokio::time::sleep(retry.backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Working state for editing one bucket's allocation.
pub struct AllocationEditor<S, N> {
    store: S,
    notifier: N,
    retry: RetryPolicy,
    bucket: Option<String>,
    rows: Vec<AllocationRow>,
}

impl<S, N> AllocationEditor<S, N>
where
    S: AllocationStore,
    N: Notifier,
{
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            retry: RetryPolicy::NONE,
            bucket: None,
            rows: Vec::new(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn rows(&self) -> &[AllocationRow] {
        &self.rows
    }

    /// Running total of the working rows.
    pub fn total(&self) -> f64 {
        compute_total(&self.rows)
    }

    /// Trunk directory used to populate both selectors.
    pub async fn trunk_options(&self) -> Result<Vec<TrunkEntry>, CoreError> {
        self.store.list_trunks().await
    }

    /// Load `bucket` into the editor.
    ///
    /// When the stored allocation cannot be read the editor still switches
    /// to `bucket` with a single blank row, warns the operator, and returns
    /// [`AllocationError::FetchFailed`].
    pub async fn select_bucket(&mut self, bucket: &str) -> Result<&[AllocationRow], AllocationError> {
        let bucket = bucket.trim();
        if bucket.is_empty() {
            return Err(AllocationError::NoBucketSelected);
        }

        self.bucket = Some(bucket.to_string());
        match self.store.fetch_allocation(bucket).await {
            Ok(existing) => {
                self.rows = rows_for_bucket(&existing);
                Ok(&self.rows)
            }
            Err(err) => {
                self.rows = fallback_rows();
                let err = AllocationError::FetchFailed(err.to_string());
                self.notifier.notify(NoticeLevel::Warning, &err.to_string());
                Err(err)
            }
        }
    }

    /// Change one field of the row at `index`. Returns the new total.
    pub fn change_row(&mut self, index: usize, edit: RowEdit) -> Result<f64, AllocationError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(AllocationError::RowOutOfRange { index, len })?;
        row.apply(edit);
        Ok(self.total())
    }

    /// Append a blank row.
    pub fn add_row(&mut self) -> &[AllocationRow] {
        self.rows.push(AllocationRow::blank());
        &self.rows
    }

    /// Drop the row at `index`. A dropped stored row is simply left out of
    /// the next save.
    pub fn remove_row(&mut self, index: usize) -> Result<AllocationRow, AllocationError> {
        if index >= self.rows.len() {
            return Err(AllocationError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    pub fn validate(&self) -> Result<Vec<ValidAllocation>, AllocationError> {
        validate(&self.rows)
    }

    /// Save the working rows as the bucket's complete allocation.
    ///
    /// On success the editor is cleared. On any failure the rows are left
    /// untouched so the operator can fix them and resubmit.
    pub async fn save(&mut self) -> Result<Vec<PersistedAllocation>, AllocationError> {
        let Some(bucket) = self.bucket.as_deref() else {
            return Err(AllocationError::NoBucketSelected);
        };

        match save_allocation(&self.store, bucket, &self.rows, self.retry).await {
            Ok(saved) => {
                self.bucket = None;
                self.rows.clear();
                self.notifier
                    .notify(NoticeLevel::Success, SAVE_SUCCESS_MESSAGE);
                Ok(saved)
            }
            Err(err) => {
                self.notifier.notify(NoticeLevel::Error, &err.to_string());
                Err(err)
            }
        }
    }
}
