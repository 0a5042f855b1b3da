//! Data-access seam for allocations and the trunk directory.
//!
//! The HTTP server implements [`AllocationStore`] on top of Postgres, the
//! client crate implements it on top of the HTTP API, and
//! [`InMemoryAllocationStore`] backs tests and local tooling.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::allocation::{BucketAllocation, PersistedAllocation, TrunkEntry, ValidAllocation};
use crate::error::CoreError;
use crate::types::DbId;

#[async_trait]
pub trait AllocationStore: Send + Sync {
    /// The trunk directory, ordered by name.
    async fn list_trunks(&self) -> Result<Vec<TrunkEntry>, CoreError>;

    /// Stored rows for one bucket, in insertion order. Empty if none.
    async fn fetch_allocation(&self, bucket: &str) -> Result<Vec<PersistedAllocation>, CoreError>;

    /// Atomically replace every row of `bucket` with `rows`.
    ///
    /// Implementations delete the previous set and insert the new one as a
    /// single unit, so repeating a call with the same input is harmless.
    async fn replace_allocation(
        &self,
        bucket: &str,
        rows: &[ValidAllocation],
    ) -> Result<Vec<PersistedAllocation>, CoreError>;

    /// Every stored row across buckets, ordered by bucket then id.
    async fn list_allocations(&self) -> Result<Vec<BucketAllocation>, CoreError>;

    /// Remove a bucket's allocation. Returns the number of rows removed.
    async fn delete_allocation(&self, bucket: &str) -> Result<u64, CoreError>;

    /// Whether the backing storage is reachable.
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[async_trait]
impl<S: AllocationStore + ?Sized> AllocationStore for Arc<S> {
    async fn list_trunks(&self) -> Result<Vec<TrunkEntry>, CoreError> {
        (**self).list_trunks().await
    }

    async fn fetch_allocation(&self, bucket: &str) -> Result<Vec<PersistedAllocation>, CoreError> {
        (**self).fetch_allocation(bucket).await
    }

    async fn replace_allocation(
        &self,
        bucket: &str,
        rows: &[ValidAllocation],
    ) -> Result<Vec<PersistedAllocation>, CoreError> {
        (**self).replace_allocation(bucket, rows).await
    }

    async fn list_allocations(&self) -> Result<Vec<BucketAllocation>, CoreError> {
        (**self).list_allocations().await
    }

    async fn delete_allocation(&self, bucket: &str) -> Result<u64, CoreError> {
        (**self).delete_allocation(bucket).await
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        (**self).health_check().await
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    trunks: Vec<TrunkEntry>,
    buckets: BTreeMap<String, Vec<PersistedAllocation>>,
    next_trunk_id: DbId,
    next_row_id: DbId,
}

/// Process-local store with the same replace semantics as the database.
#[derive(Debug, Default)]
pub struct InMemoryAllocationStore {
    state: Mutex<MemoryState>,
}

impl InMemoryAllocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose directory already holds the given trunk names.
    pub fn with_trunks<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.add_trunk(name);
        }
        store
    }

    /// Register a trunk in the directory. Returns its id.
    pub fn add_trunk(&self, name: impl Into<String>) -> DbId {
        let mut state = self.lock();
        state.next_trunk_id += 1;
        let id = state.next_trunk_id;
        state.trunks.push(TrunkEntry {
            id,
            trunkname: name.into(),
        });
        id
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // Every update is a single push or retain, so poisoned state is still whole.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AllocationStore for InMemoryAllocationStore {
    async fn list_trunks(&self) -> Result<Vec<TrunkEntry>, CoreError> {
        let mut trunks = self.lock().trunks.clone();
        trunks.sort_by(|a, b| a.trunkname.cmp(&b.trunkname));
        Ok(trunks)
    }

    async fn fetch_allocation(&self, bucket: &str) -> Result<Vec<PersistedAllocation>, CoreError> {
        Ok(self.lock().buckets.get(bucket).cloned().unwrap_or_default())
    }

    async fn replace_allocation(
        &self,
        bucket: &str,
        rows: &[ValidAllocation],
    ) -> Result<Vec<PersistedAllocation>, CoreError> {
        let mut state = self.lock();
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            state.next_row_id += 1;
            stored.push(PersistedAllocation {
                id: state.next_row_id,
                trunk_name: row.trunk_name.clone(),
                percentage: row.percentage,
                status: row.status,
            });
        }
        state.buckets.insert(bucket.to_string(), stored.clone());
        Ok(stored)
    }

    async fn list_allocations(&self) -> Result<Vec<BucketAllocation>, CoreError> {
        let state = self.lock();
        Ok(state
            .buckets
            .iter()
            .flat_map(|(user, rows)| {
                rows.iter().map(move |row| BucketAllocation {
                    user: user.clone(),
                    row: row.clone(),
                })
            })
            .collect())
    }

    async fn delete_allocation(&self, bucket: &str) -> Result<u64, CoreError> {
        let removed = self.lock().buckets.remove(bucket);
        Ok(removed.map_or(0, |rows| rows.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::Percentage;

    fn valid(trunk: &str, pct: i64) -> ValidAllocation {
        ValidAllocation {
            trunk_name: trunk.to_string(),
            percentage: Percentage::new(pct).unwrap(),
            status: true,
        }
    }

    #[tokio::test]
    async fn unknown_bucket_has_no_rows() {
        let store = InMemoryAllocationStore::new();
        assert!(store.fetch_allocation("LB-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_discards_previous_rows() {
        let store = InMemoryAllocationStore::new();
        store
            .replace_allocation("LB-1", &[valid("A", 50), valid("B", 50)])
            .await
            .unwrap();
        let second = store
            .replace_allocation("LB-1", &[valid("C", 100)])
            .await
            .unwrap();

        let rows = store.fetch_allocation("LB-1").await.unwrap();
        assert_eq!(rows, second);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trunk_name, "C");
    }

    #[tokio::test]
    async fn replace_is_idempotent_in_content() {
        let store = InMemoryAllocationStore::new();
        let input = [valid("A", 60), valid("B", 40)];
        store.replace_allocation("LB-1", &input).await.unwrap();
        store.replace_allocation("LB-1", &input).await.unwrap();

        let rows = store.fetch_allocation("LB-1").await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.trunk_name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[tokio::test]
    async fn list_allocations_groups_by_bucket() {
        let store = InMemoryAllocationStore::new();
        store.replace_allocation("LB-2", &[valid("B", 100)]).await.unwrap();
        store.replace_allocation("LB-1", &[valid("A", 100)]).await.unwrap();

        let all = store.list_allocations().await.unwrap();
        let users: Vec<_> = all.iter().map(|a| a.user.as_str()).collect();
        assert_eq!(users, ["LB-1", "LB-2"]);
    }

    #[tokio::test]
    async fn delete_reports_removed_rows() {
        let store = InMemoryAllocationStore::new();
        store
            .replace_allocation("LB-1", &[valid("A", 50), valid("B", 50)])
            .await
            .unwrap();
        assert_eq!(store.delete_allocation("LB-1").await.unwrap(), 2);
        assert_eq!(store.delete_allocation("LB-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn trunks_are_listed_by_name() {
        let store = InMemoryAllocationStore::with_trunks(["TrunkB", "TrunkA"]);
        let names: Vec<_> = store
            .list_trunks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.trunkname)
            .collect();
        assert_eq!(names, ["TrunkA", "TrunkB"]);
    }
}
