//! [`AllocationStore`] backed by Postgres.

use async_trait::async_trait;
use routemix_core::allocation::{
    BucketAllocation, PersistedAllocation, TrunkEntry, ValidAllocation,
};
use routemix_core::error::CoreError;
use routemix_core::store::AllocationStore;

use crate::error::into_core_error;
use crate::repositories::{RouteMixRepo, TrunkRepo};
use crate::DbPool;

/// Postgres-backed allocation store used by the API server.
#[derive(Debug, Clone)]
pub struct PgAllocationStore {
    pool: DbPool,
}

impl PgAllocationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AllocationStore for PgAllocationStore {
    async fn list_trunks(&self) -> Result<Vec<TrunkEntry>, CoreError> {
        let trunks = TrunkRepo::list(&self.pool).await.map_err(into_core_error)?;
        Ok(trunks.into_iter().map(TrunkEntry::from).collect())
    }

    async fn fetch_allocation(&self, bucket: &str) -> Result<Vec<PersistedAllocation>, CoreError> {
        RouteMixRepo::list_by_user(&self.pool, bucket)
            .await
            .map_err(into_core_error)?
            .into_iter()
            .map(|row| row.into_persisted())
            .collect()
    }

    async fn replace_allocation(
        &self,
        bucket: &str,
        rows: &[ValidAllocation],
    ) -> Result<Vec<PersistedAllocation>, CoreError> {
        RouteMixRepo::replace_for_user(&self.pool, bucket, rows)
            .await
            .map_err(into_core_error)?
            .into_iter()
            .map(|row| row.into_persisted())
            .collect()
    }

    async fn list_allocations(&self) -> Result<Vec<BucketAllocation>, CoreError> {
        RouteMixRepo::list_all(&self.pool)
            .await
            .map_err(into_core_error)?
            .into_iter()
            .map(|row| row.into_bucket_allocation())
            .collect()
    }

    async fn delete_allocation(&self, bucket: &str) -> Result<u64, CoreError> {
        RouteMixRepo::delete_by_user(&self.pool, bucket)
            .await
            .map_err(into_core_error)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(into_core_error)
    }
}
