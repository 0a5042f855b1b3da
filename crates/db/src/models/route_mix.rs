//! Load-balance allocation models.

use routemix_core::allocation::{BucketAllocation, PersistedAllocation, Percentage};
use routemix_core::error::CoreError;
use routemix_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `route_mix` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RouteMix {
    pub id: DbId,
    pub user_name: String,
    pub route_name: String,
    pub percentage: i16,
    pub status: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RouteMix {
    /// Convert to the domain shape.
    ///
    /// The column carries a check constraint, so an unquantized value means
    /// the table was edited behind the application's back.
    pub fn into_persisted(self) -> Result<PersistedAllocation, CoreError> {
        let percentage = Percentage::new(i64::from(self.percentage)).ok_or_else(|| {
            CoreError::Internal(format!(
                "route_mix row {} has unquantized percentage {}",
                self.id, self.percentage
            ))
        })?;
        Ok(PersistedAllocation {
            id: self.id,
            trunk_name: self.route_name,
            percentage,
            status: self.status != 0,
        })
    }

    pub fn into_bucket_allocation(self) -> Result<BucketAllocation, CoreError> {
        let user = self.user_name.clone();
        Ok(BucketAllocation {
            user,
            row: self.into_persisted()?,
        })
    }
}
