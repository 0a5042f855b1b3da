//! Trunk directory models.

use routemix_core::allocation::TrunkEntry;
use routemix_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tariff_trunks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TariffTrunk {
    pub id: DbId,
    pub trunkname: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<TariffTrunk> for TrunkEntry {
    fn from(row: TariffTrunk) -> Self {
        TrunkEntry {
            id: row.id,
            trunkname: row.trunkname,
        }
    }
}
