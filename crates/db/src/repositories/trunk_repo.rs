//! Repository for the `tariff_trunks` table.

use sqlx::PgPool;

use crate::models::trunk::TariffTrunk;

/// Column list for `tariff_trunks` queries.
const COLUMNS: &str = "id, trunkname, created_at, updated_at";

/// Provides read access to the trunk directory.
pub struct TrunkRepo;

impl TrunkRepo {
    /// List every trunk, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<TariffTrunk>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tariff_trunks ORDER BY trunkname");
        sqlx::query_as::<_, TariffTrunk>(&query)
            .fetch_all(pool)
            .await
    }
}
