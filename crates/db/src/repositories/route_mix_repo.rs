//! Repository for the `route_mix` table.
//!
//! A bucket's allocation is only ever written as a whole: the previous rows
//! are deleted and the new set inserted inside one transaction. Writers to
//! the same bucket are serialized by a transaction-scoped advisory lock, so
//! the last committed save is the whole allocation.

use routemix_core::allocation::ValidAllocation;
use sqlx::{PgConnection, PgPool};

use crate::models::route_mix::RouteMix;

/// Column list for `route_mix` queries.
const COLUMNS: &str = "\
    id, user_name, route_name, percentage, status, \
    created_at, updated_at";

/// Provides data access for load-balance allocations.
pub struct RouteMixRepo;

impl RouteMixRepo {
    /// Take the per-bucket write lock for the rest of the current transaction.
    ///
    /// Must be called on a connection inside an open transaction; the lock is
    /// released on commit or rollback.
    pub async fn lock_bucket(conn: &mut PgConnection, user_name: &str) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(user_name)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// List the rows of one bucket in insertion order.
    pub async fn list_by_user(pool: &PgPool, user_name: &str) -> Result<Vec<RouteMix>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM route_mix WHERE user_name = $1 ORDER BY id");
        sqlx::query_as::<_, RouteMix>(&query)
            .bind(user_name)
            .fetch_all(pool)
            .await
    }

    /// List every row, ordered by bucket then id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<RouteMix>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM route_mix ORDER BY user_name, id");
        sqlx::query_as::<_, RouteMix>(&query)
            .fetch_all(pool)
            .await
    }

    /// Replace the whole allocation of `user_name` with `rows`.
    ///
    /// Runs in a single transaction; on error nothing changes.
    pub async fn replace_for_user(
        pool: &PgPool,
        user_name: &str,
        rows: &[ValidAllocation],
    ) -> Result<Vec<RouteMix>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_bucket(&mut *tx, user_name).await?;

        let removed = sqlx::query("DELETE FROM route_mix WHERE user_name = $1")
            .bind(user_name)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let query = format!(
            "INSERT INTO route_mix (user_name, route_name, percentage, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let inserted = sqlx::query_as::<_, RouteMix>(&query)
                .bind(user_name)
                .bind(&row.trunk_name)
                .bind(i16::from(row.percentage.value()))
                .bind(i16::from(row.status))
                .fetch_one(&mut *tx)
                .await?;
            results.push(inserted);
        }

        tx.commit().await?;

        tracing::debug!(
            user_name,
            removed,
            inserted = results.len(),
            "Replaced route_mix rows",
        );
        Ok(results)
    }

    /// Delete every row of a bucket.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_by_user(pool: &PgPool, user_name: &str) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_bucket(&mut *tx, user_name).await?;

        let result = sqlx::query("DELETE FROM route_mix WHERE user_name = $1")
            .bind(user_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
