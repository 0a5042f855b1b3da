//! Translation of sqlx failures into domain errors.

use routemix_core::error::CoreError;

/// PostgreSQL `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `check_violation`.
const PG_CHECK_VIOLATION: &str = "23514";

/// Classify a sqlx error into a [`CoreError`].
///
/// - Unique constraint violations (constraint name starting with `uq_`) map to `Conflict`.
/// - Check constraint violations map to `Validation`.
/// - Everything else maps to `Internal` and is logged.
pub fn into_core_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(PG_UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
            Some(PG_CHECK_VIOLATION) => {
                return CoreError::Validation(format!(
                    "Value violates check constraint: {constraint}"
                ));
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_internal() {
        assert!(matches!(
            into_core_error(sqlx::Error::RowNotFound),
            CoreError::Internal(_)
        ));
    }

    #[test]
    fn pool_timeout_is_internal() {
        assert!(into_core_error(sqlx::Error::PoolTimedOut).is_transient());
    }
}
