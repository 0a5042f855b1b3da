//! Load-balance allocation rows and rules.
//!
//! A load-balance bucket (a logical "virtual trunk") fans traffic out across
//! real trunks. Each [`AllocationRow`] gives one trunk a share of the
//! bucket's traffic. Rows are edited freely and only become persistable once
//! [`validate`] turns them into [`ValidAllocation`]s.

pub mod percentage;
pub mod validate;
pub mod wire;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub use percentage::{Percentage, ALLOWED_PERCENTAGES, REQUIRED_TOTAL};
pub use validate::{compute_total, unknown_trunk, validate};

/// Fallback shown when a save fails without a collaborator message.
pub const SAVE_FAILED_FALLBACK: &str = "Failed to save load balance";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Where a working row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// Loaded from the stored allocation with this row id.
    Persisted(DbId),
    /// Added in the editor and never saved.
    Scratch,
}

/// One editable entry in a bucket's working set.
///
/// `percentage` holds the number the operator entered, fractions included;
/// it is only guaranteed to be quantized after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRow {
    pub trunk_name: String,
    pub percentage: Option<f64>,
    pub status: bool,
    pub origin: RowOrigin,
}

impl AllocationRow {
    /// An empty scratch row awaiting trunk and percentage.
    pub fn blank() -> Self {
        Self {
            trunk_name: String::new(),
            percentage: None,
            status: true,
            origin: RowOrigin::Scratch,
        }
    }

    /// The implicit default for a bucket with no allocation: 100% to a
    /// trunk the operator has yet to choose.
    pub fn seeded() -> Self {
        Self {
            percentage: Some(f64::from(Percentage::FULL)),
            ..Self::blank()
        }
    }

    pub fn from_persisted(row: &PersistedAllocation) -> Self {
        Self {
            trunk_name: row.trunk_name.clone(),
            percentage: Some(f64::from(row.percentage)),
            status: row.status,
            origin: RowOrigin::Persisted(row.id),
        }
    }

    pub fn is_scratch(&self) -> bool {
        self.origin == RowOrigin::Scratch
    }

    /// Apply a single-field edit.
    pub fn apply(&mut self, edit: RowEdit) {
        match edit {
            RowEdit::TrunkName(name) => self.trunk_name = name,
            RowEdit::Percentage(raw) => self.percentage = parse_percentage_input(&raw),
            RowEdit::Status(active) => self.status = active,
        }
    }
}

/// A change to one field of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEdit {
    TrunkName(String),
    /// Raw selector text; empty or non-numeric input clears the value.
    Percentage(String),
    Status(bool),
}

/// Coerce selector input to a number.
///
/// Blank input means "cleared". Non-numeric input (including `NaN` and
/// infinities) is treated the same way, so it surfaces later as a missing
/// percentage. Any finite number is kept, fractions included.
pub fn parse_percentage_input(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('%').trim_end();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Rows shown when an operator selects a bucket.
///
/// No stored rows: a single seeded 100% row. Otherwise the stored rows
/// unchanged followed by one blank scratch row for adding a trunk.
pub fn rows_for_bucket(existing: &[PersistedAllocation]) -> Vec<AllocationRow> {
    if existing.is_empty() {
        return vec![AllocationRow::seeded()];
    }
    existing
        .iter()
        .map(AllocationRow::from_persisted)
        .chain(std::iter::once(AllocationRow::blank()))
        .collect()
}

/// Rows shown when the stored allocation could not be read.
pub fn fallback_rows() -> Vec<AllocationRow> {
    vec![AllocationRow::blank()]
}

// ---------------------------------------------------------------------------
// Validated and stored shapes
// ---------------------------------------------------------------------------

/// A row that passed validation. This is the only shape persistence accepts.
///
/// Serializes to the batch-save wire entry `{route_name, percentage, status}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidAllocation {
    #[serde(rename = "route_name")]
    pub trunk_name: String,
    pub percentage: Percentage,
    #[serde(with = "wire::status_flag", default = "wire::default_active")]
    pub status: bool,
}

/// A stored allocation row for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAllocation {
    pub id: DbId,
    #[serde(rename = "route_name")]
    pub trunk_name: String,
    pub percentage: Percentage,
    #[serde(with = "wire::status_flag", default = "wire::default_active")]
    pub status: bool,
}

/// A stored row together with the bucket it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketAllocation {
    pub user: String,
    #[serde(flatten)]
    pub row: PersistedAllocation,
}

/// An entry of the trunk directory (`tariff_trunks`).
///
/// The same directory feeds both the bucket selector and the per-row trunk
/// selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrunkEntry {
    pub id: DbId,
    pub trunkname: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while editing or saving an allocation.
///
/// All variants are recovered at the operator boundary: the editor keeps
/// its rows and the message is shown as a notification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("Could not load the existing load balance: {0}")]
    FetchFailed(String),

    #[error("Row {}: please select a trunk", .row + 1)]
    MissingTrunk { row: usize },

    #[error("Row {}: please select a percentage", .row + 1)]
    MissingPercentage { row: usize },

    #[error("Row {}: percentage must be one of 10, 20, ..., 100 (got {value})", .row + 1)]
    InvalidQuantization { row: usize, value: f64 },

    #[error("Total percentage must be exactly 100% (currently {total}%)")]
    TotalMismatch { total: f64 },

    #[error("{}", .0.as_deref().unwrap_or(SAVE_FAILED_FALLBACK))]
    SaveFailed(Option<String>),

    #[error("Row {index} does not exist (the allocation has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Select a load balance trunk first")]
    NoBucketSelected,
}

impl AllocationError {
    /// True for the rule failures that block a save before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AllocationError::MissingTrunk { .. }
                | AllocationError::MissingPercentage { .. }
                | AllocationError::InvalidQuantization { .. }
                | AllocationError::TotalMismatch { .. }
        )
    }
}

impl From<AllocationError> for CoreError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::FetchFailed(_) | AllocationError::SaveFailed(_) => {
                CoreError::Internal(err.to_string())
            }
            other => CoreError::Validation(other.to_string()),
        }
    }
}
