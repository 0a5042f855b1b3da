//! Allocation rule engine.

use std::collections::HashSet;

use super::{
    AllocationError, AllocationRow, Percentage, TrunkEntry, ValidAllocation, REQUIRED_TOTAL,
};

/// Sum of all row percentages; unset cells count as zero.
///
/// Entered values are floating point, so arbitrarily large input cannot
/// overflow the running total.
pub fn compute_total(rows: &[AllocationRow]) -> f64 {
    rows.iter().filter_map(|row| row.percentage).sum()
}

/// Check a working set and, if it is persistable, return the typed rows.
///
/// Rules are evaluated in order and the first failure is returned:
///
/// 1. every row names a trunk ([`AllocationError::MissingTrunk`]),
/// 2. every row has a percentage ([`AllocationError::MissingPercentage`]),
/// 3. every percentage is quantized ([`AllocationError::InvalidQuantization`]),
/// 4. the percentages sum to exactly 100 ([`AllocationError::TotalMismatch`]).
pub fn validate(rows: &[AllocationRow]) -> Result<Vec<ValidAllocation>, AllocationError> {
    if let Some(row) = rows.iter().position(|r| r.trunk_name.trim().is_empty()) {
        return Err(AllocationError::MissingTrunk { row });
    }

    if let Some(row) = rows.iter().position(|r| r.percentage.is_none()) {
        return Err(AllocationError::MissingPercentage { row });
    }

    let mut valid = Vec::with_capacity(rows.len());
    for (row, entry) in rows.iter().enumerate() {
        let value = entry
            .percentage
            .ok_or(AllocationError::MissingPercentage { row })?;
        let percentage =
            Percentage::from_number(value).ok_or(AllocationError::InvalidQuantization { row, value })?;
        valid.push(ValidAllocation {
            trunk_name: entry.trunk_name.trim().to_string(),
            percentage,
            status: entry.status,
        });
    }

    // Every row is a whole member of the set here, so the sum is exact.
    let total = compute_total(rows);
    if total != REQUIRED_TOTAL as f64 {
        return Err(AllocationError::TotalMismatch { total });
    }

    Ok(valid)
}

/// First validated row whose trunk is missing from the directory.
pub fn unknown_trunk<'a>(rows: &'a [ValidAllocation], directory: &[TrunkEntry]) -> Option<&'a str> {
    let known: HashSet<&str> = directory.iter().map(|t| t.trunkname.as_str()).collect();
    rows.iter()
        .map(|row| row.trunk_name.as_str())
        .find(|name| !known.contains(name))
}
