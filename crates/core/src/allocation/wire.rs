//! JSON shapes exchanged with the `/routemix` endpoints.
//!
//! The panel sends the `status` flag as `1`/`0` and the percentage as
//! whatever the selector produced (number, numeric string, or empty), so
//! the request side is lenient and the validator decides.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{AllocationRow, RowOrigin, ValidAllocation};

/// Serde adapter for the `1 = active` status column.
pub mod status_flag {
    use super::*;

    pub fn serialize<S: Serializer>(active: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i16(i16::from(*active))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Int(i64),
            Bool(bool),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Int(n) => n != 0,
            Flag::Bool(b) => b,
        })
    }
}

pub(crate) fn default_active() -> bool {
    true
}

/// Accept `60`, `55.5`, `"60"`, `""` and `null` for a percentage cell.
///
/// Any other JSON value counts as unset, so every body shape reaches the
/// validator instead of failing extraction.
fn lenient_percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Other(_)) => None,
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => super::parse_percentage_input(&s),
    })
}

/// One trunk entry of a batch-save request, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationInput {
    #[serde(default)]
    pub route_name: String,
    #[serde(default, deserialize_with = "lenient_percentage")]
    pub percentage: Option<f64>,
    #[serde(with = "status_flag", default = "default_active")]
    pub status: bool,
}

impl From<AllocationInput> for AllocationRow {
    fn from(input: AllocationInput) -> Self {
        AllocationRow {
            trunk_name: input.route_name,
            percentage: input.percentage,
            status: input.status,
            origin: RowOrigin::Scratch,
        }
    }
}

/// Body of `POST /routemix/batch-save` as received by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSaveRequest {
    /// The bucket whose allocation is replaced.
    pub user: String,
    #[serde(default)]
    pub trunks: Vec<AllocationInput>,
}

/// Body of `POST /routemix/batch-save` as sent by the client.
///
/// Only validated rows can be put on the wire.
#[derive(Debug, Serialize)]
pub struct BatchSavePayload<'a> {
    pub user: &'a str,
    pub trunks: &'a [ValidAllocation],
}
