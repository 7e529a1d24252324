use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a vertex; unique within one partition only.
pub type VertexId = i64;

/// External key selecting one isolated graph in a [`crate::GraphCache`].
pub type PartitionKey = i64;

/// Execution status of a plan vertex.
///
/// Serialized as its snake_case name. Plan files may also give the numeric
/// code hosts store it as (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "StatusRepr")]
pub enum PlanStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl PlanStatus {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PlanStatus::NotStarted),
            1 => Some(PlanStatus::InProgress),
            2 => Some(PlanStatus::Completed),
            _ => None,
        }
    }
}

/// Either form a status may take in a plan file.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<StatusRepr> for PlanStatus {
    type Error = String;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(code) => PlanStatus::from_code(code)
                .ok_or_else(|| format!("invalid plan status code: {code} (expected 0, 1 or 2)")),
            StatusRepr::Name(name) => name.parse(),
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanStatus::NotStarted => "not_started",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not_started" | "0" => Ok(PlanStatus::NotStarted),
            "in_progress" | "1" => Ok(PlanStatus::InProgress),
            "completed" | "2" => Ok(PlanStatus::Completed),
            other => Err(format!(
                "invalid plan status: {other} (expected \"not_started\", \"in_progress\" or \"completed\")"
            )),
        }
    }
}
