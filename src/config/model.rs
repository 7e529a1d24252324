// src/config/model.rs

use serde::Deserialize;

use crate::dag::Vertex;
use crate::types::PartitionKey;

/// Plan file exactly as read from TOML, before validation.
///
/// ```toml
/// [[partition]]
/// key = 111
///
/// [[partition.vertex]]
/// id = 1
/// name = "foundation"
/// successors = [2]
/// planned_start = "2015-03-20T08:00:00Z"
/// planned_end = "2015-03-25T18:00:00Z"
///
/// [[partition.vertex]]
/// id = 2
/// name = "frame"
/// predecessors = [1]
/// planned_start = "2015-03-27T08:00:00Z"
/// planned_end = "2015-04-02T18:00:00Z"
/// ```
///
/// Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlanFile {
    #[serde(default)]
    pub partition: Vec<PartitionSection>,
}

/// `[[partition]]` section: one isolated graph and its vertices.
#[derive(Debug, Clone, Deserialize)]
pub struct PartitionSection {
    pub key: PartitionKey,

    #[serde(default)]
    pub vertex: Vec<Vertex>,
}

/// A plan file that passed [`crate::config::validate`].
///
/// Only obtainable through `PlanFile::try_from(RawPlanFile)`.
#[derive(Debug, Clone)]
pub struct PlanFile {
    partition: Vec<PartitionSection>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(partition: Vec<PartitionSection>) -> Self {
        Self { partition }
    }

    pub fn partitions(&self) -> &[PartitionSection] {
        &self.partition
    }

    pub fn vertex_count(&self) -> usize {
        self.partition.iter().map(|p| p.vertex.len()).sum()
    }
}
