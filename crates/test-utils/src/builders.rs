#![allow(dead_code)]

use chrono::{DateTime, Utc};
use plandag::config::{PartitionSection, PlanFile, RawPlanFile};
use plandag::{PartitionKey, PlanStatus, Vertex, VertexId};

use crate::day;

/// Builder for `Vertex` to simplify test setup.
pub struct VertexBuilder {
    vertex: Vertex,
}

impl VertexBuilder {
    /// Vertex with no window set (both ends at the epoch).
    pub fn new(id: VertexId) -> Self {
        Self {
            vertex: Vertex::new(id, DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.vertex.payload.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.vertex.payload.description = description.to_string();
        self
    }

    pub fn status(mut self, status: PlanStatus) -> Self {
        self.vertex.payload.status = status;
        self
    }

    pub fn unit(mut self, unit_id: i64) -> Self {
        self.vertex.payload.unit_id = unit_id;
        self
    }

    pub fn after(mut self, pred: VertexId) -> Self {
        self.vertex.predecessor_ids.push(pred);
        self
    }

    pub fn before(mut self, succ: VertexId) -> Self {
        self.vertex.successor_ids.push(succ);
        self
    }

    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.vertex.planned_start = start;
        self.vertex.planned_end = end;
        self
    }

    /// Window in whole days from the fixture base date; see [`crate::day`].
    pub fn days(self, start: i64, end: i64) -> Self {
        self.window(day(start), day(end))
    }

    pub fn build(self) -> Vertex {
        self.vertex
    }
}

/// Builder for `PlanFile`.
pub struct PlanFileBuilder {
    plan: RawPlanFile,
}

impl PlanFileBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile::default(),
        }
    }

    pub fn with_vertex(mut self, key: PartitionKey, vertex: Vertex) -> Self {
        match self.plan.partition.iter_mut().find(|p| p.key == key) {
            Some(section) => section.vertex.push(vertex),
            None => self.plan.partition.push(PartitionSection {
                key,
                vertex: vec![vertex],
            }),
        }
        self
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
