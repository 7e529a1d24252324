// src/dag/vertex.rs

//! Vertex records: one scheduled activity plus its edge bookkeeping.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PlanStatus, VertexId};

/// Business attributes carried by a vertex.
///
/// The graph never interprets these beyond copying them on update; they are
/// here so hosts can round-trip their records through the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexPayload {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: PlanStatus,

    /// Owning sub-branch.
    #[serde(default)]
    pub branch_id: i64,

    /// Owning unit.
    #[serde(default)]
    pub unit_id: i64,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Number of crew task sheets already completed for this plan.
    #[serde(default)]
    pub completed_task_count: u32,
}

/// One scheduled activity in a partition graph.
///
/// `predecessor_ids` / `successor_ids` are what the host declared. The
/// *linked* lists only contain neighbours that were present in the graph when
/// the edge was drawn; they are maintained by [`crate::dag::Graph`] and are
/// ignored when a vertex is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,

    /// Declared predecessors (TOML key `predecessors`).
    #[serde(default, rename = "predecessors")]
    pub predecessor_ids: Vec<VertexId>,

    /// Declared successors (TOML key `successors`).
    #[serde(default, rename = "successors")]
    pub successor_ids: Vec<VertexId>,

    #[serde(default)]
    pub planned_start: DateTime<Utc>,

    #[serde(default)]
    pub planned_end: DateTime<Utc>,

    #[serde(default)]
    pub actual_start: Option<DateTime<Utc>>,

    #[serde(default)]
    pub actual_end: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub payload: VertexPayload,

    #[serde(skip)]
    pub(crate) linked_predecessors: Vec<VertexId>,

    #[serde(skip)]
    pub(crate) linked_successors: Vec<VertexId>,

    #[serde(skip, default = "TimeDelta::zero")]
    pub(crate) min_predecessor_gap: TimeDelta,

    #[serde(skip)]
    pub(crate) max_predecessor_end: Option<DateTime<Utc>>,
}

impl Vertex {
    /// Creates an unlinked vertex with the given planned window.
    pub fn new(id: VertexId, planned_start: DateTime<Utc>, planned_end: DateTime<Utc>) -> Self {
        Self {
            id,
            predecessor_ids: Vec::new(),
            successor_ids: Vec::new(),
            planned_start,
            planned_end,
            actual_start: None,
            actual_end: None,
            payload: VertexPayload::default(),
            linked_predecessors: Vec::new(),
            linked_successors: Vec::new(),
            min_predecessor_gap: TimeDelta::zero(),
            max_predecessor_end: None,
        }
    }

    /// Predecessors currently linked in the owning graph.
    pub fn predecessors(&self) -> &[VertexId] {
        &self.linked_predecessors
    }

    /// Successors currently linked in the owning graph.
    pub fn successors(&self) -> &[VertexId] {
        &self.linked_successors
    }

    /// `planned_start - max_predecessor_end` as of the last edge draw.
    pub fn min_predecessor_gap(&self) -> TimeDelta {
        self.min_predecessor_gap
    }

    /// Latest `planned_end` among linked predecessors as of the last edge
    /// draw, or `None` if no predecessor has been linked yet.
    pub fn max_predecessor_end(&self) -> Option<DateTime<Utc>> {
        self.max_predecessor_end
    }

    /// A planned end left at the Unix epoch (the serde default) counts as
    /// "not planned yet" and is ignored when timing successors.
    pub fn has_planned_end(&self) -> bool {
        self.planned_end != DateTime::<Utc>::UNIX_EPOCH
    }

    pub fn planned_duration(&self) -> TimeDelta {
        self.planned_end - self.planned_start
    }

    /// Name used in diagnostics; falls back to `#<id>` for unnamed plans.
    pub fn display_name(&self) -> String {
        if self.payload.name.is_empty() {
            format!("#{}", self.id)
        } else {
            self.payload.name.clone()
        }
    }

    /// Drop any derived state so the record can enter a graph fresh.
    pub(crate) fn reset_links(&mut self) {
        dedup_in_order(&mut self.predecessor_ids);
        dedup_in_order(&mut self.successor_ids);
        self.linked_predecessors.clear();
        self.linked_successors.clear();
        self.reset_timing();
    }

    pub(crate) fn reset_timing(&mut self) {
        self.min_predecessor_gap = TimeDelta::zero();
        self.max_predecessor_end = None;
    }

    /// Resubmission of an already-stored id: the incoming record replaces
    /// window, payload and declared neighbour ids. Links to neighbours that
    /// are still declared survive.
    ///
    /// Returns the neighbours no longer declared, predecessors first; the
    /// caller detaches them on both ends.
    pub(crate) fn absorb(&mut self, mut incoming: Vertex) -> (Vec<VertexId>, Vec<VertexId>) {
        dedup_in_order(&mut incoming.predecessor_ids);
        dedup_in_order(&mut incoming.successor_ids);

        let dropped_predecessors = undeclared(
            &self.predecessor_ids,
            &self.linked_predecessors,
            &incoming.predecessor_ids,
        );
        let dropped_successors = undeclared(
            &self.successor_ids,
            &self.linked_successors,
            &incoming.successor_ids,
        );

        self.predecessor_ids = incoming.predecessor_ids;
        self.successor_ids = incoming.successor_ids;
        self.planned_start = incoming.planned_start;
        self.planned_end = incoming.planned_end;
        self.actual_start = incoming.actual_start;
        self.actual_end = incoming.actual_end;
        self.payload = incoming.payload;

        (dropped_predecessors, dropped_successors)
    }
}

/// Append `id` unless already present. Returns `true` if it was appended.
pub(crate) fn push_unique(ids: &mut Vec<VertexId>, id: VertexId) -> bool {
    if ids.contains(&id) {
        false
    } else {
        ids.push(id);
        true
    }
}

fn dedup_in_order(ids: &mut Vec<VertexId>) {
    let mut kept = Vec::with_capacity(ids.len());
    for id in ids.drain(..) {
        push_unique(&mut kept, id);
    }
    *ids = kept;
}

fn undeclared(declared: &[VertexId], linked: &[VertexId], kept: &[VertexId]) -> Vec<VertexId> {
    let mut dropped = Vec::new();
    for id in declared.iter().chain(linked) {
        if !kept.contains(id) {
            push_unique(&mut dropped, *id);
        }
    }
    dropped
}

/// Remove the first occurrence of `id`. Returns `true` if something was removed.
pub(crate) fn remove_first(ids: &mut Vec<VertexId>, id: VertexId) -> bool {
    match ids.iter().position(|&x| x == id) {
        Some(idx) => {
            ids.remove(idx);
            true
        }
        None => false,
    }
}
