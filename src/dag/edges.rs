// src/dag/edges.rs

//! Arena of vertices for one partition and the edge bookkeeping on it.
//!
//! Every link is written on both ends: `pred -> succ` puts `succ` into the
//! predecessor's successor lists and `pred` into the successor's predecessor
//! lists. Links are add-if-absent, so drawing the same edge twice is a no-op.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::dag::vertex::{Vertex, push_unique, remove_first};
use crate::types::VertexId;

#[derive(Debug, Default)]
pub(crate) struct VertexStore {
    pub(crate) vertices: HashMap<VertexId, Vertex>,
}

impl VertexStore {
    /// Store `vertex` without drawing any edge.
    ///
    /// A resubmitted id overwrites the stored record. Edges to neighbours it
    /// no longer declares are detached on both ends and the affected timing
    /// is recomputed; edges it still declares stay drawn.
    pub(crate) fn stage(&mut self, mut vertex: Vertex) {
        let id = vertex.id;
        let Some(existing) = self.vertices.get_mut(&id) else {
            vertex.reset_links();
            self.vertices.insert(id, vertex);
            return;
        };

        let (dropped_predecessors, dropped_successors) = existing.absorb(vertex);

        for pred in &dropped_predecessors {
            self.detach_successor(*pred, id);
            self.detach_predecessor(id, *pred);
        }
        for succ in &dropped_successors {
            self.detach_predecessor(*succ, id);
            self.detach_successor(id, *succ);
            self.refresh_timing(*succ);
        }
        if !dropped_predecessors.is_empty() {
            self.refresh_timing(id);
        }
    }

    /// Draw every edge `id` declares whose other end is already stored.
    /// Unknown ids are skipped; that neighbour links itself when it arrives.
    pub(crate) fn draw_side(&mut self, id: VertexId) {
        let Some(vertex) = self.vertices.get(&id) else {
            return;
        };
        let predecessor_ids = vertex.predecessor_ids.clone();
        let successor_ids = vertex.successor_ids.clone();

        for pred in predecessor_ids {
            if pred != id && self.vertices.contains_key(&pred) {
                self.draw_parent(id, pred);
            }
        }

        for succ in successor_ids {
            if succ != id && self.vertices.contains_key(&succ) {
                self.draw_children(id, succ);
            }
        }
    }

    /// Link `id` to stored vertices that declared it before it existed.
    pub(crate) fn draw_pending_declarations(&mut self, id: VertexId) {
        let mut parents = Vec::new();
        let mut children = Vec::new();
        for other in self.vertices.values() {
            if other.id == id {
                continue;
            }
            if other.successor_ids.contains(&id) && !other.linked_successors.contains(&id) {
                parents.push(other.id);
            }
            if other.predecessor_ids.contains(&id) && !other.linked_predecessors.contains(&id) {
                children.push(other.id);
            }
        }

        for parent in parents {
            self.draw_parent(id, parent);
        }
        for child in children {
            self.draw_parent(child, id);
        }
    }

    /// Link `parent -> vertex` and recompute the vertex's predecessor timing.
    pub(crate) fn draw_parent(&mut self, vertex_id: VertexId, parent_id: VertexId) {
        if !self.link(parent_id, vertex_id) {
            return;
        }
        self.refresh_timing(vertex_id);
    }

    /// Link `vertex -> child`.
    ///
    /// The child's timing is only computed when this call creates the link;
    /// redrawing an existing edge leaves it as last computed.
    pub(crate) fn draw_children(&mut self, vertex_id: VertexId, child_id: VertexId) {
        let newly_linked = self
            .vertices
            .get(&child_id)
            .is_some_and(|child| !child.linked_predecessors.contains(&vertex_id));

        if !self.link(vertex_id, child_id) {
            return;
        }
        if newly_linked {
            self.refresh_timing(child_id);
        }
    }

    /// Write the edge `pred -> succ` on both ends. Returns `false` if either
    /// end is missing.
    fn link(&mut self, pred_id: VertexId, succ_id: VertexId) -> bool {
        if pred_id == succ_id
            || !self.vertices.contains_key(&pred_id)
            || !self.vertices.contains_key(&succ_id)
        {
            return false;
        }

        let mut added = false;
        if let Some(pred) = self.vertices.get_mut(&pred_id) {
            added |= push_unique(&mut pred.successor_ids, succ_id);
            added |= push_unique(&mut pred.linked_successors, succ_id);
        }
        if let Some(succ) = self.vertices.get_mut(&succ_id) {
            added |= push_unique(&mut succ.predecessor_ids, pred_id);
            added |= push_unique(&mut succ.linked_predecessors, pred_id);
        }

        if added {
            debug!(from = pred_id, to = succ_id, "edge drawn");
        }
        true
    }

    /// Remove `succ_id` from the successor lists of `pred_id` (one match each).
    pub(crate) fn detach_successor(&mut self, pred_id: VertexId, succ_id: VertexId) {
        if let Some(pred) = self.vertices.get_mut(&pred_id) {
            let by_id = remove_first(&mut pred.successor_ids, succ_id);
            let by_link = remove_first(&mut pred.linked_successors, succ_id);
            if by_id || by_link {
                debug!(from = pred_id, to = succ_id, "successor detached");
            }
        }
    }

    /// Remove `pred_id` from the predecessor lists of `succ_id` (one match each).
    pub(crate) fn detach_predecessor(&mut self, succ_id: VertexId, pred_id: VertexId) {
        if let Some(succ) = self.vertices.get_mut(&succ_id) {
            let by_id = remove_first(&mut succ.predecessor_ids, pred_id);
            let by_link = remove_first(&mut succ.linked_predecessors, pred_id);
            if by_id || by_link {
                debug!(from = pred_id, to = succ_id, "predecessor detached");
            }
        }
    }

    /// `max_predecessor_end` is the latest `planned_end` over the linked
    /// predecessors that have one, first-seen winning ties; the gap is
    /// measured from it.
    pub(crate) fn refresh_timing(&mut self, id: VertexId) {
        let Some(vertex) = self.vertices.get(&id) else {
            return;
        };

        let mut latest: Option<DateTime<Utc>> = None;
        for pred_id in &vertex.linked_predecessors {
            if let Some(pred) = self.vertices.get(pred_id).filter(|p| p.has_planned_end()) {
                if latest.is_none_or(|end| pred.planned_end > end) {
                    latest = Some(pred.planned_end);
                }
            }
        }

        if let Some(vertex) = self.vertices.get_mut(&id) {
            match latest {
                Some(end) => {
                    vertex.max_predecessor_end = Some(end);
                    vertex.min_predecessor_gap = vertex.planned_start - end;
                }
                None => vertex.reset_timing(),
            }
        }
    }

    /// Every vertex reachable from `roots` along linked successors, roots
    /// included.
    pub(crate) fn descendants_of(&self, roots: &[VertexId]) -> HashSet<VertexId> {
        let mut seen: HashSet<VertexId> = HashSet::new();
        let mut stack: Vec<VertexId> = roots.to_vec();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(vertex) = self.vertices.get(&id) {
                stack.extend(vertex.linked_successors.iter().copied());
            }
        }

        seen
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.vertices
            .values()
            .map(|v| v.linked_successors.len())
            .sum()
    }
}
