// src/dag/graph.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::dag::edges::VertexStore;
use crate::dag::vertex::{Vertex, push_unique};
use crate::errors::{PlanDagError, Result};
use crate::types::{PartitionKey, VertexId};

/// Dependency graph of one partition.
///
/// Owns every [`Vertex`] of the partition behind a reader/writer lock:
/// mutations take the write half, queries the read half. Queries hand out
/// clones, never live views.
#[derive(Debug)]
pub struct Graph {
    partition: PartitionKey,
    store: RwLock<VertexStore>,
}

impl Graph {
    pub fn new(partition: PartitionKey) -> Self {
        Self {
            partition,
            store: RwLock::new(VertexStore::default()),
        }
    }

    pub fn partition(&self) -> PartitionKey {
        self.partition
    }

    /// Register (or overwrite) `vertex` and draw its edges.
    ///
    /// Declared neighbours that are not stored yet are skipped. Stored
    /// vertices that already declared this id are linked to it now.
    pub fn build(&self, vertex: Vertex) {
        let id = vertex.id;
        let mut store = self.store.write();
        store.stage(vertex);
        store.draw_side(id);
        store.draw_pending_declarations(id);
        debug!(partition = self.partition, vertex = id, "vertex built");
    }

    /// Store `vertex` without drawing edges; see [`Graph::rebuild`].
    pub fn stage(&self, vertex: Vertex) {
        let id = vertex.id;
        self.store.write().stage(vertex);
        debug!(partition = self.partition, vertex = id, "vertex staged");
    }

    /// Draw the declared edges of every stored vertex.
    ///
    /// Existing edges are left alone and no propagation runs, so calling this
    /// repeatedly is harmless.
    pub fn rebuild(&self) {
        let mut store = self.store.write();
        let mut ids: Vec<VertexId> = store.vertices.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            store.draw_side(id);
        }
        debug!(
            partition = self.partition,
            vertices = store.vertices.len(),
            edges = store.edge_count(),
            "partition rebuilt"
        );
    }

    /// Replace the stored vertex with id `vertex.id` by `vertex` and redraw
    /// its edges.
    ///
    /// The edit is rejected with [`PlanDagError::CycleRejected`] before
    /// anything changes if one of the new predecessors is already downstream
    /// of the vertex. Otherwise successors overtaken by the new planned end are
    /// pushed forward, the vertex is detached from its old predecessors, its
    /// fields are overwritten, and edges are drawn from the new declarations.
    ///
    /// Declared successors are merged, not replaced: a successor edge is
    /// dropped by updating the successor.
    pub fn update(&self, vertex: Vertex) -> Result<&Self> {
        let id = vertex.id;
        let mut store = self.store.write();

        let Some(old) = store.vertices.get(&id) else {
            return Err(PlanDagError::PlanNotFound {
                partition: self.partition,
                id,
            });
        };

        // Validate before touching anything.
        let mut downstream_roots: Vec<VertexId> = old.linked_successors.clone();
        for succ in &vertex.successor_ids {
            if store.vertices.contains_key(succ) {
                push_unique(&mut downstream_roots, *succ);
            }
        }
        let downstream = store.descendants_of(&downstream_roots);
        let closing = vertex.predecessor_ids.iter().copied().find(|pred| {
            *pred == id || old.successor_ids.contains(pred) || downstream.contains(pred)
        });
        if let Some(pred) = closing {
            let predecessor = store
                .vertices
                .get(&pred)
                .map(Vertex::display_name)
                .unwrap_or_else(|| format!("#{pred}"));
            let name = vertex.display_name();
            warn!(
                partition = self.partition,
                vertex = id,
                predecessor = pred,
                "update rejected: it would close a cycle"
            );
            return Err(PlanDagError::CycleRejected {
                predecessor,
                vertex: name,
            });
        }

        // Successors planned against an earlier end move first.
        let old_successors = old.linked_successors.clone();
        let old_predecessors = old.linked_predecessors.clone();
        let mut shifts = 0usize;
        for succ in old_successors {
            if store.shift_successor(succ, vertex.planned_end) {
                shifts += 1 + store.all_children_plan_date(succ);
            }
        }

        for pred in old_predecessors {
            store.detach_successor(pred, id);
        }

        let Some(target) = store.vertices.get_mut(&id) else {
            return Err(PlanDagError::PlanNotFound {
                partition: self.partition,
                id,
            });
        };
        target.predecessor_ids.clear();
        for pred in vertex.predecessor_ids {
            push_unique(&mut target.predecessor_ids, pred);
        }
        for succ in vertex.successor_ids {
            push_unique(&mut target.successor_ids, succ);
        }
        target.planned_start = vertex.planned_start;
        target.planned_end = vertex.planned_end;
        target.actual_start = vertex.actual_start;
        target.actual_end = vertex.actual_end;
        target.payload.status = vertex.payload.status;
        target.payload.description = vertex.payload.description;
        target.payload.name = vertex.payload.name;
        target.payload.unit_id = vertex.payload.unit_id;
        target.linked_predecessors.clear();
        target.reset_timing();

        store.draw_side(id);

        info!(
            partition = self.partition,
            vertex = id,
            shifts,
            "vertex updated"
        );
        Ok(self)
    }

    /// Record `real_end` as the actual end of `id` and plan the successors
    /// that were never planned against a predecessor end.
    pub fn add_real_end_date(&self, id: VertexId, real_end: DateTime<Utc>) -> Result<usize> {
        let mut store = self.store.write();
        if !store.vertices.contains_key(&id) {
            return Err(PlanDagError::VertexNotFound(id));
        }
        let shifts = store.add_real_end_date(id, real_end);
        debug!(
            partition = self.partition,
            vertex = id,
            shifts,
            "actual end recorded"
        );
        Ok(shifts)
    }

    /// Forward pass from `id` on demand; returns the number of shifts.
    pub fn propagate_from(&self, id: VertexId) -> Result<usize> {
        let mut store = self.store.write();
        if !store.vertices.contains_key(&id) {
            return Err(PlanDagError::VertexNotFound(id));
        }
        Ok(store.all_children_plan_date(id))
    }

    /// Delete `id`, first stripping every id and link to it from the rest of
    /// the partition. Former successors are retimed against the predecessors
    /// they still have; one left with none is untimed again. Returns the
    /// remaining vertices ordered by id.
    pub fn remove(&self, id: VertexId) -> Result<Vec<Vertex>> {
        let mut store = self.store.write();
        let Some(vertex) = store.vertices.get(&id) else {
            return Err(PlanDagError::VertexNotFound(id));
        };

        let mut predecessors = vertex.predecessor_ids.clone();
        for pred in &vertex.linked_predecessors {
            push_unique(&mut predecessors, *pred);
        }
        let mut successors = vertex.successor_ids.clone();
        for succ in &vertex.linked_successors {
            push_unique(&mut successors, *succ);
        }

        for pred in predecessors {
            store.detach_successor(pred, id);
        }
        for succ in &successors {
            store.detach_predecessor(*succ, id);
            store.refresh_timing(*succ);
        }

        // Staged vertices may still declare the id without a drawn edge.
        let others: Vec<VertexId> = store
            .vertices
            .values()
            .filter(|v| {
                v.id != id && (v.predecessor_ids.contains(&id) || v.successor_ids.contains(&id))
            })
            .map(|v| v.id)
            .collect();
        for other in others {
            store.detach_successor(other, id);
            store.detach_predecessor(other, id);
        }

        store.vertices.remove(&id);
        info!(partition = self.partition, vertex = id, "vertex removed");

        Ok(sorted(store.vertices.values().cloned().collect()))
    }

    pub fn get(&self, id: VertexId) -> Option<Vertex> {
        self.store.read().vertices.get(&id).cloned()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.store.read().vertices.contains_key(&id)
    }

    /// Snapshot of all vertices, ordered by id.
    pub fn list(&self) -> Vec<Vertex> {
        sorted(self.store.read().vertices.values().cloned().collect())
    }

    /// Snapshot of the id -> vertex mapping.
    pub fn map(&self) -> BTreeMap<VertexId, Vertex> {
        self.store
            .read()
            .vertices
            .iter()
            .map(|(id, v)| (*id, v.clone()))
            .collect()
    }

    /// Follow the *first* linked successor at each level, starting below
    /// `id`. This is a single path, not the full descendant set.
    ///
    /// Returns `None` if `id` is not stored.
    pub fn recursion_children(&self, id: VertexId) -> Option<Vec<Vertex>> {
        let store = self.store.read();
        let mut current = store.vertices.get(&id)?;
        let mut chain = Vec::new();

        while chain.len() < store.vertices.len() {
            let Some(next) = current
                .linked_successors
                .first()
                .and_then(|succ| store.vertices.get(succ))
            else {
                break;
            };
            chain.push(next.clone());
            current = next;
        }

        Some(chain)
    }

    pub fn vertex_count(&self) -> usize {
        self.store.read().vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.store.read().edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().vertices.is_empty()
    }

    /// Latest planned end in the partition.
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.store
            .read()
            .vertices
            .values()
            .filter(|v| v.has_planned_end())
            .map(|v| v.planned_end)
            .max()
    }
}

fn sorted(mut vertices: Vec<Vertex>) -> Vec<Vertex> {
    vertices.sort_by_key(|v| v.id);
    vertices
}
