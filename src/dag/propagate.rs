// src/dag/propagate.rs

//! Forward propagation of planned windows along successor edges.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::dag::edges::VertexStore;
use crate::types::VertexId;

impl VertexStore {
    /// Shift `succ_id` so it starts `min_predecessor_gap` after `driver_end`,
    /// if `driver_end` is later than the predecessor end it was last planned
    /// against. The planned duration is kept.
    ///
    /// Returns `true` if the successor moved.
    pub(crate) fn shift_successor(&mut self, succ_id: VertexId, driver_end: DateTime<Utc>) -> bool {
        let Some(succ) = self.vertices.get_mut(&succ_id) else {
            return false;
        };

        match succ.max_predecessor_end {
            Some(recorded) if driver_end > recorded => {
                let duration = succ.planned_end - succ.planned_start;
                succ.planned_start = driver_end + succ.min_predecessor_gap;
                succ.planned_end = succ.planned_start + duration;
                succ.max_predecessor_end = Some(driver_end);
                info!(
                    vertex = succ_id,
                    planned_start = %succ.planned_start,
                    planned_end = %succ.planned_end,
                    "successor shifted forward"
                );
                true
            }
            _ => false,
        }
    }

    /// Push `origin`'s planned end through its successors, and theirs, until
    /// no successor is overtaken.
    ///
    /// Walks an explicit worklist instead of recursing. The number of
    /// expansions is capped at `n * n` for `n` stored vertices; hitting the cap
    /// means the acyclicity guard was bypassed and the walk stops.
    ///
    /// Returns how many shifts were applied.
    pub(crate) fn all_children_plan_date(&mut self, origin: VertexId) -> usize {
        let n = self.vertices.len().max(1);
        let budget = n.saturating_mul(n);

        let mut worklist: VecDeque<VertexId> = VecDeque::from([origin]);
        let mut expansions = 0usize;
        let mut shifts = 0usize;

        while let Some(id) = worklist.pop_front() {
            if expansions >= budget {
                warn!(
                    origin,
                    budget, "propagation budget exhausted; stopping forward pass"
                );
                break;
            }
            expansions += 1;

            let Some(vertex) = self.vertices.get(&id) else {
                continue;
            };
            let end = vertex.planned_end;
            let successors = vertex.linked_successors.clone();

            for succ in successors {
                if self.shift_successor(succ, end) {
                    shifts += 1;
                    if !worklist.contains(&succ) {
                        worklist.push_back(succ);
                    }
                }
            }
        }

        debug!(origin, shifts, expansions, "forward pass finished");
        shifts
    }

    /// First-time propagation after `id` reports an actual end.
    ///
    /// Successors that were never planned against a predecessor end are moved
    /// by their own gap, stamped with their new planned end, and then pushed
    /// forward through [`VertexStore::all_children_plan_date`]. Successors that
    /// already carry a recorded predecessor end are left to `update`.
    ///
    /// `real_end` is only recorded as `actual_end`; it does not move anything.
    /// An untimed successor's gap is zero (timing is reset whenever no timed
    /// predecessor is linked), so its own shift is zero and the first pass
    /// amounts to stamping `max_predecessor_end` and propagating from there.
    pub(crate) fn add_real_end_date(&mut self, id: VertexId, real_end: DateTime<Utc>) -> usize {
        let Some(vertex) = self.vertices.get_mut(&id) else {
            return 0;
        };
        vertex.actual_end = Some(real_end);
        let successors = vertex.linked_successors.clone();

        let mut shifts = 0usize;
        for succ_id in successors {
            let Some(succ) = self.vertices.get_mut(&succ_id) else {
                continue;
            };
            if succ.max_predecessor_end.is_some() {
                continue;
            }

            let gap = succ.min_predecessor_gap;
            succ.planned_start += gap;
            succ.planned_end += gap;
            succ.max_predecessor_end = Some(succ.planned_end);
            info!(
                vertex = succ_id,
                real_end = %real_end,
                "successor planned from reported actual end"
            );

            shifts += 1 + self.all_children_plan_date(succ_id);
        }

        shifts
    }
}
