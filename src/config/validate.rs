// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{PartitionSection, PlanFile, RawPlanFile};
use crate::errors::{PlanDagError, Result};
use crate::types::VertexId;

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = crate::errors::PlanDagError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.partition))
    }
}

fn validate_raw_plan(plan: &RawPlanFile) -> Result<()> {
    ensure_has_partitions(plan)?;
    validate_partition_keys(plan)?;
    for partition in &plan.partition {
        validate_vertices(partition)?;
        validate_dag(partition)?;
    }
    Ok(())
}

fn ensure_has_partitions(plan: &RawPlanFile) -> Result<()> {
    if plan.partition.is_empty() {
        return Err(PlanDagError::ConfigError(
            "plan must contain at least one [[partition]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_partition_keys(plan: &RawPlanFile) -> Result<()> {
    let mut seen = HashSet::new();
    for partition in &plan.partition {
        if !seen.insert(partition.key) {
            return Err(PlanDagError::ConfigError(format!(
                "partition {} is declared more than once",
                partition.key
            )));
        }
    }
    Ok(())
}

fn validate_vertices(partition: &PartitionSection) -> Result<()> {
    let mut ids: HashSet<VertexId> = HashSet::new();
    for vertex in &partition.vertex {
        if !ids.insert(vertex.id) {
            return Err(PlanDagError::ConfigError(format!(
                "partition {}: vertex {} is declared more than once",
                partition.key, vertex.id
            )));
        }
        if vertex.predecessor_ids.contains(&vertex.id) || vertex.successor_ids.contains(&vertex.id)
        {
            return Err(PlanDagError::ConfigError(format!(
                "partition {}: vertex {} cannot depend on itself",
                partition.key, vertex.id
            )));
        }
        if vertex.planned_end < vertex.planned_start {
            return Err(PlanDagError::ConfigError(format!(
                "partition {}: vertex {} ends ({}) before it starts ({})",
                partition.key, vertex.id, vertex.planned_end, vertex.planned_start
            )));
        }
    }
    Ok(())
}

/// Edges point from predecessor to successor, taken from both declared
/// directions. Ids that are not in the file are still graph nodes: they may be
/// supplied later, and a cycle through them is a cycle all the same.
fn validate_dag(partition: &PartitionSection) -> Result<()> {
    let mut graph: DiGraphMap<VertexId, ()> = DiGraphMap::new();

    for vertex in &partition.vertex {
        graph.add_node(vertex.id);
    }

    for vertex in &partition.vertex {
        for pred in &vertex.predecessor_ids {
            graph.add_edge(*pred, vertex.id, ());
        }
        for succ in &vertex.successor_ids {
            graph.add_edge(vertex.id, *succ, ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(PlanDagError::DagCycle(format!(
            "cycle detected in partition {} involving vertex {}",
            partition.key,
            cycle.node_id()
        ))),
    }
}
