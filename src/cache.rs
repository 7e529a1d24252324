// src/cache.rs

//! Partitioned cache: one independent [`Graph`] per partition key.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::PlanFile;
use crate::dag::{Graph, Vertex};
use crate::errors::{PlanDagError, Result};
use crate::types::{PartitionKey, VertexId};

/// Thread-safe map from partition key to its graph.
///
/// The map itself sits behind a reader/writer lock; each [`Graph`] carries
/// its own lock for the vertices inside it. Partitions are kept in ascending
/// key order, which is also the order cross-partition lookups scan in.
#[derive(Debug, Default)]
pub struct GraphCache {
    graphs: RwLock<BTreeMap<PartitionKey, Arc<Graph>>>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from a validated plan file: every vertex is staged in its
    /// partition, then all edges are drawn.
    pub fn from_plan_file(plan: &PlanFile) -> Self {
        let cache = Self::new();
        for partition in plan.partitions() {
            for vertex in &partition.vertex {
                cache.upsert(partition.key, vertex.clone());
            }
        }
        cache.build_all();
        info!(
            partitions = cache.len(),
            "plan file loaded into graph cache"
        );
        cache
    }

    /// Store `vertex` in the partition `key`, creating the partition on first
    /// use. No edges are drawn until [`GraphCache::build_all`].
    pub fn upsert(&self, key: PartitionKey, vertex: Vertex) -> Arc<Graph> {
        let mut graphs = self.graphs.write();
        let graph = graphs
            .entry(key)
            .or_insert_with(|| {
                debug!(partition = key, "creating partition graph");
                Arc::new(Graph::new(key))
            })
            .clone();
        graph.stage(vertex);
        graph
    }

    /// Draw the declared edges of every stored vertex in every partition.
    pub fn build_all(&self) {
        for graph in self.list_partitions() {
            graph.rebuild();
        }
    }

    pub fn get(&self, key: PartitionKey) -> Option<Arc<Graph>> {
        self.graphs.read().get(&key).cloned()
    }

    /// Vertices of partition `key`; empty if the partition does not exist.
    pub fn list_partition(&self, key: PartitionKey) -> Vec<Vertex> {
        self.get(key).map(|g| g.list()).unwrap_or_default()
    }

    /// First vertex with id `id`, scanning partitions in ascending key order.
    ///
    /// Ids are only unique within a partition, so a collision resolves to the
    /// lowest partition key holding that id.
    pub fn find_vertex_any_partition(&self, id: VertexId) -> Option<Vertex> {
        self.graphs.read().values().find_map(|graph| graph.get(id))
    }

    /// Vertices of partition `key` whose ids are in `ids`, in request order.
    /// Ids missing from the partition are skipped.
    pub fn list_by_ids_in_partition(
        &self,
        key: PartitionKey,
        ids: &[VertexId],
    ) -> Result<Vec<Vertex>> {
        let graph = self
            .get(key)
            .ok_or(PlanDagError::PartitionNotFound(key))?;
        Ok(ids.iter().filter_map(|id| graph.get(*id)).collect())
    }

    pub fn get_by_id_in_partition(&self, key: PartitionKey, id: VertexId) -> Result<Vertex> {
        let graph = self
            .get(key)
            .ok_or(PlanDagError::PartitionNotFound(key))?;
        graph.get(id).ok_or(PlanDagError::PlanNotFound {
            partition: key,
            id,
        })
    }

    /// Snapshot of all partition graphs in ascending key order.
    pub fn list_partitions(&self) -> Vec<Arc<Graph>> {
        self.graphs.read().values().cloned().collect()
    }

    pub fn partition_keys(&self) -> Vec<PartitionKey> {
        self.graphs.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.graphs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.read().is_empty()
    }
}
