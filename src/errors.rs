// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

use crate::types::{PartitionKey, VertexId};

#[derive(Error, Debug)]
pub enum PlanDagError {
    #[error("Partition not found: {0}")]
    PartitionNotFound(PartitionKey),

    #[error("Plan not found: {id} in partition {partition}")]
    PlanNotFound { partition: PartitionKey, id: VertexId },

    /// An update would close a loop: `predecessor` is already downstream of
    /// `vertex`.
    #[error(
        "Cycle rejected: predecessor plan '{predecessor}' is already a successor of '{vertex}'"
    )]
    CycleRejected { predecessor: String, vertex: String },

    #[error("Vertex not found: {0}")]
    VertexNotFound(VertexId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in plan file: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlanDagError>;
