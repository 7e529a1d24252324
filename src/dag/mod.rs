// src/dag/mod.rs

//! Per-partition dependency graph of planned activities.
//!
//! - [`vertex`] holds the vertex record and its payload.
//! - [`graph`] is the locked, public face of one partition: build, update,
//!   remove and queries.
//! - `edges` keeps both ends of every edge in sync and computes predecessor
//!   timing.
//! - `propagate` pushes planned windows forward along successor edges.

mod edges;
pub mod graph;
mod propagate;
pub mod vertex;

pub use graph::Graph;
pub use vertex::{Vertex, VertexPayload};
