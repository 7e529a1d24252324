// src/config/mod.rs

//! Plan files: TOML input a host can feed into a [`crate::GraphCache`].
//!
//! `model` holds the partition and vertex sections, `loader` reads them from
//! disk and `validate` turns a [`RawPlanFile`] into a checked [`PlanFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_plan_path, load_and_validate, load_from_path};
pub use model::{PartitionSection, PlanFile, RawPlanFile};
