// src/lib.rs

pub mod cache;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod types;

pub use cache::GraphCache;
pub use dag::{Graph, Vertex, VertexPayload};
pub use errors::{PlanDagError, Result};
pub use types::{PartitionKey, PlanStatus, VertexId};

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::config::{PlanFile, load_and_validate};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the plan file, builds a [`GraphCache`] from it, runs
/// the requested command against the cache and renders the result to stdout.
pub fn run(args: CliArgs) -> anyhow::Result<()> {
    let plan = load_and_validate(&args.plan)
        .with_context(|| format!("loading plan file at {:?}", args.plan))?;
    let cache = GraphCache::from_plan_file(&plan);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&mut out, &plan, &cache, args.command)?;
    out.flush()?;
    Ok(())
}

/// Execute one command against an already-built cache, writing to `out`.
pub fn run_command(
    out: &mut impl Write,
    plan: &PlanFile,
    cache: &GraphCache,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Check => print_summary(out, plan, cache)?,
        Command::Show { partition, status } => {
            let graphs = match partition {
                Some(key) => vec![
                    cache
                        .get(key)
                        .ok_or(PlanDagError::PartitionNotFound(key))?,
                ],
                None => cache.list_partitions(),
            };
            for graph in graphs {
                print_partition(out, &graph, status)?;
            }
        }
        Command::Shift {
            partition,
            vertex,
            end,
        } => {
            let graph = cache
                .get(partition)
                .ok_or(PlanDagError::PartitionNotFound(partition))?;
            let mut target = cache.get_by_id_in_partition(partition, vertex)?;
            target.planned_end = end;

            let before = graph.map();
            graph.update(target)?;
            print_moved(out, &before, &graph.map())?;
        }
        Command::Remove { partition, vertex } => {
            let graph = cache
                .get(partition)
                .ok_or(PlanDagError::PartitionNotFound(partition))?;
            let remaining = graph.remove(vertex)?;
            writeln!(
                out,
                "removed vertex {vertex} from partition {partition}; {} remaining",
                remaining.len()
            )?;
            for v in &remaining {
                print_vertex(out, v)?;
            }
        }
        Command::Chain { partition, vertex } => {
            let graph = cache
                .get(partition)
                .ok_or(PlanDagError::PartitionNotFound(partition))?;
            let chain = graph
                .recursion_children(vertex)
                .ok_or(PlanDagError::PlanNotFound {
                    partition,
                    id: vertex,
                })?;
            let ids: Vec<String> = chain.iter().map(|v| v.id.to_string()).collect();
            writeln!(out, "{vertex} -> [{}]", ids.join(", "))?;
        }
    }

    debug!("command complete");
    Ok(())
}

fn print_summary(out: &mut impl Write, plan: &PlanFile, cache: &GraphCache) -> io::Result<()> {
    writeln!(out, "plandag check")?;
    writeln!(
        out,
        "  {} partition(s), {} vertex declaration(s)",
        plan.partitions().len(),
        plan.vertex_count()
    )?;
    for graph in cache.list_partitions() {
        let end = graph
            .end_date()
            .map(fmt_time)
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  partition {}: {} vertices, {} edges, ends {}",
            graph.partition(),
            graph.vertex_count(),
            graph.edge_count(),
            end
        )?;
    }
    Ok(())
}

fn print_partition(
    out: &mut impl Write,
    graph: &Graph,
    status: Option<PlanStatus>,
) -> io::Result<()> {
    writeln!(out, "partition {}:", graph.partition())?;
    for vertex in graph.list() {
        if status.is_some_and(|s| s != vertex.payload.status) {
            continue;
        }
        print_vertex(out, &vertex)?;
    }
    Ok(())
}

fn print_vertex(out: &mut impl Write, vertex: &Vertex) -> io::Result<()> {
    writeln!(
        out,
        "  - {} {} [{}] {} .. {}",
        vertex.id,
        vertex.display_name(),
        vertex.payload.status,
        fmt_time(vertex.planned_start),
        fmt_time(vertex.planned_end)
    )?;
    if !vertex.predecessors().is_empty() {
        writeln!(out, "      after: {:?}", vertex.predecessors())?;
    }
    if !vertex.successors().is_empty() {
        writeln!(out, "      before: {:?}", vertex.successors())?;
    }
    Ok(())
}

fn print_moved(
    out: &mut impl Write,
    before: &BTreeMap<VertexId, Vertex>,
    after: &BTreeMap<VertexId, Vertex>,
) -> io::Result<()> {
    let mut moved = 0usize;
    for (id, now) in after {
        let Some(was) = before.get(id) else {
            continue;
        };
        if was.planned_start != now.planned_start || was.planned_end != now.planned_end {
            moved += 1;
            writeln!(
                out,
                "  {} {}: {} .. {} -> {} .. {}",
                id,
                now.display_name(),
                fmt_time(was.planned_start),
                fmt_time(was.planned_end),
                fmt_time(now.planned_start),
                fmt_time(now.planned_end)
            )?;
        }
    }
    writeln!(out, "{moved} vertex window(s) changed")?;
    Ok(())
}

fn fmt_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}
