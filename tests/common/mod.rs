#![allow(dead_code)]

use std::collections::HashSet;

use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use plandag::{Graph, GraphCache, Vertex, VertexId};
use plandag_test_utils::builders::VertexBuilder;

pub use plandag_test_utils::{day, days, init_tracing};

/// Vertices 1 -> {2, 3} and 2 -> 3, staged out of order into partition 111
/// and then built.
pub fn scenario_cache() -> GraphCache {
    let cache = GraphCache::new();
    cache.upsert(
        111,
        VertexBuilder::new(1).name("123").before(2).before(3).build(),
    );
    cache.upsert(
        111,
        VertexBuilder::new(3).name("111").after(1).after(2).build(),
    );
    cache.upsert(
        111,
        VertexBuilder::new(2).name("789").after(1).before(3).build(),
    );
    cache.build_all();
    cache
}

/// Build a straight chain `ids[0] -> ids[1] -> ...`; vertex `i` runs from day
/// `2i` to day `2i + 1`.
pub fn chain(graph: &Graph, ids: &[VertexId]) {
    for (i, id) in ids.iter().enumerate() {
        let start = (i as i64) * 2;
        let mut builder = VertexBuilder::new(*id).days(start, start + 1);
        if i > 0 {
            builder = builder.after(ids[i - 1]);
        }
        graph.build(builder.build());
    }
}

pub fn ids(vertices: &[Vertex]) -> Vec<VertexId> {
    vertices.iter().map(|v| v.id).collect()
}

/// Panics if declared ids, linked ids and their mirrors disagree anywhere in
/// the graph.
pub fn assert_symmetric(graph: &Graph) {
    let map = graph.map();
    for v in map.values() {
        assert_no_duplicates(&v.predecessor_ids, v.id, "predecessor_ids");
        assert_no_duplicates(&v.successor_ids, v.id, "successor_ids");
        assert_no_duplicates(v.predecessors(), v.id, "predecessors");
        assert_no_duplicates(v.successors(), v.id, "successors");

        let declared_preds: HashSet<VertexId> = v
            .predecessor_ids
            .iter()
            .copied()
            .filter(|p| map.contains_key(p))
            .collect();
        let linked_preds: HashSet<VertexId> = v.predecessors().iter().copied().collect();
        assert_eq!(declared_preds, linked_preds, "vertex {} predecessors", v.id);

        let declared_succs: HashSet<VertexId> = v
            .successor_ids
            .iter()
            .copied()
            .filter(|s| map.contains_key(s))
            .collect();
        let linked_succs: HashSet<VertexId> = v.successors().iter().copied().collect();
        assert_eq!(declared_succs, linked_succs, "vertex {} successors", v.id);

        for p in &linked_preds {
            let pred = &map[p];
            assert!(
                pred.successor_ids.contains(&v.id) && pred.successors().contains(&v.id),
                "{} lists {} as predecessor but not vice versa",
                v.id,
                p
            );
        }
        for s in &linked_succs {
            let succ = &map[s];
            assert!(
                succ.predecessor_ids.contains(&v.id) && succ.predecessors().contains(&v.id),
                "{} lists {} as successor but not vice versa",
                v.id,
                s
            );
        }
    }
}

fn assert_no_duplicates(ids: &[VertexId], owner: VertexId, what: &str) {
    let unique: HashSet<&VertexId> = ids.iter().collect();
    assert_eq!(
        unique.len(),
        ids.len(),
        "vertex {owner} has duplicate {what}: {ids:?}"
    );
}

/// Acyclicity of the linked successor edges, checked independently with
/// petgraph.
pub fn is_acyclic(graph: &Graph) -> bool {
    let mut g: DiGraphMap<VertexId, ()> = DiGraphMap::new();
    for v in graph.list() {
        g.add_node(v.id);
        for s in v.successors() {
            g.add_edge(v.id, *s, ());
        }
    }
    !is_cyclic_directed(&g)
}
