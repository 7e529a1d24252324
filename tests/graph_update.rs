mod common;

use common::{assert_symmetric, chain, day, days, init_tracing, is_acyclic, scenario_cache};
use plandag::{Graph, PlanDagError, PlanStatus};
use plandag_test_utils::builders::VertexBuilder;

#[test]
fn test_update_drops_edges_no_longer_declared() {
    init_tracing();
    let cache = scenario_cache();
    let graph = cache.get(111).unwrap();

    let edited = VertexBuilder::new(3).name("111").after(1).build();
    graph.update(edited).expect("update succeeds");

    let v1 = graph.get(1).unwrap();
    let v2 = graph.get(2).unwrap();
    let v3 = graph.get(3).unwrap();

    assert!(!v2.successor_ids.contains(&3));
    assert!(!v2.successors().contains(&3));
    assert_eq!(v3.predecessor_ids, vec![1]);
    assert_eq!(v3.predecessors(), &[1]);
    assert!(v1.successors().contains(&3));
    assert_symmetric(&graph);
}

#[test]
fn test_update_rejects_direct_successor_as_predecessor() {
    let cache = scenario_cache();
    let graph = cache.get(111).unwrap();
    let before = graph.map();

    let edited = VertexBuilder::new(1).name("123").after(3).build();
    let err = graph.update(edited).err().expect("update must be rejected");

    match err {
        PlanDagError::CycleRejected { predecessor, vertex } => {
            assert_eq!(predecessor, "111");
            assert_eq!(vertex, "123");
        }
        other => panic!("Expected CycleRejected, got: {other:?}"),
    }
    assert_eq!(graph.map(), before);
}

#[test]
fn test_update_rejects_indirect_cycle() {
    let graph = Graph::new(1);
    chain(&graph, &[1, 2, 3, 4]);
    let before = graph.map();

    let err = graph
        .update(VertexBuilder::new(1).days(0, 1).after(4).build())
        .err()
        .expect("closing the chain must be rejected");

    assert!(matches!(err, PlanDagError::CycleRejected { .. }));
    assert_eq!(graph.map(), before);
    assert!(is_acyclic(&graph));
}

#[test]
fn test_update_rejects_self_dependency() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).build());

    let err = graph
        .update(VertexBuilder::new(1).after(1).build())
        .err()
        .expect("self edge must be rejected");
    match err {
        PlanDagError::CycleRejected { predecessor, vertex } => {
            assert_eq!(predecessor, "#1");
            assert_eq!(vertex, "#1");
        }
        other => panic!("Expected CycleRejected, got: {other:?}"),
    }
}

#[test]
fn test_update_unknown_vertex_is_plan_not_found() {
    let graph = Graph::new(5);
    let err = graph
        .update(VertexBuilder::new(9).build())
        .err()
        .expect("unknown vertex");
    assert!(matches!(
        err,
        PlanDagError::PlanNotFound { partition: 5, id: 9 }
    ));
}

#[test]
fn test_update_shifts_successor_and_keeps_duration() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).days(0, 10).build());
    graph.build(VertexBuilder::new(2).after(1).days(12, 15).build());

    let b = graph.get(2).unwrap();
    assert_eq!(b.max_predecessor_end(), Some(day(10)));
    assert_eq!(b.min_predecessor_gap(), days(2));

    graph
        .update(VertexBuilder::new(1).days(0, 20).build())
        .unwrap();

    let b = graph.get(2).unwrap();
    assert_eq!(b.planned_start, day(22));
    assert_eq!(b.planned_end, day(25));
    assert_eq!(b.planned_duration(), days(3));
    assert_eq!(b.max_predecessor_end(), Some(day(20)));
    assert_eq!(graph.get(1).unwrap().planned_end, day(20));
}

#[test]
fn test_update_uses_recorded_gap_not_current_window() {
    // The successor was planned two days after a predecessor end of day 7;
    // the predecessor has since been restaged to end on day 10 without
    // propagation. Moving it to day 20 places the successor at 22..25.
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).days(0, 7).build());
    graph.build(VertexBuilder::new(2).after(1).days(9, 12).build());
    let mut restaged = graph.get(1).unwrap();
    restaged.planned_end = day(10);
    graph.stage(restaged);

    assert_eq!(graph.get(1).unwrap().planned_end, day(10));
    assert_eq!(graph.get(2).unwrap().min_predecessor_gap(), days(2));

    graph
        .update(VertexBuilder::new(1).days(0, 20).build())
        .unwrap();

    let b = graph.get(2).unwrap();
    assert_eq!(b.planned_start, day(22));
    assert_eq!(b.planned_end, day(25));
}

#[test]
fn test_update_propagates_down_a_chain() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).days(0, 10).build());
    graph.build(VertexBuilder::new(2).after(1).days(12, 15).build());
    graph.build(VertexBuilder::new(3).after(2).days(16, 20).build());

    graph
        .update(VertexBuilder::new(1).days(0, 20).build())
        .unwrap();

    let b = graph.get(2).unwrap();
    let c = graph.get(3).unwrap();
    assert_eq!((b.planned_start, b.planned_end), (day(22), day(25)));
    assert_eq!((c.planned_start, c.planned_end), (day(26), day(30)));
    assert_eq!(c.max_predecessor_end(), Some(day(25)));
}

#[test]
fn test_update_propagates_through_diamond_to_latest_branch() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).days(0, 10).build());
    graph.build(VertexBuilder::new(2).after(1).days(11, 13).build());
    graph.build(VertexBuilder::new(3).after(1).days(11, 20).build());
    graph.build(VertexBuilder::new(4).after(2).after(3).days(21, 25).build());

    let d = graph.get(4).unwrap();
    assert_eq!(d.max_predecessor_end(), Some(day(20)));
    assert_eq!(d.min_predecessor_gap(), days(1));

    graph
        .update(VertexBuilder::new(1).days(0, 15).build())
        .unwrap();

    let b = graph.get(2).unwrap();
    let c = graph.get(3).unwrap();
    let d = graph.get(4).unwrap();
    assert_eq!((b.planned_start, b.planned_end), (day(16), day(18)));
    assert_eq!((c.planned_start, c.planned_end), (day(16), day(25)));
    assert_eq!((d.planned_start, d.planned_end), (day(26), day(30)));
}

#[test]
fn test_update_to_earlier_end_leaves_successors_alone() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).days(0, 10).build());
    graph.build(VertexBuilder::new(2).after(1).days(12, 15).build());

    graph
        .update(VertexBuilder::new(1).days(0, 8).build())
        .unwrap();

    let b = graph.get(2).unwrap();
    assert_eq!((b.planned_start, b.planned_end), (day(12), day(15)));
    assert_eq!(b.max_predecessor_end(), Some(day(10)));
}

#[test]
fn test_update_overwrites_payload_fields() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).name("old").unit(3).build());

    let edited = VertexBuilder::new(1)
        .name("new")
        .description("poured")
        .status(PlanStatus::Completed)
        .unit(4)
        .build();
    graph.update(edited).unwrap();

    let v = graph.get(1).unwrap();
    assert_eq!(v.payload.name, "new");
    assert_eq!(v.payload.description, "poured");
    assert_eq!(v.payload.status, PlanStatus::Completed);
    assert_eq!(v.payload.unit_id, 4);
}

#[test]
fn test_update_recomputes_gap_for_new_predecessors() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).days(0, 10).build());
    graph.build(VertexBuilder::new(2).days(0, 5).build());
    graph.build(VertexBuilder::new(3).after(1).days(12, 14).build());

    graph
        .update(VertexBuilder::new(3).after(2).days(12, 14).build())
        .unwrap();

    let v = graph.get(3).unwrap();
    assert_eq!(v.predecessors(), &[2]);
    assert_eq!(v.max_predecessor_end(), Some(day(5)));
    assert_eq!(v.min_predecessor_gap(), days(7));
    assert!(graph.get(1).unwrap().successors().is_empty());
    assert_symmetric(&graph);
}

#[test]
fn test_update_links_new_declared_successor() {
    let graph = Graph::new(1);
    graph.build(VertexBuilder::new(1).days(0, 4).build());
    graph.build(VertexBuilder::new(2).days(6, 8).build());

    graph
        .update(VertexBuilder::new(1).days(0, 4).before(2).build())
        .unwrap();

    let b = graph.get(2).unwrap();
    assert_eq!(b.predecessors(), &[1]);
    assert_eq!(b.max_predecessor_end(), Some(day(4)));
    assert_symmetric(&graph);
    assert!(is_acyclic(&graph));
}

#[test]
fn test_graph_stays_usable_after_rejection() {
    let cache = scenario_cache();
    let graph = cache.get(111).unwrap();

    assert!(graph.update(VertexBuilder::new(1).after(2).build()).is_err());
    graph
        .update(VertexBuilder::new(3).after(1).build())
        .expect("a valid edit still goes through");
    assert_symmetric(&graph);
}
