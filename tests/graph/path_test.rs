// tests/graph/path_test.rs
use entitygraph::source::{DefinedEdge, MemorySource};
use entitygraph::{EntityGraph, GraphError, InferenceConfig, PathOutcome};

/// A schema-only graph over single-column entities joined by `edges`.
fn graph_of(nodes: &[&str], edges: &[(&str, &str)]) -> EntityGraph<MemorySource> {
    let mut source = MemorySource::files("paths");
    for node in nodes {
        source = source.with_table(*node, ["id"]);
    }
    for (a, b) in edges {
        source = source.with_defined_edge(DefinedEdge::new(*a, *b, "id"));
    }
    let mut graph = EntityGraph::with_config(source, InferenceConfig::schema_only());
    graph.build().unwrap();
    graph
}

#[test]
fn test_direct_edge_beats_longer_chain() {
    let graph = graph_of(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("A", "D")],
    );
    let outcome = graph.find_paths("A", "D").unwrap();
    let record = outcome.record().unwrap();

    assert_eq!(record.best_path(), ["A", "D"]);
    assert!(record.contains_path(&["A", "B", "C", "D"]));
    assert!(record
        .all_paths()
        .iter()
        .all(|p| p.first().map(String::as_str) == Some("A")
            && p.last().map(String::as_str) == Some("D")));
}

#[test]
fn test_later_path_of_equal_length_becomes_best() {
    let graph = graph_of(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
    );
    let record = graph.find_paths("A", "D").unwrap().record().cloned().unwrap();
    assert_eq!(record.best_path(), ["A", "C", "D"]);
    assert!(record.contains_path(&["A", "B", "D"]));
    assert_eq!(record.hops(), 2);
}

#[test]
fn test_disjoint_components_report_no_path() {
    let graph = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
    let outcome = graph.find_paths("A", "C").unwrap();
    assert!(!outcome.is_found());
    assert_eq!(
        outcome,
        PathOutcome::NoPath {
            from: "A".to_string(),
            to: "C".to_string(),
        }
    );
}

#[test]
fn test_isolated_node_reaches_only_itself() {
    let graph = graph_of(&["A", "B", "lonely"], &[("A", "B")]);
    let traversal = graph.traverse("lonely").unwrap();
    assert_eq!(traversal.len(), 1);
    assert_eq!(traversal.get("lonely").unwrap().best_path(), ["lonely"]);
    assert!(graph.reachable("lonely").unwrap().is_empty());
}

#[test]
fn test_best_path_is_never_longer_than_any_alternative() {
    let graph = graph_of(
        &["A", "B", "C", "D", "E"],
        &[
            ("A", "B"),
            ("B", "C"),
            ("C", "E"),
            ("A", "D"),
            ("D", "E"),
            ("B", "D"),
        ],
    );
    let traversal = graph.traverse("A").unwrap();
    for node in ["B", "C", "D", "E"] {
        let record = traversal.get(node).unwrap();
        let best = record.best_path().len();
        assert!(record.all_paths().iter().all(|p| p.len() >= best), "{node}");
    }
    assert_eq!(traversal.get("E").unwrap().hops(), 2);
}

#[test]
fn test_cycles_terminate() {
    let graph = graph_of(
        &["A", "B", "C"],
        &[("A", "B"), ("B", "C"), ("C", "A")],
    );
    let record = graph.find_paths("A", "C").unwrap().record().cloned().unwrap();
    assert_eq!(record.best_path(), ["A", "C"]);
    assert!(record.contains_path(&["A", "B", "C"]));
}

#[test]
fn test_unknown_endpoints_are_errors() {
    let graph = graph_of(&["A", "B"], &[("A", "B")]);
    assert!(matches!(
        graph.find_paths("A", "Z"),
        Err(GraphError::UnknownEntity(id)) if id == "Z"
    ));
}

#[test]
fn test_export_json() {
    let graph = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    let json = graph.export().to_json().unwrap();
    insta::assert_snapshot!(json, @r###"
    {
      "nodes": [
        "A",
        "B",
        "C"
      ],
      "edges": [
        [
          "A",
          "B"
        ],
        [
          "B",
          "C"
        ]
      ]
    }
    "###);
}
