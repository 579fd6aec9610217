// tests/graph/build_test.rs
use entitygraph::model::{EdgeOrigin, KeyMap};
use entitygraph::source::{DefinedEdge, MemorySource};
use entitygraph::{EntityGraph, InferenceConfig, SourceAdapter, SourceShape};

fn shop() -> MemorySource {
    MemorySource::relational("shop")
        .with_table("db.sch.customers", ["id", "name"])
        .with_table("db.sch.orders", ["id", "customer_id", "total"])
}

fn keys(pairs: &[(&str, &str)]) -> KeyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_naming_heuristic_links_customers_and_orders() {
    let mut graph = EntityGraph::new(shop());
    graph.build().unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);

    let edge = graph.edge("db.sch.customers", "db.sch.orders").unwrap();
    assert_eq!(edge.origin(), EdgeOrigin::Inferred);
    assert_eq!(
        edge.key_map(),
        &keys(&[("db.sch.customers", "id"), ("db.sch.orders", "customer_id")])
    );
    assert_eq!(edge.rules(), ["relational_naming"]);
}

#[test]
fn test_build_twice_yields_identical_graph() {
    let mut graph = EntityGraph::new(shop());
    graph.build().unwrap();
    let nodes = graph.node_count();
    let key_maps: Vec<KeyMap> = graph.edges().map(|e| e.key_map().clone()).collect();

    graph.build().unwrap();
    graph.build().unwrap();

    assert_eq!(graph.node_count(), nodes);
    assert_eq!(
        graph.edges().map(|e| e.key_map().clone()).collect::<Vec<_>>(),
        key_maps
    );
}

#[test]
fn test_schema_edge_is_never_downgraded() {
    let source = shop().with_defined_edge(
        DefinedEdge::new("db.sch.orders", "db.sch.customers", "customer_id")
            .with_referenced_column("id"),
    );
    let mut graph = EntityGraph::new(source);
    let report = graph.build().unwrap().clone();

    assert_eq!(report.schema_edges, 1);
    assert_eq!(report.inferred_edges, 0);
    assert_eq!(graph.edge_count(), 1);

    let edge = graph.edge("db.sch.orders", "db.sch.customers").unwrap();
    assert_eq!(edge.origin(), EdgeOrigin::Schema);
    assert_eq!(edge.key_for("db.sch.orders"), Some("customer_id"));
    assert_eq!(edge.key_for("db.sch.customers"), Some("id"));
}

#[test]
fn test_malformed_entities_do_not_abort_inference() {
    let source = shop()
        .with_table("orders_archive", ["id", "customer_id"])
        .with_table("db.sch.empty", Vec::<&str>::new())
        .with_table("db.sch.products", ["id", "title"])
        .with_table("db.sch.order_lines", ["id", "order_id", "product_id"]);
    let mut graph = EntityGraph::new(source);
    let report = graph.build().unwrap().clone();

    assert_eq!(graph.node_count(), 6);
    assert!(graph.edge("db.sch.customers", "db.sch.orders").is_some());
    assert!(graph.edge("db.sch.orders", "db.sch.order_lines").is_some());
    assert!(graph.edge("db.sch.products", "db.sch.order_lines").is_some());
    assert!(graph.edges_of("orders_archive").unwrap().is_empty());
    assert!(graph.edges_of("db.sch.empty").unwrap().is_empty());

    let naming: Vec<String> = report
        .diagnostics_for("relational_naming")
        .map(|d| d.reason.to_string())
        .collect();
    assert!(naming.iter().any(|r| r.contains("orders_archive")));
    assert!(naming.iter().any(|r| r.contains("db.sch.empty")));
}

#[test]
fn test_schema_only_config_skips_heuristics() {
    let mut graph = EntityGraph::with_config(shop(), InferenceConfig::schema_only());
    let report = graph.build().unwrap();
    assert_eq!(report.nodes, 2);
    assert_eq!(report.inferred_edges, 0);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_file_collection_uses_file_heuristic() {
    let source = MemorySource::files("lake")
        .with_table("lake/customers.csv", ["id", "name"])
        .with_table("lake/orders.csv", ["order_id", "customer_id"]);
    let mut graph = EntityGraph::new(source);
    graph.build().unwrap();

    assert_eq!(graph.source().shape(), SourceShape::FileCollection);
    let edge = graph.edge("lake/orders.csv", "lake/customers.csv").unwrap();
    assert_eq!(edge.key_for("lake/orders.csv"), Some("customer_id"));
    assert_eq!(edge.key_for("lake/customers.csv"), Some("id"));
    assert_eq!(edge.rules(), ["file_naming"]);
}
