// tests/source/sqlite_source_test.rs
use std::path::Path;

use entitygraph::source::{SourceAdapter, SourceError, SqliteSource};
use entitygraph::{Cardinality, EdgeOrigin, EntityGraph};
use rusqlite::Connection;
use tempfile::TempDir;

fn create_shop(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("shop.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "
        CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
        CREATE TABLE orders (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL REFERENCES customers(id),
            total REAL
        );
        CREATE TABLE products (id INTEGER PRIMARY KEY, title TEXT);
        CREATE TABLE order_lines (
            id INTEGER PRIMARY KEY,
            order_id INTEGER NOT NULL REFERENCES orders(id),
            product_id INTEGER NOT NULL,
            quantity INTEGER
        );
        INSERT INTO customers VALUES (1, 'ada'), (2, 'bob'), (3, 'cy');
        INSERT INTO orders VALUES (10, 1, 9.5), (11, 1, 20.0), (12, 2, NULL), (13, 3, 4.25);
        INSERT INTO products VALUES (100, 'pen'), (101, 'ink');
        INSERT INTO order_lines VALUES
            (1000, 10, 100, 1), (1001, 10, 101, 2), (1002, 11, 100, 1),
            (1003, 12, 101, 5), (1004, 13, 100, 1);
        ",
    )
    .unwrap();
    path
}

#[test]
fn test_lists_tables_as_qualified_entities() {
    let dir = TempDir::new().unwrap();
    let source = SqliteSource::open(create_shop(dir.path()));

    let ids: Vec<&str> = source
        .list_entities()
        .unwrap()
        .iter()
        .map(|e| e.identifier())
        .collect();
    assert_eq!(
        ids,
        [
            "shop.main.customers",
            "shop.main.order_lines",
            "shop.main.orders",
            "shop.main.products"
        ]
    );

    let orders = source.entity("shop.main.orders").unwrap().unwrap();
    assert_eq!(orders.columns(), ["id", "customer_id", "total"]);
    assert_eq!(orders.column_type("total"), Some("REAL"));
    assert_eq!(orders.declared_primary_key(), Some("id"));
    assert_eq!(orders.source(), "shop");
}

#[test]
fn test_foreign_keys_become_defined_edges() {
    let dir = TempDir::new().unwrap();
    let source = SqliteSource::open(create_shop(dir.path()));

    let edges = source.defined_edges().unwrap();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().any(|e| e.referencing == "shop.main.orders"
        && e.referenced == "shop.main.customers"
        && e.column == "customer_id"
        && e.referenced_column.as_deref() == Some("id")));
    assert!(edges
        .iter()
        .any(|e| e.referencing == "shop.main.order_lines" && e.column == "order_id"));
}

#[test]
fn test_sample_is_bounded() {
    let dir = TempDir::new().unwrap();
    let source = SqliteSource::open(create_shop(dir.path()));
    let orders = source.entity("shop.main.orders").unwrap().unwrap().clone();

    let sample = source.sample(&orders, 2).unwrap();
    assert_eq!(sample.columns(), ["id", "customer_id", "total"]);
    assert_eq!(sample.len(), 2);

    let all = source.sample(&orders, 100).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all.rows()[2][2], None);
}

#[test]
fn test_missing_database_is_a_connection_error() {
    let dir = TempDir::new().unwrap();
    let source = SqliteSource::open(dir.path().join("nope.db"));
    let err = source.list_entities().unwrap_err();
    assert!(matches!(err, SourceError::ConnectionFailed { .. }));
    assert!(err.is_connection_error());

    let mut graph = EntityGraph::new(source);
    let err = graph.build().unwrap_err();
    assert!(err.is_connection_error());
    assert!(!graph.is_built());
    assert_eq!(graph.node_count(), 0);
}

#[test]
fn test_graph_over_sqlite() {
    let dir = TempDir::new().unwrap();
    let mut graph = EntityGraph::new(SqliteSource::open(create_shop(dir.path())));
    let report = graph.build().unwrap().clone();

    assert_eq!(report.nodes, 4);
    assert_eq!(report.schema_edges, 2);
    // order_lines.product_id has no constraint and is found by name.
    assert_eq!(report.inferred_edges, 1);
    assert_eq!(graph.edge_count(), 3);

    let fk = graph.edge("shop.main.orders", "shop.main.customers").unwrap();
    assert_eq!(fk.origin(), EdgeOrigin::Schema);
    assert_eq!(
        fk.cardinality_from("shop.main.customers"),
        Some(Cardinality::OneToMany)
    );

    let inferred = graph
        .edge("shop.main.products", "shop.main.order_lines")
        .unwrap();
    assert_eq!(inferred.origin(), EdgeOrigin::Inferred);
    assert_eq!(inferred.key_for("shop.main.order_lines"), Some("product_id"));

    assert_eq!(
        graph
            .shortest_path("shop.main.customers", "shop.main.products")
            .unwrap()
            .unwrap(),
        [
            "shop.main.customers",
            "shop.main.orders",
            "shop.main.order_lines",
            "shop.main.products"
        ]
    );
}
