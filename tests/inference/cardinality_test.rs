// tests/inference/cardinality_test.rs
use entitygraph::model::{Cardinality, Sample};
use entitygraph::semantic::inference::{classify, profile, SkipReason};
use entitygraph::source::MemorySource;
use entitygraph::{EntityGraph, InferenceConfig};

/// `rows` values of `column` cycling through `distinct` values.
fn cycling(column: &str, rows: usize, distinct: usize) -> Sample {
    let mut sample = Sample::new([column]);
    for i in 0..rows {
        sample.push_row(vec![Some(format!("v{}", i % distinct))]);
    }
    sample
}

#[test]
fn test_unique_against_repeating_is_one_to_many() {
    let a = profile("a", &cycling("id", 100, 100), "id").unwrap();
    let b = profile("b", &cycling("a_id", 100, 40), "a_id").unwrap();

    assert!(a.is_unique());
    assert!(!b.is_unique());
    assert_eq!(classify(a, b), Cardinality::OneToMany);
    assert_eq!(classify(b, a), Cardinality::ManyToOne);
    assert_eq!(classify(a, b).reverse(), classify(b, a));
}

#[test]
fn test_both_sides_unique_or_repeating() {
    let unique = profile("a", &cycling("id", 10, 10), "id").unwrap();
    let repeating = profile("b", &cycling("id", 10, 3), "id").unwrap();
    assert_eq!(classify(unique, unique), Cardinality::OneToOne);
    assert_eq!(classify(repeating, repeating), Cardinality::ManyToMany);
}

#[test]
fn test_nulls_break_uniqueness() {
    let sample = Sample::new(["id"])
        .with_row([Some("1")])
        .with_row([Some("2")])
        .with_row([None::<&str>]);
    assert!(!profile("a", &sample, "id").unwrap().is_unique());
}

#[test]
fn test_unclassifiable_samples() {
    assert!(matches!(
        profile("a", &Sample::new(["id"]), "id"),
        Err(SkipReason::EmptySample { .. })
    ));
    assert!(matches!(
        profile("a", &cycling("id", 5, 5), "customer_id"),
        Err(SkipReason::MissingJoinColumn { .. })
    ));
}

fn shop(sample_size: usize) -> EntityGraph<MemorySource> {
    let mut customers = Sample::new(["id", "name"]);
    for i in 0..100 {
        customers.push_row(vec![Some(i.to_string()), Some(format!("customer {i}"))]);
    }
    let mut orders = Sample::new(["id", "customer_id"]);
    for i in 0..100 {
        orders.push_row(vec![Some(i.to_string()), Some((i % 40).to_string())]);
    }

    let source = MemorySource::relational("shop")
        .with_table("db.sch.customers", ["id", "name"])
        .with_table("db.sch.orders", ["id", "customer_id"])
        .with_sample("db.sch.customers", customers)
        .with_sample("db.sch.orders", orders);
    let config = InferenceConfig::default().with_sample_size(sample_size);
    let mut graph = EntityGraph::with_config(source, config);
    graph.build().unwrap();
    graph
}

#[test]
fn test_build_classifies_edges_in_both_directions() {
    let graph = shop(100);
    let edge = graph.edge("db.sch.customers", "db.sch.orders").unwrap();
    assert_eq!(
        edge.cardinality_from("db.sch.customers"),
        Some(Cardinality::OneToMany)
    );
    assert_eq!(
        edge.cardinality_from("db.sch.orders"),
        Some(Cardinality::ManyToOne)
    );
    assert_eq!(graph.report().classified_edges, 1);
}

#[test]
fn test_classification_reflects_only_the_sample() {
    // The first 40 orders reference 40 different customers.
    let graph = shop(40);
    let edge = graph.edge("db.sch.customers", "db.sch.orders").unwrap();
    assert_eq!(edge.cardinality(), Some(Cardinality::OneToOne));
}

#[test]
fn test_cardinality_can_be_disabled() {
    let source = MemorySource::relational("shop")
        .with_table("db.sch.customers", ["id"])
        .with_table("db.sch.orders", ["id", "customer_id"]);
    let mut graph = EntityGraph::with_config(source, InferenceConfig::default().with_cardinality(false));
    let report = graph.build().unwrap();
    assert_eq!(report.classified_edges, 0);
    assert_eq!(report.diagnostics_for("cardinality").count(), 0);
}
