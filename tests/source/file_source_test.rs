// tests/source/file_source_test.rs
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use entitygraph::source::{FileProvider, FileSource, FileSourceConfig, SourceAdapter, StorageFormat};
use entitygraph::{Cardinality, EntityGraph};
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

/// Local roots are given without the leading `/` provider prefix.
fn root_of(dir: &TempDir) -> String {
    dir.path()
        .to_string_lossy()
        .trim_start_matches('/')
        .to_string()
}

fn identifier(dir: &TempDir, relative: &str) -> String {
    format!("{}/{}", root_of(dir), relative)
}

fn write_parquet(path: &Path, columns: Vec<(&str, ArrayRef)>) {
    let batch = RecordBatch::try_from_iter(columns).unwrap();
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

fn parquet_lake() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_parquet(
        &dir.path().join("customers.parquet"),
        vec![
            ("id", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
            (
                "name",
                Arc::new(StringArray::from(vec![Some("ada"), None, Some("cy")])) as ArrayRef,
            ),
        ],
    );
    write_parquet(
        &dir.path().join("orders.parquet"),
        vec![
            ("id", Arc::new(Int64Array::from(vec![10, 11, 12, 13])) as ArrayRef),
            (
                "customer_id",
                Arc::new(Int64Array::from(vec![1, 1, 2, 3])) as ArrayRef,
            ),
        ],
    );
    fs::write(dir.path().join("notes.csv"), "not,parquet\n").unwrap();
    dir
}

#[test]
fn test_parquet_columns_types_and_samples() {
    let dir = parquet_lake();
    let source = FileSource::new("lake", FileSourceConfig::new(root_of(&dir))).unwrap();

    let ids: Vec<&str> = source
        .list_entities()
        .unwrap()
        .iter()
        .map(|e| e.identifier())
        .collect();
    assert_eq!(
        ids,
        [
            identifier(&dir, "customers.parquet"),
            identifier(&dir, "orders.parquet")
        ]
    );

    let customers = source
        .entity(&identifier(&dir, "customers.parquet"))
        .unwrap()
        .unwrap();
    assert_eq!(customers.columns(), ["id", "name"]);
    assert_eq!(customers.column_type("id"), Some("Int64"));
    assert_eq!(customers.name(), "customers");

    let sample = source.sample(customers, 2).unwrap();
    assert_eq!(sample.len(), 2);
    assert_eq!(
        sample.rows()[1],
        [Some("2".to_string()), None]
    );
}

#[test]
fn test_graph_over_parquet_files() {
    let dir = parquet_lake();
    let source = FileSource::new("lake", FileSourceConfig::new(root_of(&dir))).unwrap();
    let mut graph = EntityGraph::new(source);
    graph.build().unwrap();

    let customers = identifier(&dir, "customers.parquet");
    let orders = identifier(&dir, "orders.parquet");
    assert_eq!(graph.edge_count(), 1);

    let edge = graph.edge(&orders, &customers).unwrap();
    assert_eq!(edge.key_for(&orders), Some("customer_id"));
    assert_eq!(edge.key_for(&customers), Some("id"));
    assert_eq!(
        edge.cardinality_from(&customers),
        Some(Cardinality::OneToMany)
    );
    assert_eq!(
        graph.shortest_path(&customers, &orders).unwrap().unwrap(),
        [customers.clone(), orders.clone()]
    );
}

#[test]
fn test_partitioned_csv_directories_are_entities() {
    let dir = TempDir::new().unwrap();
    let orders = dir.path().join("orders");
    fs::create_dir_all(orders.join("year=2024")).unwrap();
    fs::write(orders.join("year=2024").join("part-0.csv"), "id,total\n1,9.5\n2,\n").unwrap();
    fs::write(orders.join("part-1.csv"), "total,id\n4.0,3\n").unwrap();
    fs::write(orders.join("_tmp.csv"), "garbage\n").unwrap();
    fs::write(dir.path().join("customers.csv"), "id,name\n1,ada\n").unwrap();

    let config = FileSourceConfig::new(root_of(&dir))
        .with_format(StorageFormat::Csv)
        .with_exclude("_tmp")
        .partitioned(true);
    let source = FileSource::new("lake", config).unwrap();

    let ids: Vec<&str> = source
        .list_entities()
        .unwrap()
        .iter()
        .map(|e| e.identifier())
        .collect();
    assert_eq!(
        ids,
        [identifier(&dir, "customers.csv"), identifier(&dir, "orders")]
    );

    let orders = source.entity(&identifier(&dir, "orders")).unwrap().unwrap();
    // part-1.csv sorts before year=2024/part-0.csv
    assert_eq!(orders.columns(), ["total", "id"]);

    let sample = source.sample(orders, 10).unwrap();
    assert_eq!(sample.len(), 3);
    assert_eq!(
        sample.rows()[2],
        [None, Some("2".to_string())]
    );
    assert_eq!(source.sample(orders, 2).unwrap().len(), 2);
}

#[test]
fn test_non_recursive_listing_and_tsv() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("top.tsv"), "id\tvalue\n1\ta\n").unwrap();
    fs::write(dir.path().join("nested").join("deep.tsv"), "id\n1\n").unwrap();

    let config = FileSourceConfig::new(root_of(&dir))
        .with_format(StorageFormat::Tsv)
        .recursive(false);
    let source = FileSource::new("lake", config).unwrap();
    let entities = source.list_entities().unwrap();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].columns(), ["id", "value"]);
}

#[test]
fn test_root_validation() {
    let with_prefix = FileSourceConfig::new("/data/lake");
    assert!(FileSource::new("lake", with_prefix).is_err());

    let remote = FileSourceConfig::new("s3://bucket/lake").with_provider(FileProvider::S3);
    assert!(FileSource::new("lake", remote).is_err());

    let dir = TempDir::new().unwrap();
    let missing = FileSourceConfig::new(identifier(&dir, "absent"));
    let source = FileSource::new("lake", missing).unwrap();
    let err = source.list_entities().unwrap_err();
    assert!(err.is_connection_error());
}
