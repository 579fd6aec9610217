//! Row readers for file-backed entities.
//!
//! Both readers return a [`Sample`] of at most `limit` rows plus whatever
//! column type information the format carries. They consume their input
//! only as far as those rows require.

use std::collections::HashMap;
use std::io::Read;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;

use super::SourceResult;
use crate::model::Sample;

/// A decoded sample and the column types reported by the file, if any.
#[derive(Debug, Clone, Default)]
pub struct ReadResult {
    pub sample: Sample,
    pub column_types: HashMap<String, String>,
}

/// Read a delimited text file with a header row.
///
/// Empty fields are treated as nulls. Ragged rows are tolerated. Reading
/// stops after `limit` records.
pub fn read_delimited<R: Read>(data: R, delimiter: u8, limit: usize) -> SourceResult<ReadResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut sample = Sample::new(headers);

    for record in reader.records().take(limit) {
        let record = record?;
        let row = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        sample.push_row(row);
    }

    Ok(ReadResult {
        sample,
        column_types: HashMap::new(),
    })
}

/// Read up to `limit` rows from the first row group of a Parquet file.
///
/// Columns come from the file schema even when the file holds no rows. With
/// `limit == 0` only the footer is read.
pub fn read_parquet<T>(data: T, limit: usize) -> SourceResult<ReadResult>
where
    T: ChunkReader + 'static,
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(data)?;
    let schema = builder.schema().clone();

    let columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let column_types = schema
        .fields()
        .iter()
        .map(|f| (f.name().clone(), f.data_type().to_string()))
        .collect();

    let mut sample = Sample::new(columns);
    if limit == 0 {
        return Ok(ReadResult {
            sample,
            column_types,
        });
    }

    let row_groups = if builder.metadata().num_row_groups() > 0 {
        vec![0]
    } else {
        Vec::new()
    };
    let mut reader = builder
        .with_row_groups(row_groups)
        .with_batch_size(limit)
        .build()?;
    if let Some(batch) = reader.next() {
        let batch = batch?;
        for row in 0..batch.num_rows().min(limit) {
            let mut values = Vec::with_capacity(batch.num_columns());
            for array in batch.columns() {
                if array.is_null(row) {
                    values.push(None);
                } else {
                    values.push(Some(array_value_to_string(array.as_ref(), row)?));
                }
            }
            sample.push_row(values);
        }
    }

    Ok(ReadResult {
        sample,
        column_types,
    })
}
