//! Bounded row samples.
//!
//! A [`Sample`] is the tabular slice a source adapter hands back for an
//! entity. Cells are kept in their rendered text form; `None` is a null.

use std::collections::HashSet;

use serde::Serialize;

/// A bounded, row-major sample of an entity's data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sample {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Sample {
    /// Create an empty sample with the given column header.
    pub fn new<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builder: append a row. Short rows are padded with nulls and long rows
    /// are truncated to the header width.
    pub fn with_row<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<String>,
    {
        self.push_row(row.into_iter().map(|v| v.map(Into::into)).collect());
        self
    }

    /// Append a row, normalized to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The sampled rows.
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of sampled rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep at most `limit` rows.
    pub fn truncate(&mut self, limit: usize) {
        self.rows.truncate(limit);
    }

    /// Position of a column, matched case-insensitively.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
    }

    /// Iterate the values of one column, or `None` if the column is absent.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Option<impl Iterator<Item = Option<&'a str>> + 'a> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| row[idx].as_deref()))
    }

    /// Count of distinct non-null values in a column.
    pub fn distinct_count(&self, column: &str) -> Option<usize> {
        let values = self.column_values(column)?;
        let distinct: HashSet<&str> = values.flatten().collect();
        Some(distinct.len())
    }
}
