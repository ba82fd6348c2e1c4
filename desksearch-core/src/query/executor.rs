//! Query executor
//!
//! Applies a filter to a collection with a single linear scan. There is no
//! index; results keep the order of the source collection.

use super::ast::Filter;
use crate::record::{Record, Value};
use tracing::debug;

/// Records matching a query, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<Record>,
}

impl ResultSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Trailing line printed after the results
    pub fn summary(&self) -> String {
        match self.records.len() {
            0 => "No records found.".to_string(),
            1 => "1 record found.".to_string(),
            n => format!("{} records found.", n),
        }
    }
}

/// Query executor
#[derive(Debug, Default)]
pub struct QueryExecutor;

impl QueryExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Run a collection scan
    pub fn execute(&self, records: Vec<Record>, filter: &Filter) -> ResultSet {
        let scanned = records.len();
        let matched: Vec<Record> = records
            .into_iter()
            .filter(|record| self.matches_filter(record, filter))
            .collect();

        debug!(
            field = filter.field(),
            scanned,
            matched = matched.len(),
            "Collection scan complete"
        );

        ResultSet::new(matched)
    }

    /// Check if a record matches a filter
    pub fn matches_filter(&self, record: &Record, filter: &Filter) -> bool {
        match filter {
            Filter::IsEmpty { field } => record.value(field).is_blank(),

            Filter::Contains { field, value } => {
                let needle = value.to_text();
                match record.value(field) {
                    Value::List(items) => items.iter().any(|item| *item == needle),
                    _ => false,
                }
            }

            Filter::Eq { field, value } => record.value(field) == value,
        }
    }
}
