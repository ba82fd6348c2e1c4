//! Search engine facade
//!
//! Everything the prompt loop needs: field listings, query execution and
//! result rendering. The engine holds no per-query state; every call reloads
//! the collections it touches from the store.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::logging::QueryTimer;
use crate::query::{IdCoercion, Query, QueryExecutor, ResultSet};
use crate::record::RecordType;
use crate::render::{Renderer, DEFAULT_LABEL_WIDTH};
use crate::schema::{Schema, SchemaDrift};
use crate::store::RecordStore;
use std::time::Duration;
use tracing::debug;

pub struct SearchEngine<S: RecordStore> {
    store: S,
    executor: QueryExecutor,
    id_coercion: IdCoercion,
    label_width: usize,
    slow_query_threshold: Duration,
}

impl<S: RecordStore> SearchEngine<S> {
    /// Create an engine with default settings
    pub fn new(store: S) -> Self {
        Self {
            store,
            executor: QueryExecutor::new(),
            id_coercion: IdCoercion::default(),
            label_width: DEFAULT_LABEL_WIDTH,
            slow_query_threshold: Duration::from_millis(100),
        }
    }

    /// Create an engine using the query and output settings of a config
    pub fn from_config(store: S, config: &SearchConfig) -> Self {
        Self::new(store)
            .with_id_coercion(config.query.id_coercion)
            .with_label_width(config.output.label_width)
            .with_slow_query_threshold(config.slow_query_threshold())
    }

    pub fn with_id_coercion(mut self, id_coercion: IdCoercion) -> Self {
        self.id_coercion = id_coercion;
        self
    }

    pub fn with_label_width(mut self, label_width: usize) -> Self {
        self.label_width = label_width;
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = threshold;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn id_coercion(&self) -> IdCoercion {
        self.id_coercion
    }

    /// Sample the schema of a record type
    pub fn schema(&self, record_type: RecordType) -> Result<Schema> {
        let records = self.store.load(record_type)?;
        Schema::sample(record_type, &records)
    }

    /// Valid field names for a record type, in declaration order
    pub fn list_fields(&self, record_type: RecordType) -> Result<Vec<String>> {
        Ok(self.schema(record_type)?.fields().to_vec())
    }

    /// Field listing for every record type: a heading, one field per line,
    /// then a blank line. A type whose schema cannot be read lists its error
    /// in place of the fields.
    pub fn list_all_fields(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for record_type in RecordType::ALL {
            lines.push(format!("Search {} with", record_type.title()));
            match self.list_fields(record_type) {
                Ok(fields) => lines.extend(fields),
                Err(e) => {
                    debug!(collection = %record_type, error = %e, "No field listing");
                    lines.push(format!("Error: {}", e));
                }
            }
            lines.push(String::new());
        }
        lines
    }

    /// Compare each collection's sampled schema against its declared fields
    pub fn check_schemas(&self) -> Result<Vec<(RecordType, SchemaDrift)>> {
        RecordType::ALL
            .iter()
            .map(|&record_type| Ok((record_type, self.schema(record_type)?.drift())))
            .collect()
    }

    /// Validate the field, coerce the value and scan the collection.
    /// An unknown field fails before any record is scanned.
    pub fn run_query(&self, query: &Query) -> Result<ResultSet> {
        let timer = QueryTimer::start(query, self.slow_query_threshold);

        let records = self.store.load(query.record_type)?;
        Schema::sample(query.record_type, &records)?.require(&query.field)?;

        let filter = query.to_filter(self.id_coercion)?;
        debug!(?filter, "Running query");

        let results = self.executor.execute(records, &filter);
        timer.finish(results.len());
        Ok(results)
    }

    /// Render results with joins resolved, followed by the summary line
    pub fn render_results(&self, results: &ResultSet, record_type: RecordType) -> Result<Vec<String>> {
        Renderer::new(&self.store)
            .with_label_width(self.label_width)
            .render(results, record_type)
    }

    /// Run a query and render it, banner first
    pub fn search(&self, query: &Query) -> Result<Vec<String>> {
        let results = self.run_query(query)?;
        let mut lines = vec![query.describe()];
        lines.extend(self.render_results(&results, query.record_type)?);
        Ok(lines)
    }
}
