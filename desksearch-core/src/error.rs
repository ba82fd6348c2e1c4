//! Error types for DeskSearch

use crate::query::coerce::CoercionError;
use crate::record::RecordType;
use crate::store::StoreError;

/// Errors reported to the caller of the search engine.
///
/// None of these end an interactive session; the caller reports them and
/// may continue with a new query.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error("No schema available for {0}: collection is empty")]
    SchemaUnavailable(RecordType),

    #[error("Invalid query: {record_type} has no field '{field}'")]
    UnknownField {
        record_type: RecordType,
        field: String,
    },

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),
}

impl SearchError {
    /// True when the query itself was malformed, as opposed to the data
    /// behind it being unavailable
    pub fn is_invalid_query(&self) -> bool {
        matches!(
            self,
            SearchError::UnknownField { .. }
                | SearchError::UnknownRecordType(_)
                | SearchError::Coercion(_)
        )
    }
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
