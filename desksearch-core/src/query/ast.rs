//! Query and filter definitions

use super::coerce::{coerce, CoercionError, IdCoercion};
use crate::record::{is_list_field, RecordType, Value};

/// A single search request: record type, field and the raw value as typed.
///
/// Queries are immutable; the prompt loop builds one per search and hands it
/// to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub record_type: RecordType,
    pub field: String,
    pub raw_value: String,
}

impl Query {
    pub fn new(
        record_type: RecordType,
        field: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            field: field.into(),
            raw_value: raw_value.into(),
        }
    }

    /// Banner printed before the results
    pub fn describe(&self) -> String {
        format!(
            "Searching {} for {} with a value of {}",
            self.record_type, self.field, self.raw_value
        )
    }

    /// Coerce the raw value and build the matching filter
    pub fn to_filter(&self, mode: IdCoercion) -> Result<Filter, CoercionError> {
        let value = coerce(&self.field, &self.raw_value, mode)?;
        Ok(Filter::for_value(&self.field, value))
    }
}

/// Predicate applied to every record of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Field is empty: an empty list, or a value whose text is empty
    IsEmpty { field: String },

    /// List field has an element equal to the value's text
    Contains { field: String, value: Value },

    /// Type-aware equality: field == value
    Eq { field: String, value: Value },
}

impl Filter {
    /// Pick the predicate for a coerced value
    pub fn for_value(field: &str, value: Value) -> Self {
        let field = field.to_string();
        if matches!(&value, Value::Text(s) if s.is_empty()) {
            Filter::IsEmpty { field }
        } else if is_list_field(&field) {
            Filter::Contains { field, value }
        } else {
            Filter::Eq { field, value }
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a membership filter
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an emptiness filter
    pub fn empty(field: impl Into<String>) -> Self {
        Filter::IsEmpty {
            field: field.into(),
        }
    }

    /// The field this filter reads
    pub fn field(&self) -> &str {
        match self {
            Filter::IsEmpty { field } | Filter::Contains { field, .. } | Filter::Eq { field, .. } => {
                field
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let query = Query::new(RecordType::Users, "alias", "The incredible");
        assert_eq!(
            query.describe(),
            "Searching users for alias with a value of The incredible"
        );
    }

    #[test]
    fn test_filter_selection() {
        assert_eq!(Filter::for_value("details", Value::from("")), Filter::empty("details"));
        assert_eq!(Filter::for_value("tags", Value::from("")), Filter::empty("tags"));
        assert_eq!(
            Filter::for_value("tags", Value::from("Ohio")),
            Filter::contains("tags", "Ohio")
        );
        assert_eq!(
            Filter::for_value("domain_names", Value::from("kage.com")),
            Filter::contains("domain_names", "kage.com")
        );
        assert_eq!(Filter::for_value("_id", Value::Int(1)), Filter::eq("_id", 1));
    }

    #[test]
    fn test_to_filter_coerces() {
        let query = Query::new(RecordType::Users, "_id", "1");
        assert_eq!(
            query.to_filter(IdCoercion::Strict).unwrap(),
            Filter::eq("_id", Value::Int(1))
        );

        let query = Query::new(RecordType::Users, "_id", "one");
        assert!(query.to_filter(IdCoercion::Strict).is_err());
        assert_eq!(
            query.to_filter(IdCoercion::Legacy).unwrap(),
            Filter::eq("_id", Value::Int(0))
        );

        let query = Query::new(RecordType::Users, "suspended", "true");
        assert_eq!(
            query.to_filter(IdCoercion::Strict).unwrap(),
            Filter::eq("suspended", true)
        );
        assert_eq!(query.to_filter(IdCoercion::Strict).unwrap().field(), "suspended");
    }
}
