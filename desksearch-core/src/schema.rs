//! Schema inspection for DeskSearch collections
//!
//! Collections carry no schema of their own. The valid field set of a record
//! type is discovered by sampling its first record; the declared field lists
//! below describe the expected shape and are only used to report drift.

use crate::error::{Result, SearchError};
use crate::record::{Record, RecordType};
use std::fmt;

const USER_FIELDS: &[&str] = &[
    "_id",
    "url",
    "external_id",
    "name",
    "alias",
    "created_at",
    "active",
    "verified",
    "shared",
    "locale",
    "timezone",
    "last_login_at",
    "email",
    "phone",
    "signature",
    "organization_id",
    "tags",
    "suspended",
    "role",
];

const TICKET_FIELDS: &[&str] = &[
    "_id",
    "url",
    "external_id",
    "created_at",
    "type",
    "subject",
    "description",
    "priority",
    "status",
    "submitter_id",
    "assignee_id",
    "organization_id",
    "tags",
    "has_incidents",
    "due_at",
    "via",
];

const ORGANIZATION_FIELDS: &[&str] = &[
    "_id",
    "url",
    "external_id",
    "name",
    "domain_names",
    "created_at",
    "details",
    "shared_tickets",
    "tags",
];

/// The expected fields of a record type, in declaration order
pub fn declared_fields(record_type: RecordType) -> &'static [&'static str] {
    match record_type {
        RecordType::Users => USER_FIELDS,
        RecordType::Tickets => TICKET_FIELDS,
        RecordType::Organizations => ORGANIZATION_FIELDS,
    }
}

/// Field set of a record type, as discovered from a sample record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    record_type: RecordType,
    fields: Vec<String>,
}

impl Schema {
    /// Sample the first record of a collection
    pub fn sample(record_type: RecordType, records: &[Record]) -> Result<Self> {
        let first = records
            .first()
            .ok_or(SearchError::SchemaUnavailable(record_type))?;

        Ok(Self {
            record_type,
            fields: first.field_names().map(str::to_string).collect(),
        })
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Field names in declaration order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Exact-match membership test
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Fail with an invalid-query error unless `field` is in the schema
    pub fn require(&self, field: &str) -> Result<()> {
        if self.contains(field) {
            Ok(())
        } else {
            Err(SearchError::UnknownField {
                record_type: self.record_type,
                field: field.to_string(),
            })
        }
    }

    /// Compare the sampled fields against the declared ones
    pub fn drift(&self) -> SchemaDrift {
        let declared = declared_fields(self.record_type);

        let missing = declared
            .iter()
            .filter(|d| !self.contains(d))
            .map(|d| d.to_string())
            .collect();

        let unexpected = self
            .fields
            .iter()
            .filter(|f| !declared.contains(&f.as_str()))
            .cloned()
            .collect();

        SchemaDrift {
            missing,
            unexpected,
        }
    }
}

/// Difference between the declared and sampled field sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDrift {
    /// Declared but absent from the sample
    pub missing: Vec<String>,
    /// Present in the sample but not declared
    pub unexpected: Vec<String>,
}

impl SchemaDrift {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

impl fmt::Display for SchemaDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("matches declared fields");
        }

        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing: {}", self.missing.join(", ")));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unexpected: {}", self.unexpected.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}
