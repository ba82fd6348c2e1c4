//! Record and Value types for DeskSearch
//!
//! This module provides the data structures the engine operates on:
//! - Value: the scalar, list and null values found in the flat JSON collections
//! - Record: a JSON object with its fields kept in declaration order
//! - RecordType: the fixed set of collections the tool can search

use crate::error::SearchError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Fields whose values are lists of text tokens. They are matched by
/// membership and rendered comma-joined.
pub const LIST_FIELDS: &[&str] = &["tags", "domain_names"];

/// Returns true when `field` holds a list of text tokens
pub fn is_list_field(field: &str) -> bool {
    LIST_FIELDS.contains(&field)
}

/// The collections available for searching
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordType {
    Users,
    Tickets,
    Organizations,
}

impl RecordType {
    /// Every record type, in menu order
    pub const ALL: [RecordType; 3] = [
        RecordType::Users,
        RecordType::Tickets,
        RecordType::Organizations,
    ];

    /// Collection name, also the stem of the backing JSON file
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Users => "users",
            RecordType::Tickets => "tickets",
            RecordType::Organizations => "organizations",
        }
    }

    /// Capitalised name used in prompts and listings
    pub fn title(&self) -> &'static str {
        match self {
            RecordType::Users => "Users",
            RecordType::Tickets => "Tickets",
            RecordType::Organizations => "Organizations",
        }
    }

    /// One-based position in the type selection menu
    pub fn menu_index(&self) -> usize {
        match self {
            RecordType::Users => 1,
            RecordType::Tickets => 2,
            RecordType::Organizations => 3,
        }
    }

    /// Look up a record type by its one-based menu position
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = SearchError;

    /// Accepts a collection name (any case) or a menu digit
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_menu_index(index)
                .ok_or_else(|| SearchError::UnknownRecordType(s.to_string()));
        }

        Self::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| SearchError::UnknownRecordType(s.to_string()))
    }
}

/// A field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Null or absent
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Text value
    Text(String),
    /// List of text tokens
    List(Vec<String>),
}

static NULL: Value = Value::Null;

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get as list reference
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text representation used for display and emptiness checks.
    /// Null renders as the empty string, lists as comma-joined text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// True for an empty list, and for any other value whose text
    /// representation is empty (null included)
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Bool(_) | Value::Int(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            obj @ serde_json::Value::Object(_) => Value::Text(obj.to_string()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A record: one JSON object of a collection, fields in declaration order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "IndexMap<String, serde_json::Value>")]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, keeping its position if it already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Get a field by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a field by name, reading absent fields as null
    pub fn value(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&NULL)
    }

    /// Check if a field exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a single record from a JSON object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<IndexMap<String, serde_json::Value>> for Record {
    fn from(raw: IndexMap<String, serde_json::Value>) -> Self {
        Self {
            fields: raw.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
