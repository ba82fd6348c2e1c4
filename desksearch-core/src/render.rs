//! Result formatting with cross-collection joins
//!
//! Foreign keys are resolved to names when a result is rendered. A key that
//! points at nothing drops its line instead of failing the render.

use crate::error::Result;
use crate::query::ResultSet;
use crate::record::{is_list_field, Record, RecordType, Value};
use crate::store::{Collection, RecordStore};
use std::fmt::Display;
use tracing::debug;

/// Column width labels are padded to
pub const DEFAULT_LABEL_WIDTH: usize = 20;

/// Format one `label value` line
pub fn format_line(width: usize, label: &str, value: impl Display) -> String {
    let line = format!("{:<width$} {}", label, value, width = width);
    line.trim_end().to_string()
}

/// Renders result sets, loading join collections on first use
pub struct Renderer<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    label_width: usize,
    users: Option<Collection>,
    tickets: Option<Collection>,
    organizations: Option<Collection>,
}

impl<'a, S: RecordStore + ?Sized> Renderer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            label_width: DEFAULT_LABEL_WIDTH,
            users: None,
            tickets: None,
            organizations: None,
        }
    }

    pub fn with_label_width(mut self, label_width: usize) -> Self {
        self.label_width = label_width;
        self
    }

    /// Render every record followed by a blank line, then the summary
    pub fn render(&mut self, results: &ResultSet, record_type: RecordType) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for record in results.records() {
            lines.extend(self.render_record(record, record_type)?);
            lines.push(String::new());
        }
        lines.push(results.summary());
        Ok(lines)
    }

    /// Render one record's fields in declaration order. Users also get a
    /// line per submitted and assigned ticket.
    pub fn render_record(&mut self, record: &Record, record_type: RecordType) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(record.len());
        for (field, value) in record.iter() {
            if let Some(line) = self.render_field(field, value)? {
                lines.push(line);
            }
        }

        if record_type == RecordType::Users {
            lines.extend(self.related_tickets(record)?);
        }

        Ok(lines)
    }

    /// Render a single field, or `None` when its join target is missing
    pub fn render_field(&mut self, field: &str, value: &Value) -> Result<Option<String>> {
        let width = self.label_width;

        if is_list_field(field) {
            return Ok(Some(format_line(width, field, value)));
        }

        match field {
            "submitter_id" | "assignee_id" if !value.is_null() => {
                let label = field.strip_suffix("_id").unwrap_or(field);
                let name = self.lookup_name(RecordType::Users, field, value)?;
                Ok(name.map(|name| format_line(width, label, name)))
            }
            "organization_id" => {
                let name = self.lookup_name(RecordType::Organizations, field, value)?;
                Ok(name.map(|name| format_line(width, "organization", name)))
            }
            _ => Ok(Some(format_line(width, field, value))),
        }
    }

    fn related_tickets(&mut self, user: &Record) -> Result<Vec<String>> {
        let id = user.value("_id");
        if id.is_null() {
            return Ok(Vec::new());
        }

        let width = self.label_width;
        let tickets = self.collection(RecordType::Tickets)?;
        let mut lines = Vec::new();

        for (role, key) in [("submitted", "submitter_id"), ("assigned", "assignee_id")] {
            let related = tickets.iter().filter(|ticket| ticket.value(key) == id);
            for (index, ticket) in related.enumerate() {
                lines.push(format_line(
                    width,
                    &format!("{} ticket{}", role, index),
                    ticket.value("subject"),
                ));
            }
        }

        Ok(lines)
    }

    fn lookup_name(&mut self, target: RecordType, field: &str, id: &Value) -> Result<Option<String>> {
        let records = self.collection(target)?;
        let name = records
            .iter()
            .find(|record| record.value("_id") == id)
            .map(|record| record.value("name").to_text());

        if name.is_none() {
            debug!(field, id = %id, collection = %target, "Join target missing; omitting line");
        }

        Ok(name)
    }

    fn collection(&mut self, record_type: RecordType) -> Result<&Collection> {
        let slot = match record_type {
            RecordType::Users => &mut self.users,
            RecordType::Tickets => &mut self.tickets,
            RecordType::Organizations => &mut self.organizations,
        };

        if slot.is_none() {
            *slot = Some(self.store.load(record_type)?);
        }

        Ok(slot.get_or_insert_with(Vec::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        let users = vec![
            [("_id", Value::Int(1)), ("name", Value::from("Francisca Rasmussen"))]
                .into_iter()
                .collect(),
        ];
        let organizations = vec![
            [("_id", Value::Int(101)), ("name", Value::from("Enthaze"))]
                .into_iter()
                .collect(),
        ];
        MemoryStore::new()
            .with(RecordType::Users, users)
            .with(RecordType::Tickets, vec![])
            .with(RecordType::Organizations, organizations)
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(DEFAULT_LABEL_WIDTH, "some key", "some value"),
            "some key             some value"
        );
        assert_eq!(format_line(DEFAULT_LABEL_WIDTH, "alias", ""), "alias");
        assert_eq!(format_line(4, "organization", "Enthaze"), "organization Enthaze");
    }

    #[test]
    fn test_list_field_joined() {
        let store = store();
        let mut renderer = Renderer::new(&store);
        let line = renderer
            .render_field("tags", &Value::from(vec!["Ohio", "Montana"]))
            .unwrap();
        assert_eq!(line.as_deref(), Some("tags                 Ohio, Montana"));
    }

    #[test]
    fn test_user_join() {
        let store = store();
        let mut renderer = Renderer::new(&store);

        let line = renderer.render_field("submitter_id", &Value::Int(1)).unwrap();
        assert_eq!(line.as_deref(), Some("submitter            Francisca Rasmussen"));

        let line = renderer.render_field("assignee_id", &Value::Int(1)).unwrap();
        assert_eq!(line.as_deref(), Some("assignee             Francisca Rasmussen"));

        // Missing user: the line is dropped
        assert_eq!(renderer.render_field("assignee_id", &Value::Int(99)).unwrap(), None);
    }

    #[test]
    fn test_null_user_key_renders_plain() {
        let store = store();
        let mut renderer = Renderer::new(&store);
        let line = renderer.render_field("assignee_id", &Value::Null).unwrap();
        assert_eq!(line.as_deref(), Some("assignee_id"));
    }

    #[test]
    fn test_organization_join() {
        let store = store();
        let mut renderer = Renderer::new(&store);

        let line = renderer.render_field("organization_id", &Value::Int(101)).unwrap();
        assert_eq!(line.as_deref(), Some("organization         Enthaze"));
    }

    #[test]
    fn test_missing_organization_is_omitted_like_missing_user() {
        let store = store();
        let mut renderer = Renderer::new(&store);

        assert_eq!(renderer.render_field("organization_id", &Value::Int(999)).unwrap(), None);
        assert_eq!(renderer.render_field("organization_id", &Value::Null).unwrap(), None);
    }

    #[test]
    fn test_join_collection_missing_is_an_error() {
        let store = MemoryStore::new();
        let mut renderer = Renderer::new(&store);
        assert!(renderer.render_field("submitter_id", &Value::Int(1)).is_err());
        // Plain fields never touch the store
        assert!(renderer.render_field("name", &Value::from("x")).is_ok());
    }

    #[test]
    fn test_label_width() {
        let store = store();
        let mut renderer = Renderer::new(&store).with_label_width(8);
        let line = renderer.render_field("name", &Value::from("Enthaze")).unwrap();
        assert_eq!(line.as_deref(), Some("name     Enthaze"));
    }

    #[test]
    fn test_render_empty_results() {
        let store = store();
        let mut renderer = Renderer::new(&store);
        let lines = renderer
            .render(&ResultSet::default(), RecordType::Organizations)
            .unwrap();
        assert_eq!(lines, vec!["No records found.".to_string()]);
    }
}
