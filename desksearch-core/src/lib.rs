//! DeskSearch Core - query resolution and result formatting
//!
//! This crate provides the engine behind the DeskSearch command line:
//! - Record and value types for the users, tickets and organizations collections
//! - Record stores (JSON files on disk, or in memory)
//! - Schema inspection by sampling a collection
//! - Value coercion and predicate matching
//! - Result rendering with foreign keys resolved to names
//! - Configuration and logging

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod query;
pub mod record;
pub mod render;
pub mod schema;
pub mod store;

pub use config::*;
pub use engine::SearchEngine;
pub use error::{Result, SearchError};
pub use logging::{init_logging, QueryTimer};
pub use query::*;
pub use record::*;
pub use render::{format_line, Renderer, DEFAULT_LABEL_WIDTH};
pub use schema::{declared_fields, Schema, SchemaDrift};
pub use store::*;
