//! Query engine for DeskSearch
//!
//! Turns a typed-in value into a filter and scans a collection with it

pub mod ast;
pub mod coerce;
pub mod executor;

pub use ast::{Filter, Query};
pub use coerce::{coerce, is_id_field, CoercionError, IdCoercion};
pub use executor::{QueryExecutor, ResultSet};
