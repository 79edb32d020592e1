//! Movie dataset integration tests.
//!
//! - queries_across_tables: the canned multi-table reports
//! - properties: invariants that hold for any grouping query
//! - errors: schema and type failures surfaced through the handle

mod harness;

pub mod errors;
pub mod properties;
pub mod queries_across_tables;

pub use harness::MovieDb;
