//! Spot Analysis common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the sa-* crates:
//! - Instance identity and category keys
//! - Raw fulfillment/interruption events and the correlated instance record
//! - Common error types with stable codes
//! - CLI output formats
//! - Report schema versioning

pub mod error;
pub mod event;
pub mod id;
pub mod output;
pub mod schema;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use event::{
    category_from_cell, category_label, Category, CorrelatedInstance, EventTable, FulfillmentEvent,
    InterruptionEvent,
};
pub use id::InstanceId;
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
