//! Typed plugin surface shared by the Uyuni provider crates
//!
//! The calling orchestrator hands every operation a map of typed attribute
//! values and expects a map (or diagnostics) back. This crate defines that
//! surface:
//!
//! - **Value / Attributes**: attribute values as configured, planned or
//!   stored, including the null and unknown states
//! - **Schema**: per-attribute type, requiredness and sensitivity
//! - **Diagnostics**: accumulating, attribute-scoped error reporting
//! - **Provider / ManagedResource / DataSource**: the traits a provider
//!   implements, plus the `OperationError` taxonomy for remote failures

pub mod diagnostics;
pub mod provider;
pub mod schema;
pub mod value;

// Re-export main types for convenience
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use provider::{
    ConfiguredProvider, DataSource, ManagedResource, OperationError, OperationResult, Provider,
};
pub use schema::{AttributeSchema, AttributeType, Schema, TypeError};
pub use value::{Attributes, Value};
