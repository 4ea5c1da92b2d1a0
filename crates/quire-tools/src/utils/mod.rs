//! Shared helpers for tool adapters.

pub mod schema;
pub mod validation;
