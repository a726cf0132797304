//! Application layer: command and query handlers.
//!
//! Handlers orchestrate domain aggregates through ports. They hold no
//! business rules themselves; those live in the domain layer.

pub mod handlers;
