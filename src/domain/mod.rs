//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `subscription` - Subscription lifecycle, billing periods, and plans
//! - `payment` - Declared payments and their validation states
//! - `provider` - Provider aggregate, verification, and the visibility gate
//! - `audit` - Immutable records of administrator decisions

pub mod audit;
pub mod foundation;
pub mod payment;
pub mod provider;
pub mod subscription;
