//! Command and query handlers, grouped by aggregate.

pub mod payment;
pub mod provider;
pub mod subscription;

pub(crate) mod visibility_cache;

#[cfg(test)]
pub(crate) mod test_support;
