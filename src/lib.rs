//! Vitrine - Local Services Marketplace Backend
//!
//! This crate implements the provider subscription engine: admission
//! control, payment validation, expiration, and the visibility gate that
//! decides whether a provider is discoverable in search.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
