//! Shared plumbing for account services: error type with HTTP mapping,
//! configuration loading, and tracing setup.

pub mod config;
pub mod error;
pub mod observability;
