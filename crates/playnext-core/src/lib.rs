//! Cross-cutting building blocks for PlayNext services: tracing setup,
//! environment config, JSON error bodies, health checks, and HTTP middleware.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
