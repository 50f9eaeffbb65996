//! Infrastructure layer - Adapters for external systems
//!
//! Implements the route ports over the provider clients and carries the
//! process-level concerns: configuration loading, retry policy, tracing
//! setup and service wiring.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::{build_route_search_service, regional_ports};
pub use config::{AppConfig, ENV_PREFIX};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{TelemetryConfig, TelemetryError, init_tracing};
