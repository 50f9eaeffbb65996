//! Application layer - Use cases and orchestration
//!
//! Contains the route search service, the relevance ranker, the
//! municipality directory and the ports provider adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
