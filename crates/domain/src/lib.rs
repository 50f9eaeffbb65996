//! Domain layer for the bus route aggregator
//!
//! Contains the unified route model every provider adapter normalizes into:
//! route summaries and details, stops, route shapes, municipalities and the
//! composite route identifier codec. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
