//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod bus_route_adapter;

pub use bus_route_adapter::{NationalRouteAdapter, RegionalRouteAdapter, map_error};
